#![forbid(unsafe_code)]

//! The spring flow layout engine.
//!
//! [`SpringFlowLayout`] answers a host scroll view's layout questions with
//! simulated positions. Per element the lifecycle is:
//!
//! ```text
//! inactive ──(enters buffered viewport)──▶ attached
//!    ▲                                        │
//!    └────────(leaves buffered viewport)──────┘
//! ```
//!
//! # Host contract
//!
//! 1. Call [`prepare_layout`](SpringFlowLayout::prepare_layout) for every
//!    layout pass.
//! 2. Call [`should_invalidate_for_bounds_change`](SpringFlowLayout::should_invalidate_for_bounds_change)
//!    when the scroll offset changes. A `false` return means the simulation
//!    owns invalidation for now.
//! 3. Call [`tick`](SpringFlowLayout::tick) once per frame; a step with
//!    `settled == true` is the moment to fall back to a static relayout.
//!
//! All entry points take `&mut self`; the engine expects serialized delivery
//! of layout and scroll events from a single thread.

use std::time::Duration;

use wavegrid_core::{ElementKey, GridPosition, ItemAttributes, Point, Rect, Size};
use wavegrid_dynamics::{SimulationService, SimulationStep, SpringAnimator};

use crate::config::SpringLayoutConfig;
use crate::error::{LayoutError, Result};
use crate::provider::{PointerSource, StaticLayout};
use crate::reaction::ScrollState;
use crate::registry::AttachmentRegistry;
use crate::visibility::{ActiveSet, VisibilityTracker};

/// Longest frame handed to the simulation in one tick. Longer gaps (a
/// suspended process, a debugger pause) are treated as one long frame.
pub const MAX_FRAME_DT: Duration = Duration::from_millis(100);

/// What one layout pass changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutPassReport {
    pub added: usize,
    pub removed: usize,
    /// Static geometry changed, so every spring was dropped first.
    pub reset: bool,
}

/// Physics-driven layout over a static geometry provider.
#[derive(Debug)]
pub struct SpringFlowLayout<L, S = SpringAnimator> {
    config: SpringLayoutConfig,
    layout: L,
    simulation: S,
    tracker: VisibilityTracker,
    registry: AttachmentRegistry,
    scroll: ScrollState,
    bounds: Rect,
    pinned_offset: Option<Point>,
}

impl<L: StaticLayout> SpringFlowLayout<L, SpringAnimator> {
    /// Build an engine backed by the built-in [`SpringAnimator`].
    ///
    /// `bounds` is the host's current visible rect: origin = content offset,
    /// size = frame size.
    pub fn new(layout: L, bounds: Rect, config: SpringLayoutConfig) -> Result<Self> {
        Self::with_simulation(layout, SpringAnimator::new(), bounds, config)
    }
}

impl<L: StaticLayout, S: SimulationService> SpringFlowLayout<L, S> {
    /// Build an engine over any simulation service.
    pub fn with_simulation(
        layout: L,
        simulation: S,
        bounds: Rect,
        config: SpringLayoutConfig,
    ) -> Result<Self> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(LayoutError::InvalidConfig(errors));
        }
        Ok(Self {
            tracker: VisibilityTracker::new(config.buffer_margin, config.track_supplementary),
            registry: AttachmentRegistry::new(config.spring),
            config,
            layout,
            simulation,
            scroll: ScrollState::default(),
            bounds,
            pinned_offset: None,
        })
    }

    /// Restoring from archived state is not supported: the engine's state is
    /// the live simulation, which cannot be persisted.
    pub fn from_archive(archive: &[u8]) -> Result<Self> {
        tracing::error!(
            bytes = archive.len(),
            "attempted to restore spring layout from archived state"
        );
        Err(LayoutError::RestoreUnsupported)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Reconcile springs with the buffered viewport: remove stale, add new.
    pub fn prepare_layout(&mut self) -> LayoutPassReport {
        let _span = tracing::debug_span!("layout_pass", offset_y = self.bounds.y).entered();

        let reset = self.layout.prepare(self.bounds.size());
        if reset {
            let dropped = self.registry.clear(&mut self.simulation);
            tracing::debug!(dropped, "static geometry changed; springs reset");
        }

        let diff = self
            .tracker
            .diff(self.bounds, &self.layout, self.registry.active());
        let removed = self
            .registry
            .remove(&mut self.simulation, &diff.no_longer_active);
        let added = self.registry.add(&mut self.simulation, diff.newly_active);

        if added > 0 || removed > 0 {
            tracing::debug!(added, removed, active = self.registry.len(), "springs reconciled");
        }
        LayoutPassReport {
            added,
            removed,
            reset,
        }
    }

    /// React to a scroll. Returns whether the host should run a static
    /// relayout, which is only the case while the simulation is idle.
    pub fn should_invalidate_for_bounds_change<P>(&mut self, new_bounds: Rect, pointer: &P) -> bool
    where
        P: PointerSource + ?Sized,
    {
        self.scroll = ScrollState {
            delta: new_bounds.y - self.bounds.y,
            pointer: pointer.current_pointer_location(),
        };
        self.bounds = new_bounds;

        let reacted = self.apply_scroll_reaction();
        tracing::trace!(delta = self.scroll.delta, reacted, "bounds changed");

        if self.simulation.is_running() {
            false
        } else {
            tracing::debug!("simulation idle; host should relayout statically");
            true
        }
    }

    /// Shift every attached item by its scroll reaction. Returns how many
    /// attachments were updated.
    fn apply_scroll_reaction(&mut self) -> usize {
        if self.scroll.pointer.is_none() {
            return 0;
        }

        let mut updated = 0;
        for attachment in self.registry.attachments() {
            let Some(mut state) = self.simulation.attachment_state(attachment.handle) else {
                continue;
            };
            if state.category != attachment.category() {
                tracing::warn!(
                    key = %attachment.key,
                    reported = %state.category,
                    "attachment category mismatch, skipping scroll reaction"
                );
                continue;
            }
            let Some(shift) = self.scroll.shift_for(attachment.anchor, &self.config.reaction)
            else {
                continue;
            };
            state.center.y += shift;
            tracing::trace!(key = %attachment.key, shift, "scroll reaction");
            if self.simulation.update_attachment(attachment.handle, state) {
                updated += 1;
            }
        }
        updated
    }

    /// Advance the simulation by one frame, capped at [`MAX_FRAME_DT`].
    pub fn tick(&mut self, dt: Duration) -> SimulationStep {
        if dt > MAX_FRAME_DT {
            tracing::debug!(?dt, cap = ?MAX_FRAME_DT, "frame gap capped");
        }
        let step = self.simulation.advance(dt.min(MAX_FRAME_DT));
        if step.settled {
            tracing::debug!(active = self.registry.len(), "springs settled");
        }
        step
    }

    /// Replace the static geometry (a new data snapshot). Every spring is
    /// dropped because grid positions are only stable within one snapshot.
    pub fn reload(&mut self, layout: L) -> usize {
        self.layout = layout;
        let dropped = self.registry.clear(&mut self.simulation);
        tracing::debug!(dropped, "data reloaded");
        dropped
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Attributes of every element intersecting `rect`: simulated where a
    /// spring exists, static otherwise.
    pub fn attributes_in_rect(&self, rect: Rect) -> Vec<ItemAttributes> {
        if self.simulation.attachment_count() == 0 {
            return self.layout.attributes_in_rect(rect);
        }
        let mut found = self.simulation.attributes_in_rect(rect);
        found.extend(
            self.layout
                .attributes_in_rect(rect)
                .into_iter()
                .filter(|attrs| !self.registry.contains(attrs.key())),
        );
        found.sort_by_key(ItemAttributes::key);
        found
    }

    pub fn attributes_for_item(&self, position: GridPosition) -> Option<ItemAttributes> {
        self.simulation
            .query_state(ElementKey::cell(position))
            .or_else(|| self.layout.attributes_for_item(position))
    }

    pub fn attributes_for_supplementary(&self, position: GridPosition) -> Option<ItemAttributes> {
        self.simulation
            .query_state(ElementKey::supplementary(position))
            .or_else(|| self.layout.attributes_for_supplementary(position))
    }

    #[must_use]
    pub fn content_size(&self) -> Size {
        self.layout.content_size()
    }

    // -----------------------------------------------------------------------
    // Layout transitions
    // -----------------------------------------------------------------------

    /// Remember the content offset before switching to this layout.
    ///
    /// When content is shorter than the view the host would otherwise jump
    /// to a different offset during the switch.
    pub fn prepare_for_transition(&mut self, content_offset: Point) {
        self.pinned_offset = Some(content_offset);
    }

    /// Forget the offset recorded by [`prepare_for_transition`](Self::prepare_for_transition).
    pub fn finalize_transition(&mut self) {
        self.pinned_offset = None;
    }

    /// The content offset the host should settle on.
    #[must_use]
    pub fn target_content_offset(&self, proposed: Point) -> Point {
        self.pinned_offset.unwrap_or(proposed)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[must_use]
    pub fn scroll_state(&self) -> ScrollState {
        self.scroll
    }

    #[must_use]
    pub fn config(&self) -> &SpringLayoutConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &AttachmentRegistry {
        &self.registry
    }

    #[must_use]
    pub fn active_set(&self) -> &ActiveSet {
        self.registry.active()
    }

    #[must_use]
    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    #[must_use]
    pub fn static_layout(&self) -> &L {
        &self.layout
    }
}
