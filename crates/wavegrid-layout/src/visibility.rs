#![forbid(unsafe_code)]

//! Viewport virtualization for the spring layout.
//!
//! This module decides which elements carry a live spring for the current
//! viewport. It does **not** own springs or geometry: it reads rest frames
//! from a [`StaticLayout`] and reports what to attach and detach.
//!
//! # Design
//!
//! - [`VisibilityTracker`] holds the buffer margin (overscan on every side)
//!   and the supplementary toggle.
//! - [`ActiveSet`] is the set of positions currently attached, split by
//!   category.
//! - [`VisibilityTracker::diff`] is called once per layout pass and returns a
//!   [`VisibilityDiff`] telling the engine exactly which elements entered or
//!   left the buffered viewport.
//!
//! Springs are attached a little before an item scrolls into view and
//! detached a little after it leaves, so their settle lag never shows at the
//! viewport edge.
//!
//! # Invariants
//!
//! 1. `newly_active ∩ active = ∅` and `no_longer_active ⊆ active`.
//! 2. `newly_active` and `no_longer_active` are disjoint.
//! 3. For an unchanged viewport and content, the diff after applying the
//!    previous diff is empty.
//! 4. Cell and supplementary positions never mix: the same [`GridPosition`]
//!    may be active as a cell and as a header independently.

use rustc_hash::FxHashSet;
use wavegrid_core::{ElementCategory, ElementKey, GridPosition, ItemAttributes, Rect};

use crate::config::DEFAULT_BUFFER_MARGIN;
use crate::provider::StaticLayout;

// ---------------------------------------------------------------------------
// Active set
// ---------------------------------------------------------------------------

/// Positions currently governed by a live spring, split by category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSet {
    cells: FxHashSet<GridPosition>,
    supplementary: FxHashSet<GridPosition>,
}

impl ActiveSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn partition(&self, category: ElementCategory) -> &FxHashSet<GridPosition> {
        match category {
            ElementCategory::Cell => &self.cells,
            ElementCategory::Supplementary => &self.supplementary,
        }
    }

    fn partition_mut(&mut self, category: ElementCategory) -> &mut FxHashSet<GridPosition> {
        match category {
            ElementCategory::Cell => &mut self.cells,
            ElementCategory::Supplementary => &mut self.supplementary,
        }
    }

    #[must_use]
    pub fn contains(&self, key: ElementKey) -> bool {
        self.partition(key.category).contains(&key.position)
    }

    /// Returns `true` if the key was not already present.
    pub(crate) fn insert(&mut self, key: ElementKey) -> bool {
        self.partition_mut(key.category).insert(key.position)
    }

    /// Returns `true` if the key was present.
    pub(crate) fn remove(&mut self, key: ElementKey) -> bool {
        self.partition_mut(key.category).remove(&key.position)
    }

    pub(crate) fn clear(&mut self) {
        self.cells.clear();
        self.supplementary.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len() + self.supplementary.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.supplementary.is_empty()
    }

    /// Active cell positions.
    pub fn cells(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.cells.iter().copied()
    }

    /// Active supplementary positions.
    pub fn supplementary(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.supplementary.iter().copied()
    }

    /// Every active key, in sorted order.
    #[must_use]
    pub fn keys(&self) -> Vec<ElementKey> {
        let mut keys: Vec<ElementKey> = self
            .cells()
            .map(ElementKey::cell)
            .chain(self.supplementary().map(ElementKey::supplementary))
            .collect();
        keys.sort_unstable();
        keys
    }
}

// ---------------------------------------------------------------------------
// Diff
// ---------------------------------------------------------------------------

/// Result of one visibility pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibilityDiff {
    /// Rest attributes of elements that just entered the buffered viewport.
    pub newly_active: Vec<ItemAttributes>,
    /// Elements that left it.
    pub no_longer_active: Vec<ElementKey>,
}

impl VisibilityDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.newly_active.is_empty() && self.no_longer_active.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Computes which elements should carry a spring for a given viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityTracker {
    /// Extra units above, below and beside the viewport whose elements are
    /// attached too, so springs are live before an item becomes visible.
    buffer_margin: f64,

    /// Attach section headers and other supplementary elements as well as
    /// cells.
    track_supplementary: bool,
}

impl Default for VisibilityTracker {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_MARGIN, true)
    }
}

impl VisibilityTracker {
    #[must_use]
    pub fn new(buffer_margin: f64, track_supplementary: bool) -> Self {
        Self {
            buffer_margin: buffer_margin.max(0.0),
            track_supplementary,
        }
    }

    #[must_use]
    pub fn buffer_margin(&self) -> f64 {
        self.buffer_margin
    }

    #[must_use]
    pub fn tracks_supplementary(&self) -> bool {
        self.track_supplementary
    }

    /// The viewport grown by the buffer margin on every side.
    #[must_use]
    pub fn buffered_rect(&self, viewport: Rect) -> Rect {
        viewport.inset_by(-self.buffer_margin, -self.buffer_margin)
    }

    /// Rest attributes of every element that should be active for `viewport`.
    pub fn targets<L>(&self, viewport: Rect, layout: &L) -> Vec<ItemAttributes>
    where
        L: StaticLayout + ?Sized,
    {
        let mut targets = layout.attributes_in_rect(self.buffered_rect(viewport));
        if !self.track_supplementary {
            targets.retain(|attrs| attrs.category == ElementCategory::Cell);
        }
        targets
    }

    /// Diff the buffered viewport against `active`. No side effects.
    pub fn diff<L>(&self, viewport: Rect, layout: &L, active: &ActiveSet) -> VisibilityDiff
    where
        L: StaticLayout + ?Sized,
    {
        let targets = self.targets(viewport, layout);
        let target_keys: FxHashSet<ElementKey> = targets.iter().map(ItemAttributes::key).collect();

        let mut newly_active: Vec<ItemAttributes> = targets
            .into_iter()
            .filter(|attrs| !active.contains(attrs.key()))
            .collect();
        newly_active.sort_by_key(ItemAttributes::key);
        newly_active.dedup_by_key(|attrs| attrs.key());

        let no_longer_active: Vec<ElementKey> = active
            .keys()
            .into_iter()
            .filter(|key| !target_keys.contains(key))
            .collect();

        VisibilityDiff {
            newly_active,
            no_longer_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{FlowLayout, FlowLayoutConfig};
    use wavegrid_core::Size;

    fn column(items: usize) -> FlowLayout<impl Fn(GridPosition) -> Size> {
        // One 100x100 item per row: item i spans y = 20 + 110 i .. 120 + 110 i.
        FlowLayout::new(
            vec![items],
            |_: GridPosition| Size::square(100.0),
            FlowLayoutConfig::default(),
            140.0,
        )
    }

    fn apply(active: &mut ActiveSet, diff: &VisibilityDiff) {
        for key in &diff.no_longer_active {
            active.remove(*key);
        }
        for attrs in &diff.newly_active {
            active.insert(attrs.key());
        }
    }

    #[test]
    fn active_set_partitions_categories() {
        let mut active = ActiveSet::new();
        let p = GridPosition::new(1, 0);
        assert!(active.insert(ElementKey::cell(p)));
        assert!(!active.contains(ElementKey::supplementary(p)));
        assert!(active.insert(ElementKey::supplementary(p)));
        assert_eq!(active.len(), 2);
        assert!(active.remove(ElementKey::cell(p)));
        assert!(!active.remove(ElementKey::cell(p)));
        assert!(active.contains(ElementKey::supplementary(p)));
    }

    #[test]
    fn second_pass_is_empty() {
        let layout = column(20);
        let tracker = VisibilityTracker::default();
        let viewport = Rect::new(0.0, 0.0, 140.0, 300.0);
        let mut active = ActiveSet::new();

        let first = tracker.diff(viewport, &layout, &active);
        assert!(!first.newly_active.is_empty());
        assert!(first.no_longer_active.is_empty());
        apply(&mut active, &first);

        assert!(tracker.diff(viewport, &layout, &active).is_empty());
    }

    #[test]
    fn small_content_idempotent() {
        let layout = column(2);
        let tracker = VisibilityTracker::default();
        let viewport = Rect::new(0.0, 0.0, 140.0, 900.0);
        let mut active = ActiveSet::new();
        let first = tracker.diff(viewport, &layout, &active);
        assert_eq!(first.newly_active.len(), 2);
        apply(&mut active, &first);
        for _ in 0..3 {
            assert!(tracker.diff(viewport, &layout, &active).is_empty());
        }
    }

    #[test]
    fn buffer_margin_hysteresis() {
        let layout = column(20);
        let tracker = VisibilityTracker::default();
        // Viewport ends at y = 300. Item 3 starts at 350: outside the
        // viewport but inside the 100-unit buffer. Item 4 starts at 460,
        // beyond the buffered edge at 400.
        let viewport = Rect::new(0.0, 0.0, 140.0, 300.0);
        let diff = tracker.diff(viewport, &layout, &ActiveSet::new());
        let items: Vec<usize> = diff.newly_active.iter().map(|a| a.position.item).collect();
        assert_eq!(items, vec![0, 1, 2, 3]);
        assert!(!viewport.intersects(&diff.newly_active[3].frame()));
    }

    #[test]
    fn scrolling_moves_items_out() {
        let layout = column(20);
        let tracker = VisibilityTracker::default();
        let mut active = ActiveSet::new();
        let diff = tracker.diff(Rect::new(0.0, 0.0, 140.0, 300.0), &layout, &active);
        apply(&mut active, &diff);

        // Scroll so the buffered rect starts at 400: items 0..=2 end above it,
        // item 3 (350..450) still overlaps.
        let diff = tracker.diff(Rect::new(0.0, 500.0, 140.0, 300.0), &layout, &active);
        let gone: Vec<usize> = diff.no_longer_active.iter().map(|k| k.position.item).collect();
        assert_eq!(gone, vec![0, 1, 2]);
        for attrs in &diff.newly_active {
            assert!(!active.contains(attrs.key()));
        }
    }

    #[test]
    fn supplementary_toggle() {
        let config = FlowLayoutConfig {
            header_height: 40.0,
            ..FlowLayoutConfig::default()
        };
        let layout = FlowLayout::new(vec![2, 2], |_: GridPosition| Size::square(50.0), config, 300.0);
        let viewport = Rect::new(0.0, 0.0, 300.0, 400.0);

        let with = VisibilityTracker::new(100.0, true).diff(viewport, &layout, &ActiveSet::new());
        assert!(
            with.newly_active
                .iter()
                .any(|a| a.category == ElementCategory::Supplementary)
        );

        let without =
            VisibilityTracker::new(100.0, false).diff(viewport, &layout, &ActiveSet::new());
        assert!(
            without
                .newly_active
                .iter()
                .all(|a| a.category == ElementCategory::Cell)
        );
    }

    #[test]
    fn negative_margin_clamped() {
        let tracker = VisibilityTracker::new(-5.0, true);
        assert_eq!(tracker.buffer_margin(), 0.0);
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(tracker.buffered_rect(r), r);
    }
}
