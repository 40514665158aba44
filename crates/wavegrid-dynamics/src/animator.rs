#![forbid(unsafe_code)]

//! Default [`SimulationService`]: explicit damped springs stepped per frame.
//!
//! Each attachment drives an item's center with two independent 1-D
//! [`Spring`]s (x and y) built from the attachment's natural frequency and
//! damping ratio. The animator is translation-only.
//!
//! # Invariants
//!
//! 1. At most one attachment per [`ElementKey`].
//! 2. A freshly created attachment whose item already sits on its anchor is
//!    at rest, so creating attachments alone never makes the animator run.
//! 3. A settled spring sits exactly on its target; with an integral anchor
//!    and zero rest length the settled center is integral.

use std::time::Duration;

use rustc_hash::FxHashMap;
use wavegrid_core::{ElementKey, ItemAttributes, Point, Rect, Spring};

use crate::service::{AttachmentHandle, SimulationService, SimulationStep, SpringParams};

#[derive(Debug, Clone)]
struct Body {
    attributes: ItemAttributes,
    anchor: Point,
    length: f64,
    x: Spring,
    y: Spring,
}

impl Body {
    fn new(attributes: ItemAttributes, anchor: Point, params: &SpringParams) -> Self {
        let length = params.length.max(0.0);
        let target = rest_target(attributes.center, anchor, length);
        let spring = |from: f64, to: f64| {
            Spring::from_oscillation(from, to, params.frequency, params.damping)
        };
        Self {
            x: spring(attributes.center.x, target.x),
            y: spring(attributes.center.y, target.y),
            attributes,
            anchor,
            length,
        }
    }

    fn is_at_rest(&self) -> bool {
        self.x.is_at_rest() && self.y.is_at_rest()
    }

    fn advance(&mut self, dt: Duration) {
        if self.length > 0.0 {
            let target = rest_target(self.attributes.center, self.anchor, self.length);
            self.x.set_target(target.x);
            self.y.set_target(target.y);
        }
        self.x.advance(dt);
        self.y.advance(dt);
        self.attributes.center = Point::new(self.x.position(), self.y.position());
    }
}

/// Where an item at `center` comes to rest on a spring of `length` from
/// `anchor`: along the anchor→center direction, or on the anchor itself when
/// the two coincide.
fn rest_target(center: Point, anchor: Point, length: f64) -> Point {
    if length <= 0.0 {
        return anchor;
    }
    let dist = center.distance(anchor);
    if dist == 0.0 {
        return anchor;
    }
    let scale = length / dist;
    Point::new(
        anchor.x + (center.x - anchor.x) * scale,
        anchor.y + (center.y - anchor.y) * scale,
    )
}

/// Spring solver owning every attached item.
#[derive(Debug, Default)]
pub struct SpringAnimator {
    bodies: FxHashMap<AttachmentHandle, Body>,
    index: FxHashMap<ElementKey, AttachmentHandle>,
    next_handle: u64,
    running: bool,
}

impl SpringAnimator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor of the attachment behind `handle`.
    #[must_use]
    pub fn anchor(&self, handle: AttachmentHandle) -> Option<Point> {
        self.bodies.get(&handle).map(|body| body.anchor)
    }

    fn recompute_running(&mut self) {
        self.running = self.bodies.values().any(|body| !body.is_at_rest());
    }
}

impl SimulationService for SpringAnimator {
    fn create_attachment(
        &mut self,
        item: ItemAttributes,
        anchor: Point,
        params: &SpringParams,
    ) -> AttachmentHandle {
        let key = item.key();
        if let Some(previous) = self.index.remove(&key) {
            self.bodies.remove(&previous);
            tracing::debug!(%key, handle = %previous, "replacing existing attachment");
            if self.running {
                self.recompute_running();
            }
        }

        let handle = AttachmentHandle::from_raw(self.next_handle);
        self.next_handle += 1;

        let body = Body::new(item, anchor, params);
        if !body.is_at_rest() {
            self.running = true;
        }
        self.bodies.insert(handle, body);
        self.index.insert(key, handle);
        tracing::trace!(%key, %handle, anchor.x = anchor.x, anchor.y = anchor.y, "attachment created");
        handle
    }

    fn remove_attachment(&mut self, handle: AttachmentHandle) -> Option<ItemAttributes> {
        let body = self.bodies.remove(&handle)?;
        let key = body.attributes.key();
        if self.index.get(&key) == Some(&handle) {
            self.index.remove(&key);
        }
        tracing::trace!(%key, %handle, "attachment removed");
        if self.running {
            self.recompute_running();
        }
        Some(body.attributes)
    }

    fn update_attachment(&mut self, handle: AttachmentHandle, state: ItemAttributes) -> bool {
        let Some(body) = self.bodies.get_mut(&handle) else {
            return false;
        };
        body.attributes.size = state.size;
        body.attributes.center = state.center;
        body.x.set_position(state.center.x);
        body.y.set_position(state.center.y);
        if !body.is_at_rest() {
            self.running = true;
        }
        true
    }

    fn attachment_state(&self, handle: AttachmentHandle) -> Option<ItemAttributes> {
        self.bodies.get(&handle).map(|body| body.attributes)
    }

    fn query_state(&self, key: ElementKey) -> Option<ItemAttributes> {
        let handle = self.index.get(&key)?;
        self.attachment_state(*handle)
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn attributes_in_rect(&self, rect: Rect) -> Vec<ItemAttributes> {
        let mut found: Vec<ItemAttributes> = self
            .bodies
            .values()
            .map(|body| body.attributes)
            .filter(|attrs| attrs.frame().intersects(&rect))
            .collect();
        found.sort_by_key(ItemAttributes::key);
        found
    }

    fn attachment_count(&self) -> usize {
        self.bodies.len()
    }

    fn advance(&mut self, dt: Duration) -> SimulationStep {
        let was_running = self.running;
        if !was_running {
            return SimulationStep::default();
        }

        for body in self.bodies.values_mut() {
            if !body.is_at_rest() {
                body.advance(dt);
            }
        }
        self.recompute_running();

        let step = SimulationStep {
            running: self.running,
            settled: !self.running,
        };
        if step.settled {
            tracing::debug!(attachments = self.bodies.len(), "animator settled");
        }
        step
    }
}
