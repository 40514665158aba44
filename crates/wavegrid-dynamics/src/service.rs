#![forbid(unsafe_code)]

//! The capability interface between the layout engine and a physics solver.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wavegrid_core::{ElementKey, ItemAttributes, Point, Rect};

/// Opaque handle to one attachment inside a [`SimulationService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttachmentHandle(u64);

impl AttachmentHandle {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AttachmentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Parameters of the spring between an item and its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringParams {
    /// Distance the item rests from its anchor. 0 pins the center on it.
    pub length: f64,
    /// Damping ratio (ζ). 1.0 is critically damped.
    pub damping: f64,
    /// Natural frequency in Hz.
    pub frequency: f64,
    /// Rotational friction. Carried for hosts that simulate rotation; the
    /// built-in animator is translation-only.
    pub friction_torque: Option<f64>,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            length: 0.0,
            damping: 0.8,
            frequency: 1.0,
            friction_torque: None,
        }
    }
}

/// What happened during one [`SimulationService::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimulationStep {
    /// Some attachment is still moving after the step.
    pub running: bool,
    /// The service went from running to idle during this step.
    pub settled: bool,
}

/// An opaque spring solver.
///
/// Implementations own the simulated copy of every attached item. Callers
/// identify attachments by the handle returned from
/// [`create_attachment`](Self::create_attachment) and never look inside the
/// solver's integration step.
pub trait SimulationService {
    /// Attach `item` to `anchor` with a spring. Replaces any existing
    /// attachment for the same [`ElementKey`].
    fn create_attachment(
        &mut self,
        item: ItemAttributes,
        anchor: Point,
        params: &SpringParams,
    ) -> AttachmentHandle;

    /// Destroy an attachment, returning its last simulated state.
    /// Unknown handles return `None`.
    fn remove_attachment(&mut self, handle: AttachmentHandle) -> Option<ItemAttributes>;

    /// Re-evaluate an attachment starting from `state`. Any velocity the
    /// spring had is kept; only the position jumps. Returns `false` for an
    /// unknown handle.
    fn update_attachment(&mut self, handle: AttachmentHandle, state: ItemAttributes) -> bool;

    /// Current simulated state of the attachment behind `handle`.
    fn attachment_state(&self, handle: AttachmentHandle) -> Option<ItemAttributes>;

    /// Current simulated state of the element `key`, if it is attached.
    fn query_state(&self, key: ElementKey) -> Option<ItemAttributes>;

    /// Whether any attachment is still settling.
    fn is_running(&self) -> bool;

    /// Simulated attributes of every attached element whose frame intersects
    /// `rect`.
    fn attributes_in_rect(&self, rect: Rect) -> Vec<ItemAttributes>;

    /// Number of live attachments.
    fn attachment_count(&self) -> usize;

    /// Step the solver forward by `dt`.
    fn advance(&mut self, dt: Duration) -> SimulationStep;
}
