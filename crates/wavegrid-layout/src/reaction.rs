#![forbid(unsafe_code)]

//! Scroll reaction: how far one item lags behind a scroll step.
//!
//! Items farther from the pointer react more strongly, so a drag produces a
//! wave that spreads out from the finger:
//!
//! ```text
//! r     = (|P.y − A.y| + |P.x − A.x|) / resistance
//! Δ < 0 : shift = max(Δ, Δ·r)      (never larger in magnitude than Δ)
//! Δ ≥ 0 : shift = min(Δ, Δ·r)
//! ```
//!
//! With the optional limit enabled the result is additionally clamped to
//! `[-limit, limit]`.
//!
//! Everything here is a pure function of its inputs; the engine applies the
//! result.

use serde::{Deserialize, Serialize};
use wavegrid_core::Point;

/// Default distance that yields a resistance factor of 1.
pub const DEFAULT_RESISTANCE: f64 = 1500.0;

/// Default shift limit (only applied when the limit is enabled).
pub const DEFAULT_SHIFT_LIMIT: f64 = 5.0;

/// Tuning for the scroll reaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollReactionConfig {
    /// Pointer distance (Manhattan) at which an item follows the full delta.
    pub resistance: f64,
    /// Clamp each shift to `limit` in magnitude.
    pub limit_enabled: bool,
    pub limit: f64,
}

impl Default for ScrollReactionConfig {
    fn default() -> Self {
        Self {
            resistance: DEFAULT_RESISTANCE,
            limit_enabled: false,
            limit: DEFAULT_SHIFT_LIMIT,
        }
    }
}

/// Scroll inputs recorded at the most recent bounds change.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    /// Signed vertical delta; negative when the content offset decreased.
    pub delta: f64,
    /// Pointer location at that moment, if a gesture was active.
    pub pointer: Option<Point>,
}

impl ScrollState {
    /// Shift for an item anchored at `anchor`, or `None` without a pointer.
    #[must_use]
    pub fn shift_for(&self, anchor: Point, config: &ScrollReactionConfig) -> Option<f64> {
        scroll_shift(self.delta, self.pointer, anchor, config)
    }
}

/// Distance-proportional resistance factor between pointer and anchor.
#[must_use]
pub fn scroll_resistance(pointer: Point, anchor: Point, resistance: f64) -> f64 {
    pointer.manhattan_distance(anchor) / resistance
}

/// Vertical shift for one item. `None` when there is no pointer.
#[must_use]
pub fn scroll_shift(
    delta: f64,
    pointer: Option<Point>,
    anchor: Point,
    config: &ScrollReactionConfig,
) -> Option<f64> {
    let pointer = pointer?;
    let r = scroll_resistance(pointer, anchor, config.resistance);
    let scaled = delta * r;

    let shift = if delta < 0.0 {
        let shift = delta.max(scaled);
        if config.limit_enabled && shift < -config.limit {
            -config.limit
        } else {
            shift
        }
    } else {
        let shift = delta.min(scaled);
        if config.limit_enabled && shift > config.limit {
            config.limit
        } else {
            shift
        }
    };
    Some(shift)
}
