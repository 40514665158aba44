#![forbid(unsafe_code)]

//! Damped harmonic oscillator (spring) along one axis.
//!
//! The classical damped spring with unit mass:
//!
//!   a = -stiffness × (position - target) - damping × velocity
//!
//! # Parameters
//!
//! - **stiffness** (k): Restoring force strength. Higher = faster response.
//! - **damping** (c): Velocity drag. Higher = less oscillation.
//!   - Underdamped (c < 2√k): oscillates past target before settling
//!   - Critically damped (c ≈ 2√k): fastest convergence without overshoot
//!   - Overdamped (c > 2√k): slow convergence, no overshoot
//! - **rest_threshold**: Position delta below which the spring is considered
//!   at rest. Default: 0.001.
//!
//! Attachment-style callers usually think in natural frequency (Hz) and
//! damping ratio instead; [`Spring::from_oscillation`] converts:
//! `k = (2πf)²`, `c = 2ζ·2πf`.
//!
//! # Integration
//!
//! Semi-implicit Euler. [`Spring::advance`] accepts a `Duration` and
//! subdivides it into steps of at most 4ms.
//!
//! # Invariants
//!
//! 1. A spring at rest will not resume unless `set_target()` or
//!    `set_position()` moves it beyond the rest threshold.
//! 2. Settling snaps the position exactly onto the target and zeroes velocity.
//! 3. Stiffness and damping are always positive (clamped on construction).
//!
//! # Failure Modes
//!
//! - Very large dt: work grows linearly with dt (one step per 4ms), so a
//!   resumed process can stall on one huge frame. Callers should cap dt to a
//!   frame budget; the layout engine caps each tick at 100ms.
//! - Zero stiffness: never converges; clamped to minimum 0.1.
//! - Zero damping: oscillates forever; `is_at_rest()` may never return true.

use std::f64::consts::TAU;
use std::time::Duration;

/// Maximum dt per integration step (4ms). Larger deltas are subdivided
/// for numerical stability with high stiffness values.
const MAX_STEP_SECS: f64 = 0.004;

/// Default rest threshold: position delta below which the spring is "at rest".
const DEFAULT_REST_THRESHOLD: f64 = 0.001;

/// Default velocity threshold: velocity below which (combined with position
/// threshold) the spring is considered at rest.
const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.01;

/// Minimum stiffness to prevent degenerate springs.
const MIN_STIFFNESS: f64 = 0.1;

/// Minimum natural frequency accepted by [`Spring::from_oscillation`].
const MIN_FREQUENCY_HZ: f64 = 0.01;

/// A damped harmonic oscillator producing physically-based motion.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use wavegrid_core::Spring;
///
/// // An item pushed 12 units above its anchor at y = 600.
/// let mut spring = Spring::from_oscillation(588.0, 600.0, 1.0, 0.8);
///
/// for _ in 0..60 * 4 {
///     spring.advance(Duration::from_millis(16));
/// }
///
/// assert!(spring.is_at_rest());
/// assert_eq!(spring.position(), 600.0);
/// ```
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    rest_threshold: f64,
    velocity_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring starting at `initial` and targeting `target`.
    ///
    /// Default parameters: stiffness = 170.0, damping = 26.0 (slightly
    /// underdamped, producing a subtle bounce).
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            stiffness: 170.0,
            damping: 26.0,
            rest_threshold: DEFAULT_REST_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            at_rest: initial == target,
        }
    }

    /// Create a spring from a natural frequency (Hz) and a damping ratio.
    ///
    /// A ratio of 1.0 is critically damped; 0.8 gives a soft single overshoot.
    /// Frequency is clamped to a small positive minimum, the ratio to >= 0.
    #[must_use]
    pub fn from_oscillation(initial: f64, target: f64, frequency_hz: f64, damping_ratio: f64) -> Self {
        let omega = TAU * frequency_hz.max(MIN_FREQUENCY_HZ);
        Self::new(initial, target)
            .with_stiffness(omega * omega)
            .with_damping(2.0 * damping_ratio.max(0.0) * omega)
    }

    /// Set stiffness (builder pattern). Clamped to minimum 0.1.
    #[must_use]
    pub fn with_stiffness(mut self, k: f64) -> Self {
        self.stiffness = k.max(MIN_STIFFNESS);
        self
    }

    /// Set damping (builder pattern). Clamped to minimum 0.0.
    #[must_use]
    pub fn with_damping(mut self, c: f64) -> Self {
        self.damping = c.max(0.0);
        self
    }

    /// Set rest threshold (builder pattern).
    #[must_use]
    pub fn with_rest_threshold(mut self, threshold: f64) -> Self {
        self.rest_threshold = threshold.abs();
        self
    }

    /// Set velocity threshold (builder pattern).
    #[must_use]
    pub fn with_velocity_threshold(mut self, threshold: f64) -> Self {
        self.velocity_threshold = threshold.abs();
        self
    }

    /// Current position (unclamped).
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current velocity.
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Current target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    #[inline]
    #[must_use]
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Compute the critical damping coefficient for the current stiffness.
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * self.stiffness.sqrt()
    }

    /// Damping relative to critical damping (ζ).
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping / self.critical_damping()
    }

    /// Change the target. Wakes the spring if it was at rest.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() > self.rest_threshold {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Move the spring to `position` without touching its velocity.
    ///
    /// This is the "continue from current state" update: whatever motion the
    /// spring had keeps going from the new position. Any off-target position
    /// wakes the spring, so even a sub-threshold nudge is snapped back on the
    /// next [`advance`](Self::advance).
    pub fn set_position(&mut self, position: f64) {
        self.position = position;
        if self.position != self.target {
            self.at_rest = false;
        }
    }

    /// Whether the spring has settled at the target.
    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Perform a single integration step of `dt` seconds.
    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let spring_force = -self.stiffness * displacement;
        let damping_force = -self.damping * self.velocity;
        let acceleration = spring_force + damping_force;

        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance the spring by `dt`, subdividing if necessary for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }

        let total_secs = dt.as_secs_f64();
        if total_secs <= 0.0 {
            return;
        }

        let mut remaining = total_secs;
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        let pos_delta = (self.position - self.target).abs();
        let vel_abs = self.velocity.abs();
        if pos_delta < self.rest_threshold && vel_abs < self.velocity_threshold {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}
