#![forbid(unsafe_code)]

//! Dynamics: the simulation service that owns every live spring.
//!
//! The layout engine never integrates anything itself. It hands items to a
//! [`SimulationService`], nudges them on scroll, and asks where they are now.
//! [`SpringAnimator`] is the default service: one pair of 1-D springs per
//! attachment, stepped by the host once per frame.

pub mod animator;
pub mod service;

pub use animator::SpringAnimator;
pub use service::{AttachmentHandle, SimulationService, SimulationStep, SpringParams};
