#![forbid(unsafe_code)]

//! Layout: a spring-driven grid layout with a wave-like scroll reaction.
//!
//! # Role in wavegrid
//! `wavegrid-layout` sits between a host's scroll view and a
//! [`SimulationService`](wavegrid_dynamics::SimulationService). The host
//! forwards two events, a layout pass and a bounds change, and asks for item
//! attributes when it draws. Everything in between happens here.
//!
//! # Pipeline
//! 1. [`VisibilityTracker`] diffs the buffered viewport against the
//!    [`ActiveSet`].
//! 2. [`AttachmentRegistry`] removes stale springs, then rounds and attaches
//!    the new ones.
//! 3. On scroll, [`reaction`] turns the delta into a per-item shift and the
//!    engine pushes it into the simulation.
//!
//! [`SpringFlowLayout`] wires the three together. [`FlowLayout`] is a static
//! geometry provider for hosts that do not bring their own.

pub mod config;
pub mod engine;
pub mod error;
pub mod flow;
pub mod provider;
pub mod reaction;
pub mod registry;
pub mod visibility;

pub use config::{ConfigError, SpringLayoutConfig};
pub use engine::{LayoutPassReport, MAX_FRAME_DT, SpringFlowLayout};
pub use error::LayoutError;
pub use flow::{EdgeInsets, FlowLayout, FlowLayoutConfig};
pub use provider::{PointerSource, SizingCallback, StaticLayout};
pub use reaction::{ScrollReactionConfig, ScrollState};
pub use registry::{AttachmentRegistry, SpringAttachment};
pub use visibility::{ActiveSet, VisibilityDiff, VisibilityTracker};

pub use wavegrid_dynamics::{SimulationService, SpringAnimator, SpringParams};
