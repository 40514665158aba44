#![forbid(unsafe_code)]

//! Harness: sample data and scripted drag sessions for the wavegrid layout.
//!
//! The binary builds the sample produce catalog, lays it out with
//! [`FlowLayout`](wavegrid_layout::FlowLayout), and plays a finger drag
//! against a [`SpringFlowLayout`](wavegrid_layout::SpringFlowLayout), logging
//! one summary per frame.

pub mod catalog;
pub mod cli;
pub mod error;
pub mod session;

pub use catalog::{Catalog, Section, Vegetable};
pub use cli::{Cli, run, run_from_env};
pub use error::{HarnessError, Result};
pub use session::{DragScript, FrameSummary, Phase, Session, SessionReport};
