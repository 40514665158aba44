#![forbid(unsafe_code)]

//! Core: geometry, grid item model, and the damped spring integrator.
//!
//! # Role in wavegrid
//! `wavegrid-core` holds the value types every other crate speaks in.
//! The animator (`wavegrid-dynamics`) moves [`ItemAttributes`] around with
//! [`Spring`]s, and the layout engine (`wavegrid-layout`) decides which items
//! get a spring at all.
//!
//! # Primary responsibilities
//! - **Geometry**: floating-point [`Point`], [`Size`], [`Rect`].
//! - **Item model**: [`GridPosition`], [`ElementCategory`], [`ItemAttributes`].
//! - **Spring**: a 1-D damped harmonic oscillator stepped per frame.

pub mod geometry;
pub mod item;
pub mod spring;

pub use geometry::{Point, Rect, Size};
pub use item::{ElementCategory, ElementKey, GridPosition, ItemAttributes};
pub use spring::Spring;
