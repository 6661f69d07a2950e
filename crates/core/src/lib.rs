//! Core traits and types for HJB optimal control.
//!
//! This crate defines the shared abstractions that models, solvers, and the
//! job service build on:
//!
//! - [`Dynamics`] — maps a state and control to a state derivative, and
//!   describes the admissible control set
//! - [`Cost`] — stage and terminal cost of a control problem
//! - [`Observer`] — receives solver events and optionally returns control actions
//! - [`Vector`] and [`DimensionError`] — the plain numeric vectors every solver
//!   passes around, and the error raised when their lengths disagree

mod cost;
mod dynamics;
mod observer;
mod vector;

pub use cost::Cost;
pub use dynamics::{ControlBounds, Dynamics};
pub use observer::Observer;
pub use vector::{DimensionError, Vector, dot};
