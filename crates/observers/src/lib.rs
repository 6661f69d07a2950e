//! Reusable observers for HJB solvers.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work across the PDE, value iteration, and rollout solvers.
//!
//! # Modules
//!
//! - [`traits`] — Capability traits for cross-solver observers
//!   ([`HasIteration`], [`HasResidual`], [`CanStopEarly`])
//!
//! # Observers
//!
//! - [`ProgressLog`] — forwards every `stride`-th event to `tracing`
//! - [`Deadline`] — stops a solve once a wall-clock budget is spent
//! - [`Chain`] — lets two observers watch the same solve
//!
//! [`Observer`]: hjb_core::Observer
//! [`HasIteration`]: traits::HasIteration
//! [`HasResidual`]: traits::HasResidual
//! [`CanStopEarly`]: traits::CanStopEarly

mod chain;
mod deadline;
mod progress;
pub mod traits;

pub use chain::{Chain, chain};
pub use deadline::Deadline;
pub use progress::ProgressLog;
