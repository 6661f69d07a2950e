//! Traits that let one observer serve every solver in `hjb-solvers`.
//!
//! Events expose what they report through [`HasIteration`] and
//! [`HasResidual`]; actions that can end a solve implement [`CanStopEarly`].
//!
//! # Example
//!
//! An observer that caps a solve at a fixed number of reported iterations,
//! whichever solver runs it:
//!
//! ```rust
//! use hjb_core::Observer;
//! use hjb_observers::traits::{CanStopEarly, HasIteration};
//!
//! struct IterationCap(usize);
//!
//! impl<E: HasIteration, A: CanStopEarly> Observer<E, A> for IterationCap {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         (event.iteration() >= self.0).then(A::stop_early)
//!     }
//! }
//! ```

use hjb_solvers::{mdp, pde, rollout};

/// An event that carries an iteration or step count.
pub trait HasIteration {
    /// Returns the iteration (or step) this event reports on.
    fn iteration(&self) -> usize;
}

/// An event that carries a residual value.
pub trait HasResidual {
    /// Returns the residual for this event.
    fn residual(&self) -> f64;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

// --- HasIteration impls ---

impl HasIteration for pde::Event {
    fn iteration(&self) -> usize {
        self.iteration
    }
}

impl HasIteration for mdp::Event {
    fn iteration(&self) -> usize {
        self.iteration
    }
}

impl HasIteration for rollout::Event {
    fn iteration(&self) -> usize {
        self.step
    }
}

// --- HasResidual impls ---

impl HasResidual for pde::Event {
    fn residual(&self) -> f64 {
        self.residual
    }
}

impl HasResidual for mdp::Event {
    fn residual(&self) -> f64 {
        self.residual
    }
}

// --- CanStopEarly impls ---

impl CanStopEarly for pde::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

impl CanStopEarly for mdp::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

impl CanStopEarly for rollout::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
