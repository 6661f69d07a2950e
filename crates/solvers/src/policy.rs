//! Feedback policies derived from solved value functions.
//!
//! - [`extract_greedy_policy`] picks the minimizing action of every MDP state.
//! - [`ValuePolicy`] reads a continuous feedback law off a PDE value field.
//!
//! Both implement [`Policy`], as do closures, so the rollout simulator can
//! drive any of them.

mod error;
mod greedy;
mod value;

pub use error::PolicyError;
pub use greedy::{GreedyPolicy, TIE_TOLERANCE, extract_greedy_policy};
pub use value::ValuePolicy;

use hjb_core::Vector;

/// Maps a state to the control to apply there.
pub trait Policy {
    /// Returns the control for `state`.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::UnknownState`] if the policy has no entry for
    /// `state`, or a dimension error if `state` has the wrong length.
    fn control(&self, state: &[f64]) -> Result<Vector, PolicyError>;
}

impl<F> Policy for F
where
    F: Fn(&[f64]) -> Result<Vector, PolicyError>,
{
    fn control(&self, state: &[f64]) -> Result<Vector, PolicyError> {
        self(state)
    }
}
