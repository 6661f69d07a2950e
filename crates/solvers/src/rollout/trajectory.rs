use hjb_core::Vector;
use serde::{Deserialize, Serialize};

/// Indicates how a rollout terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Completed all requested steps.
    Complete,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// A simulated path through the state space.
///
/// `states` and `times` hold one entry per visited state, starting with the
/// initial one; `controls[k]` is the control applied between `states[k]` and
/// `states[k + 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub status: Status,
    pub times: Vec<f64>,
    pub states: Vec<Vector>,
    pub controls: Vec<Vector>,

    /// Accumulated running cost plus the terminal cost of the last state.
    pub cost: f64,
}

impl Trajectory {
    /// Number of steps taken.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.controls.len()
    }

    /// The last visited state.
    #[must_use]
    pub fn final_state(&self) -> Option<&Vector> {
        self.states.last()
    }
}
