/// Indicates whether value iteration converged or hit the iteration limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The residual fell below the configured tolerance.
    Converged,

    /// Reached the iteration limit without converging.
    MaxIters,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of value iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub status: Status,

    /// Value of every state, in the model's state order.
    pub value: Vec<f64>,

    pub iterations: usize,

    /// Residual of the last sweep, or infinity if none ran.
    pub residual: f64,
}
