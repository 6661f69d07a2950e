/// Indicates how a PDE solve terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The residual fell below the configured tolerance.
    Converged,

    /// The time-dependent solver reached its horizon.
    Complete,

    /// The steady solver reached its iteration limit without converging.
    MaxIters,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of a PDE solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Final solver status.
    pub status: Status,

    /// Value at every grid node, in row-major order.
    pub value: Vec<f64>,

    /// Sweeps or time steps performed.
    pub iterations: usize,

    /// Residual of the last iteration, or infinity if none ran.
    pub residual: f64,

    /// Nominal step used by the solve.
    pub time_step: f64,
}
