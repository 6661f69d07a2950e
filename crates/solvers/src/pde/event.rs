/// Progress event emitted once per sweep or time step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Completed sweeps or time steps, starting at 1.
    pub iteration: usize,

    /// Largest absolute change of any node during this iteration.
    pub residual: f64,

    /// Step used for this iteration.
    ///
    /// For the time-dependent solver the final step may be shorter so the
    /// march lands exactly on the horizon.
    pub time_step: f64,

    /// Time covered so far, in pseudo-time for the steady solver.
    pub elapsed: f64,
}
