/// Progress event emitted after every Bellman sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Completed sweeps, starting at 1.
    pub iteration: usize,

    /// Largest absolute change of any state value during this sweep.
    pub residual: f64,
}
