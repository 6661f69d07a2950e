/// Control actions supported by the rollout simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the rollout and return the trajectory so far.
    StopEarly,
}
