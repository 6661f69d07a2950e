use hjb_core::Vector;

/// Event emitted by the rollout simulator for each visited state.
///
/// Step 0 is the start state before any control is applied.
/// Steps 1..N are emitted after each integration step.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub step: usize,
    pub time: f64,
    pub state: Vector,

    /// Running cost accumulated so far, excluding the terminal cost.
    pub cost: f64,
}
