/// Control actions supported by value iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop iterating and return the current value array.
    StopEarly,
}
