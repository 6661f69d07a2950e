/// Control actions supported by the PDE solvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the solver early and return the current value field.
    StopEarly,
}
