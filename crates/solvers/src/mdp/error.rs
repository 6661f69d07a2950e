use hjb_core::DimensionError;

use super::ConfigError;

/// Errors that can occur while building or solving an MDP.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dimension(#[from] DimensionError),

    #[error("the model has no actions")]
    NoActions,

    #[error("{states} states with {actions} actions each is too many transitions to tabulate")]
    TooLarge { states: usize, actions: usize },

    #[error("transition from state {state} under action {action} targets unknown state {next}")]
    TransitionOutOfRange {
        state: usize,
        action: usize,
        next: usize,
    },

    #[error("value of state {state} became non-finite in iteration {iteration}")]
    NonFinite { iteration: usize, state: usize },
}
