use hjb_core::DimensionError;

use crate::policy::PolicyError;

/// Errors that can occur during a rollout.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Dimension(#[from] DimensionError),

    #[error("dt must be finite and positive")]
    TimeStep,

    #[error("state became non-finite at step {step}")]
    NonFinite { step: usize },

    #[error("state {state} has no valid successor under action {action}")]
    Transition { state: usize, action: usize },
}
