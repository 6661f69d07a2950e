use hjb_core::{DimensionError, Vector};

/// Errors raised when a policy is queried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("no policy entry for state {state:?}")]
    UnknownState { state: Vector },

    #[error(transparent)]
    Dimension(#[from] DimensionError),
}
