use hjb_core::DimensionError;
use thiserror::Error;

/// Errors that can occur when building a grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("grid must have at least one axis")]
    NoAxes,

    #[error("axis {axis} has no nodes")]
    EmptyAxis { axis: usize },

    #[error("axis {axis} spacing must be finite and positive")]
    Spacing { axis: usize },

    #[error("axis {axis} origin must be finite")]
    Origin { axis: usize },

    #[error("axis {axis} upper bound must exceed its lower bound")]
    Bounds { axis: usize },

    #[error("grid has more nodes than can be addressed")]
    TooLarge,

    #[error(transparent)]
    Dimension(#[from] DimensionError),
}
