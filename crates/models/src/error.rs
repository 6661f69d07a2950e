use hjb_core::DimensionError;
use thiserror::Error;

/// Errors raised while building a model from its configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("invalid {name}: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },

    #[error(transparent)]
    Dimension(#[from] DimensionError),
}

impl ModelError {
    /// Returns `Ok(())` when `condition` holds, otherwise an invalid-parameter error.
    pub(crate) fn require(
        condition: bool,
        name: &'static str,
        reason: &'static str,
    ) -> Result<(), Self> {
        if condition {
            Ok(())
        } else {
            Err(Self::InvalidParameter { name, reason })
        }
    }

    /// Requires a finite, non-negative value.
    pub(crate) fn non_negative(value: f64, name: &'static str) -> Result<(), Self> {
        Self::require(
            value.is_finite() && value >= 0.0,
            name,
            "must be finite and non-negative",
        )
    }

    /// Requires a finite, strictly positive value.
    pub(crate) fn positive(value: f64, name: &'static str) -> Result<(), Self> {
        Self::require(
            value.is_finite() && value > 0.0,
            name,
            "must be finite and positive",
        )
    }
}
