use hjb_core::DimensionError;

use super::ConfigError;

/// Errors that can occur during a PDE solve.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dimension(#[from] DimensionError),

    #[error("value at node {index} became non-finite in iteration {iteration}")]
    NonFinite { iteration: usize, index: usize },
}
