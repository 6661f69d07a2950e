use thiserror::Error;

/// Configuration for value iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    discount: f64,
    tolerance: f64,
    max_iters: usize,
}

/// Errors that can occur when validating an MDP config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("discount must be in (0, 1]")]
    Discount,

    #[error("tolerance must be finite and non-negative")]
    Tolerance,

    #[error("dt must be finite and positive")]
    TimeStep,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            discount: 0.95,
            tolerance: 1e-6,
            max_iters: 2000,
        }
    }
}

impl Config {
    /// Creates a new config with a validated discount and tolerance.
    ///
    /// # Errors
    ///
    /// Returns an error if `discount` is outside `(0, 1]` or `tolerance` is
    /// negative or non-finite.
    pub fn new(discount: f64, tolerance: f64, max_iters: usize) -> Result<Self, ConfigError> {
        check_discount(discount)?;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::Tolerance);
        }

        Ok(Self {
            discount,
            tolerance,
            max_iters,
        })
    }

    /// Returns the discount factor applied to successor values.
    #[must_use]
    pub fn discount(&self) -> f64 {
        self.discount
    }

    /// Returns the residual below which iteration stops.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the maximum number of sweeps.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }
}

pub(crate) fn check_discount(discount: f64) -> Result<(), ConfigError> {
    if discount > 0.0 && discount <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Discount)
    }
}
