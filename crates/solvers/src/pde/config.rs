use thiserror::Error;

/// Courant number applied to the stable step when none is given.
pub const DEFAULT_CFL: f64 = 0.8;

/// Configuration for the steady-state solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteadyConfig {
    /// Maximum number of Gauss-Seidel sweeps.
    pub max_iters: usize,

    /// Residual below which the field counts as converged.
    pub tolerance: f64,

    /// Relaxation factor `ω` in `(0, 1]` scaling every update.
    pub relaxation: f64,

    /// Discount rate `λ ≥ 0`.
    pub discount_rate: f64,

    /// Pseudo-time step. `None` uses the CFL-stable step.
    pub time_step: Option<f64>,

    /// Courant number used to derive the default step.
    pub cfl: f64,
}

/// Configuration for the time-dependent solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransientConfig {
    /// Time span to march the cost-to-go backward over.
    pub horizon: f64,

    /// Residual below which the march exits early.
    pub tolerance: f64,

    /// Discount rate `λ ≥ 0`.
    pub discount_rate: f64,

    /// Time step. `None` uses the CFL-stable step.
    ///
    /// An explicit step is accepted as given, even when it exceeds the CFL
    /// bound.
    pub time_step: Option<f64>,

    /// Courant number used to derive the default step.
    pub cfl: f64,
}

/// Errors that can occur when validating a PDE solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tolerance must be finite and non-negative")]
    Tolerance,

    #[error("relaxation must be in (0, 1]")]
    Relaxation,

    #[error("discount_rate must be finite and non-negative")]
    DiscountRate,

    #[error("time_step must be finite and positive")]
    TimeStep,

    #[error("horizon must be finite and positive")]
    Horizon,

    #[error("cfl must be in (0, 1]")]
    Cfl,
}

impl Default for SteadyConfig {
    fn default() -> Self {
        Self {
            max_iters: 1000,
            tolerance: 1e-6,
            relaxation: 1.0,
            discount_rate: 0.0,
            time_step: None,
            cfl: DEFAULT_CFL,
        }
    }
}

impl Default for TransientConfig {
    fn default() -> Self {
        Self {
            horizon: 1.0,
            tolerance: 1e-6,
            discount_rate: 0.0,
            time_step: None,
            cfl: DEFAULT_CFL,
        }
    }
}

impl SteadyConfig {
    /// Checks every field against its admissible range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_tolerance(self.tolerance)?;
        if !(self.relaxation > 0.0 && self.relaxation <= 1.0) {
            return Err(ConfigError::Relaxation);
        }
        check_common(self.discount_rate, self.time_step, self.cfl)
    }
}

impl TransientConfig {
    /// Checks every field against its admissible range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.horizon.is_finite() || self.horizon <= 0.0 {
            return Err(ConfigError::Horizon);
        }
        check_tolerance(self.tolerance)?;
        check_common(self.discount_rate, self.time_step, self.cfl)
    }
}

fn check_tolerance(tolerance: f64) -> Result<(), ConfigError> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(ConfigError::Tolerance);
    }
    Ok(())
}

fn check_common(discount_rate: f64, time_step: Option<f64>, cfl: f64) -> Result<(), ConfigError> {
    if !discount_rate.is_finite() || discount_rate < 0.0 {
        return Err(ConfigError::DiscountRate);
    }
    if let Some(dt) = time_step {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::TimeStep);
        }
    }
    if !(cfl > 0.0 && cfl <= 1.0) {
        return Err(ConfigError::Cfl);
    }
    Ok(())
}
