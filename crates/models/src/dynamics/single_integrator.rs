use hjb_core::{ControlBounds, DimensionError, Dynamics, Vector};
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// A kinematic point whose velocity is the control: `x' = u`.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleIntegrator {
    dimension: usize,
    control_limit: f64,
    control_resolution: f64,
    bounds: Vec<ControlBounds>,
}

/// Parameters of a [`SingleIntegrator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SingleIntegratorConfig {
    pub dimension: usize,
    pub control_limit: f64,
    pub control_resolution: f64,
}

impl Default for SingleIntegratorConfig {
    fn default() -> Self {
        Self {
            dimension: 2,
            control_limit: 3.0,
            control_resolution: 0.5,
        }
    }
}

impl SingleIntegrator {
    /// Creates a single integrator from validated parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if the dimension is zero, the control limit is
    /// negative or non-finite, or the resolution is not positive.
    pub fn new(config: SingleIntegratorConfig) -> Result<Self, ModelError> {
        let SingleIntegratorConfig {
            dimension,
            control_limit,
            control_resolution,
        } = config;

        ModelError::require(dimension > 0, "dimension", "must be at least 1")?;
        ModelError::non_negative(control_limit, "controlLimit")?;
        ModelError::positive(control_resolution, "controlResolution")?;

        Ok(Self {
            dimension,
            control_limit,
            control_resolution,
            bounds: vec![ControlBounds::symmetric(control_limit); dimension],
        })
    }
}

impl Dynamics for SingleIntegrator {
    fn state_dim(&self) -> usize {
        self.dimension
    }

    fn control_dim(&self) -> usize {
        self.dimension
    }

    fn control_bounds(&self) -> &[ControlBounds] {
        &self.bounds
    }

    fn control_resolution(&self) -> f64 {
        self.control_resolution
    }

    fn evaluate(&self, state: &[f64], control: &[f64]) -> Result<Vector, DimensionError> {
        self.check_dimensions(state, control)?;
        Ok(control.to_vec())
    }

    fn max_speed(&self) -> f64 {
        self.control_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_is_the_control() {
        let model = SingleIntegrator::new(SingleIntegratorConfig::default()).unwrap();
        assert_eq!(model.state_dim(), 2);
        assert_eq!(model.evaluate(&[1.0, 2.0], &[0.5, -1.0]).unwrap(), vec![0.5, -1.0]);
        assert_eq!(model.max_speed(), 3.0);
    }

    #[test]
    fn rejects_wrong_lengths() {
        let model = SingleIntegrator::new(SingleIntegratorConfig::default()).unwrap();
        assert!(model.evaluate(&[1.0], &[0.5, -1.0]).is_err());
        assert!(model.evaluate(&[1.0, 2.0], &[0.5]).is_err());
    }

    #[test]
    fn rejects_zero_dimension() {
        let config = SingleIntegratorConfig {
            dimension: 0,
            ..SingleIntegratorConfig::default()
        };
        assert!(matches!(
            SingleIntegrator::new(config),
            Err(ModelError::InvalidParameter {
                name: "dimension",
                ..
            })
        ));
    }
}
