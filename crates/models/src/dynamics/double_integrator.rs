use hjb_core::{ControlBounds, DimensionError, Dynamics, Vector};
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Point masses with actuated, linearly damped velocities.
///
/// The state is `[p_1..p_n, v_1..v_n]` and the control is `[u_1..u_n]`:
///
/// ```text
/// p' = v
/// v' = u - damping * v
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DoubleIntegrator {
    position_dimension: usize,
    control_limit: f64,
    damping: f64,
    control_resolution: f64,
    velocity_limit: f64,
    bounds: Vec<ControlBounds>,
}

/// Parameters of a [`DoubleIntegrator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DoubleIntegratorConfig {
    #[serde(alias = "dimension")]
    pub position_dimension: usize,
    pub control_limit: f64,
    pub damping: f64,
    pub control_resolution: f64,

    /// Largest velocity magnitude the modeled domain contains.
    ///
    /// Positions advect at the velocity, so this bounds the characteristic
    /// speed of the position axes.
    pub velocity_limit: f64,
}

impl Default for DoubleIntegratorConfig {
    fn default() -> Self {
        Self {
            position_dimension: 1,
            control_limit: 2.0,
            damping: 0.2,
            control_resolution: 0.5,
            velocity_limit: 5.0,
        }
    }
}

impl DoubleIntegrator {
    /// Creates a double integrator from validated parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if any parameter is out of range.
    pub fn new(config: DoubleIntegratorConfig) -> Result<Self, ModelError> {
        let DoubleIntegratorConfig {
            position_dimension,
            control_limit,
            damping,
            control_resolution,
            velocity_limit,
        } = config;

        ModelError::require(
            position_dimension > 0,
            "positionDimension",
            "must be at least 1",
        )?;
        ModelError::non_negative(control_limit, "controlLimit")?;
        ModelError::non_negative(damping, "damping")?;
        ModelError::positive(control_resolution, "controlResolution")?;
        ModelError::non_negative(velocity_limit, "velocityLimit")?;

        Ok(Self {
            position_dimension,
            control_limit,
            damping,
            control_resolution,
            velocity_limit,
            bounds: vec![ControlBounds::symmetric(control_limit); position_dimension],
        })
    }

    /// Number of position (and velocity) axes.
    #[must_use]
    pub fn position_dimension(&self) -> usize {
        self.position_dimension
    }
}

impl Dynamics for DoubleIntegrator {
    fn state_dim(&self) -> usize {
        2 * self.position_dimension
    }

    fn control_dim(&self) -> usize {
        self.position_dimension
    }

    fn control_bounds(&self) -> &[ControlBounds] {
        &self.bounds
    }

    fn control_resolution(&self) -> f64 {
        self.control_resolution
    }

    fn evaluate(&self, state: &[f64], control: &[f64]) -> Result<Vector, DimensionError> {
        self.check_dimensions(state, control)?;

        let (_, velocity) = state.split_at(self.position_dimension);
        let accelerations = velocity
            .iter()
            .zip(control)
            .map(|(v, u)| u - self.damping * v);

        Ok(velocity.iter().copied().chain(accelerations).collect())
    }

    fn max_speed(&self) -> f64 {
        self.velocity_limit
            .max(self.control_limit + self.damping * self.velocity_limit)
    }
}
