use hjb_core::{ControlBounds, DimensionError, Dynamics, Vector};
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// A planar vehicle moving at constant speed with a bounded turn rate.
///
/// The state is `[x, y, heading]` and the control is the turn rate `[ω]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DubinsCar {
    speed: f64,
    turn_rate: f64,
    control_resolution: f64,
    bounds: [ControlBounds; 1],
}

/// Parameters of a [`DubinsCar`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DubinsCarConfig {
    pub speed: f64,
    pub turn_rate: f64,
    pub control_resolution: f64,
}

impl Default for DubinsCarConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            turn_rate: 1.0,
            control_resolution: 0.25,
        }
    }
}

impl DubinsCar {
    /// Creates a Dubins car from validated parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if any parameter is negative, non-finite, or
    /// the resolution is not positive.
    pub fn new(config: DubinsCarConfig) -> Result<Self, ModelError> {
        let DubinsCarConfig {
            speed,
            turn_rate,
            control_resolution,
        } = config;

        ModelError::non_negative(speed, "speed")?;
        ModelError::non_negative(turn_rate, "turnRate")?;
        ModelError::positive(control_resolution, "controlResolution")?;

        Ok(Self {
            speed,
            turn_rate,
            control_resolution,
            bounds: [ControlBounds::symmetric(turn_rate)],
        })
    }
}

impl Dynamics for DubinsCar {
    fn state_dim(&self) -> usize {
        3
    }

    fn control_dim(&self) -> usize {
        1
    }

    fn control_bounds(&self) -> &[ControlBounds] {
        &self.bounds
    }

    fn control_resolution(&self) -> f64 {
        self.control_resolution
    }

    fn evaluate(&self, state: &[f64], control: &[f64]) -> Result<Vector, DimensionError> {
        self.check_dimensions(state, control)?;
        let heading = state[2];
        Ok(vec![
            self.speed * heading.cos(),
            self.speed * heading.sin(),
            control[0],
        ])
    }

    fn max_speed(&self) -> f64 {
        self.speed.max(self.turn_rate)
    }
}
