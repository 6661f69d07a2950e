use hjb_core::{ControlBounds, Cost, DimensionError, Dynamics, Vector};
use serde::{Deserialize, Serialize};

use crate::{
    DoubleIntegrator, DoubleIntegratorConfig, DubinsCar, DubinsCarConfig, ModelError, Obstacle,
    ObstacleCost, QuadraticCost, SingleIntegrator, SingleIntegratorConfig, with_obstacle_cost,
};

/// Serializable description of a built-in dynamics model.
///
/// ```json
/// { "type": "double_integrator", "options": { "dimension": 1, "controlLimit": 2 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DynamicsSpec {
    SingleIntegrator {
        #[serde(default)]
        options: SingleIntegratorConfig,
    },
    DoubleIntegrator {
        #[serde(default)]
        options: DoubleIntegratorConfig,
    },
    Dubins {
        #[serde(default)]
        options: DubinsCarConfig,
    },
}

impl DynamicsSpec {
    /// Validates the description into a concrete model.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if the parameters are invalid.
    pub fn build(&self) -> Result<AnyDynamics, ModelError> {
        Ok(match *self {
            Self::SingleIntegrator { options } => {
                AnyDynamics::SingleIntegrator(SingleIntegrator::new(options)?)
            }
            Self::DoubleIntegrator { options } => {
                AnyDynamics::DoubleIntegrator(DoubleIntegrator::new(options)?)
            }
            Self::Dubins { options } => AnyDynamics::Dubins(DubinsCar::new(options)?),
        })
    }
}

/// Serializable description of a built-in cost model.
///
/// Missing weights default to one per axis of the dynamics the cost is
/// built against; a missing goal means the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum CostSpec {
    Quadratic {
        state_weights: Option<Vector>,
        control_weights: Option<Vector>,
        goal: Option<Vector>,
    },
    QuadraticWithObstacles {
        state_weights: Option<Vector>,
        control_weights: Option<Vector>,
        goal: Option<Vector>,
        #[serde(default)]
        obstacles: Vec<Obstacle>,
    },
}

impl CostSpec {
    /// Validates the description against the dimensions of a dynamics model.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if a weight vector or obstacle center does not
    /// fit the dynamics, or a parameter is out of range.
    pub fn build(&self, state_dim: usize, control_dim: usize) -> Result<AnyCost, ModelError> {
        match self {
            Self::Quadratic {
                state_weights,
                control_weights,
                goal,
            } => {
                let base = quadratic(state_weights, control_weights, goal, state_dim, control_dim)?;
                Ok(AnyCost::Quadratic(base))
            }
            Self::QuadraticWithObstacles {
                state_weights,
                control_weights,
                goal,
                obstacles,
            } => {
                let base = quadratic(state_weights, control_weights, goal, state_dim, control_dim)?;
                for obstacle in obstacles {
                    obstacle.validate()?;
                    ModelError::require(
                        obstacle.center.len() <= state_dim,
                        "obstacle center",
                        "has more axes than the state",
                    )?;
                }
                Ok(AnyCost::WithObstacles(with_obstacle_cost(
                    base,
                    obstacles.clone(),
                )))
            }
        }
    }
}

fn quadratic(
    state_weights: &Option<Vector>,
    control_weights: &Option<Vector>,
    goal: &Option<Vector>,
    state_dim: usize,
    control_dim: usize,
) -> Result<QuadraticCost, ModelError> {
    let state_weights = state_weights
        .clone()
        .unwrap_or_else(|| vec![1.0; state_dim]);
    let control_weights = control_weights
        .clone()
        .unwrap_or_else(|| vec![1.0; control_dim]);

    DimensionError::check("stateWeights", state_dim, &state_weights)?;
    DimensionError::check("controlWeights", control_dim, &control_weights)?;

    QuadraticCost::new(state_weights, control_weights, goal.clone())
}

/// Any built-in dynamics model, selected by its spec tag.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyDynamics {
    SingleIntegrator(SingleIntegrator),
    DoubleIntegrator(DoubleIntegrator),
    Dubins(DubinsCar),
}

impl AnyDynamics {
    fn inner(&self) -> &dyn Dynamics {
        match self {
            Self::SingleIntegrator(model) => model,
            Self::DoubleIntegrator(model) => model,
            Self::Dubins(model) => model,
        }
    }
}

impl Dynamics for AnyDynamics {
    fn state_dim(&self) -> usize {
        self.inner().state_dim()
    }

    fn control_dim(&self) -> usize {
        self.inner().control_dim()
    }

    fn control_bounds(&self) -> &[ControlBounds] {
        self.inner().control_bounds()
    }

    fn control_resolution(&self) -> f64 {
        self.inner().control_resolution()
    }

    fn evaluate(&self, state: &[f64], control: &[f64]) -> Result<Vector, DimensionError> {
        self.inner().evaluate(state, control)
    }

    fn max_speed(&self) -> f64 {
        self.inner().max_speed()
    }

    fn characteristic_speeds(
        &self,
        state: &[f64],
        control: &[f64],
    ) -> Result<Vector, DimensionError> {
        self.inner().characteristic_speeds(state, control)
    }
}

/// Any built-in cost model, selected by its spec tag.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyCost {
    Quadratic(QuadraticCost),
    WithObstacles(ObstacleCost<QuadraticCost>),
}

impl Cost for AnyCost {
    fn stage(&self, state: &[f64], control: &[f64]) -> f64 {
        match self {
            Self::Quadratic(cost) => cost.stage(state, control),
            Self::WithObstacles(cost) => cost.stage(state, control),
        }
    }

    fn terminal(&self, state: &[f64]) -> f64 {
        match self {
            Self::Quadratic(cost) => cost.terminal(state),
            Self::WithObstacles(cost) => cost.terminal(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn parses_and_builds_dynamics() {
        let spec: DynamicsSpec = serde_json::from_str(
            r#"{ "type": "double_integrator", "options": { "dimension": 1, "controlLimit": 2, "damping": 0 } }"#,
        )
        .unwrap();
        let dynamics = spec.build().unwrap();

        assert!(matches!(dynamics, AnyDynamics::DoubleIntegrator(_)));
        assert_eq!(dynamics.state_dim(), 2);
        assert_eq!(dynamics.control_dim(), 1);
        assert_eq!(dynamics.evaluate(&[1.0, 2.0], &[1.0]).unwrap(), vec![2.0, 1.0]);
    }

    #[test]
    fn options_are_optional() {
        let spec: DynamicsSpec = serde_json::from_str(r#"{ "type": "dubins" }"#).unwrap();
        assert_eq!(
            spec,
            DynamicsSpec::Dubins {
                options: DubinsCarConfig::default()
            }
        );
    }

    #[test]
    fn unknown_dynamics_type_is_rejected() {
        let parsed = serde_json::from_str::<DynamicsSpec>(r#"{ "type": "unicycle" }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn cost_weights_default_to_dynamics_dimensions() {
        let spec: CostSpec = serde_json::from_str(r#"{ "type": "quadratic" }"#).unwrap();
        let cost = spec.build(3, 1).unwrap();
        assert_relative_eq!(cost.stage(&[1.0, 1.0, 1.0], &[2.0]), 7.0);
    }

    #[test]
    fn cost_weights_must_match_dynamics() {
        let spec: CostSpec =
            serde_json::from_str(r#"{ "type": "quadratic", "stateWeights": [1, 1] }"#).unwrap();
        assert!(matches!(spec.build(4, 2), Err(ModelError::Dimension(_))));
    }

    #[test]
    fn obstacle_cost_from_spec() {
        let spec: CostSpec = serde_json::from_str(
            r#"{
                "type": "quadratic_with_obstacles",
                "obstacles": [{ "center": [0.0], "radius": 1.0, "weight": 2.0 }]
            }"#,
        )
        .unwrap();
        let cost = spec.build(2, 1).unwrap();

        let AnyCost::WithObstacles(layered) = &cost else {
            panic!("expected an obstacle cost");
        };
        assert_eq!(layered.obstacles().len(), 1);
        assert_relative_eq!(cost.terminal(&[0.0, 0.0]), 2.0 * (1.0 - (-1.0_f64).exp()));
    }

    #[test]
    fn obstacle_center_cannot_exceed_state() {
        let spec = CostSpec::QuadraticWithObstacles {
            state_weights: None,
            control_weights: None,
            goal: None,
            obstacles: vec![Obstacle::new(vec![0.0, 0.0, 0.0], 1.0, 1.0)],
        };
        assert!(spec.build(2, 1).is_err());
    }
}
