//! Job payloads and their validated plans.
//!
//! Submissions arrive as JSON and are checked once, when a worker turns them
//! into a [`PdePlan`] or [`MdpPlan`]. Everything past that point works with
//! built models and validated solver configs.

use hjb_core::{DimensionError, Dynamics, Vector};
use hjb_models::{AnyCost, AnyDynamics, CostSpec, DynamicsSpec, ModelError};
use hjb_solvers::{
    grid::{Boundary, Grid, GridError, GridSpec},
    hamiltonian::control_count,
    mdp::{self, LatticeModel, MarkovModel, TabularModel},
    pde::{self, HjbProblem, SteadyConfig, TransientConfig},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{data::MdpModel, job::JobId, settings::Limits};

const DEFAULT_ROLLOUT_STEPS: usize = 100;
const DEFAULT_ROLLOUT_DT: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Dimension(#[from] DimensionError),

    #[error(transparent)]
    Pde(#[from] pde::ConfigError),

    #[error(transparent)]
    Mdp(#[from] mdp::Error),

    /// `size` is `None` when the count overflows.
    #[error("{what} exceeds the limit of {limit}")]
    TooLarge {
        what: &'static str,
        size: Option<usize>,
        limit: usize,
    },
}

/// Rejects `size` above `limit`.
fn within(
    what: &'static str,
    size: Option<usize>,
    limit: usize,
) -> Result<usize, SubmissionError> {
    match size {
        Some(size) if size <= limit => Ok(size),
        _ => Err(SubmissionError::TooLarge { what, size, limit }),
    }
}

impl Limits {
    fn check_grid(&self, grid: &Grid) -> Result<usize, SubmissionError> {
        within("grid node count", Some(grid.size()), self.max_grid_nodes)
    }

    fn check_controls<D: Dynamics + ?Sized>(&self, dynamics: &D) -> Result<usize, SubmissionError> {
        within(
            "control count",
            control_count(dynamics.control_bounds(), dynamics.control_resolution()),
            self.max_controls,
        )
    }
}

impl From<mdp::ConfigError> for SubmissionError {
    fn from(error: mdp::ConfigError) -> Self {
        Self::Mdp(error.into())
    }
}

/// How the value field is seeded before the first sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSeed {
    /// The terminal cost at every node.
    #[default]
    Terminal,
    /// Zero everywhere.
    Zero,
    /// An explicit value per node, row-major.
    Values(Vec<f64>),
}

/// A grid PDE solve.
///
/// Giving a `horizon`, or both `steps` and `dt`, selects the time-dependent
/// solver. Otherwise the steady solver runs for at most `max_iterations`
/// (or `steps`) sweeps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdeSubmission {
    pub grid: GridSpec,
    pub dynamics: DynamicsSpec,
    pub cost: CostSpec,
    #[serde(default)]
    pub boundary: Boundary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relaxation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_rate: Option<f64>,
    #[serde(default)]
    pub seed: ValueSeed,
}

/// Which PDE solver a plan runs, with its validated config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PdeSolver {
    Steady(SteadyConfig),
    Transient(TransientConfig),
}

/// A PDE submission with its models built and its config checked.
#[derive(Debug, Clone)]
pub struct PdePlan {
    pub grid: Grid,
    pub dynamics: AnyDynamics,
    pub cost: AnyCost,
    pub boundary: Boundary,
    pub solver: PdeSolver,
    pub initial: Option<Vec<f64>>,
}

impl PdeSubmission {
    /// Builds the grid and models and validates the solver settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid or a model is invalid, the grid does not
    /// have one axis per state variable, the seed has the wrong length, or
    /// the solver config is out of range, or the grid or control set is
    /// larger than `limits` allow.
    pub fn plan(&self, limits: &Limits) -> Result<PdePlan, SubmissionError> {
        let grid = Grid::new(&self.grid)?;
        limits.check_grid(&grid)?;
        let dynamics = self.dynamics.build()?;
        limits.check_controls(&dynamics)?;
        let cost = self
            .cost
            .build(dynamics.state_dim(), dynamics.control_dim())?;
        HjbProblem::new(&grid, &dynamics, &cost)?;

        let horizon = self.horizon.or(match (self.steps, self.dt) {
            (Some(steps), Some(dt)) => Some(steps as f64 * dt),
            _ => None,
        });

        let solver = match horizon {
            Some(horizon) => {
                let defaults = TransientConfig::default();
                let config = TransientConfig {
                    horizon,
                    tolerance: self.tolerance.unwrap_or(defaults.tolerance),
                    discount_rate: self.discount_rate.unwrap_or(defaults.discount_rate),
                    time_step: self.dt,
                    ..defaults
                };
                config.validate()?;
                PdeSolver::Transient(config)
            }
            None => {
                let defaults = SteadyConfig::default();
                let config = SteadyConfig {
                    max_iters: self
                        .max_iterations
                        .or(self.steps)
                        .unwrap_or(defaults.max_iters),
                    tolerance: self.tolerance.unwrap_or(defaults.tolerance),
                    relaxation: self.relaxation.unwrap_or(defaults.relaxation),
                    discount_rate: self.discount_rate.unwrap_or(defaults.discount_rate),
                    time_step: self.dt,
                    ..defaults
                };
                config.validate()?;
                PdeSolver::Steady(config)
            }
        };

        let initial = match &self.seed {
            ValueSeed::Terminal => None,
            ValueSeed::Zero => Some(vec![0.0; grid.size()]),
            ValueSeed::Values(values) => {
                DimensionError::check("seed", grid.size(), values)?;
                Some(values.clone())
            }
        };

        Ok(PdePlan {
            grid,
            dynamics,
            cost,
            boundary: self.boundary,
            solver,
            initial,
        })
    }
}

/// The MDP a value-iteration submission describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MdpModelSpec {
    /// Explicit tables indexed `[state][action]`.
    Tabular {
        states: Vec<Vector>,
        actions: Vec<Vector>,
        transitions: Vec<Vec<Vec<(usize, f64)>>>,
        rewards: Vec<Vec<f64>>,
    },
    /// A control problem discretized onto grid nodes.
    Lattice {
        grid: GridSpec,
        dynamics: DynamicsSpec,
        cost: CostSpec,
        dt: f64,
    },
}

/// A value-iteration solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MdpSubmission {
    pub model: MdpModelSpec,
    #[serde(default = "default_discount")]
    pub discount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<Vec<f64>>,
}

fn default_discount() -> f64 {
    mdp::Config::default().discount()
}

/// An MDP submission with its model built and its config checked.
#[derive(Debug, Clone)]
pub struct MdpPlan {
    pub model: MdpModel,
    pub config: mdp::Config,
    pub initial: Option<Vec<f64>>,
}

impl MdpSubmission {
    /// Builds the model and validates the iteration settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the model tables are inconsistent, a lattice model
    /// cannot be built, the discount or tolerance is out of range, or
    /// `initial` does not have one entry per state, or a lattice model is
    /// larger than `limits` allow.
    pub fn plan(&self, limits: &Limits) -> Result<MdpPlan, SubmissionError> {
        let defaults = mdp::Config::default();
        let config = mdp::Config::new(
            self.discount,
            self.tolerance.unwrap_or(defaults.tolerance()),
            self.max_iterations.unwrap_or(defaults.max_iters()),
        )?;

        let model = match &self.model {
            MdpModelSpec::Tabular {
                states,
                actions,
                transitions,
                rewards,
            } => MdpModel::Tabular(TabularModel::new(
                states.clone(),
                actions.clone(),
                transitions.clone(),
                rewards.clone(),
            )?),
            MdpModelSpec::Lattice {
                grid,
                dynamics,
                cost,
                dt,
            } => {
                let grid = Grid::new(grid)?;
                let nodes = limits.check_grid(&grid)?;
                let dynamics = dynamics.build()?;
                let controls = limits.check_controls(&dynamics)?;
                within(
                    "lattice entry count",
                    nodes.checked_mul(controls),
                    limits.max_lattice_entries,
                )?;
                let cost = cost.build(dynamics.state_dim(), dynamics.control_dim())?;
                MdpModel::Lattice(LatticeModel::new(grid, dynamics, cost, *dt)?)
            }
        };

        if let Some(initial) = &self.initial {
            DimensionError::check("initial", model.states().len(), initial)?;
        }

        Ok(MdpPlan {
            model,
            config,
            initial: self.initial.clone(),
        })
    }
}

/// A rollout under the policy of a finished PDE or MDP job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloutRequest {
    /// The job whose solution drives the rollout.
    pub job_id: JobId,
    pub start: Vector,
    #[serde(default = "default_rollout_steps")]
    pub steps: usize,
    #[serde(default = "default_rollout_dt")]
    pub dt: f64,
}

impl RolloutRequest {
    /// # Errors
    ///
    /// Returns [`SubmissionError::TooLarge`] if the rollout is longer than
    /// `limits` allow.
    pub fn validate(&self, limits: &Limits) -> Result<(), SubmissionError> {
        within("rollout step count", Some(self.steps), limits.max_rollout_steps)?;
        Ok(())
    }
}

fn default_rollout_steps() -> usize {
    DEFAULT_ROLLOUT_STEPS
}

fn default_rollout_dt() -> f64 {
    DEFAULT_ROLLOUT_DT
}
