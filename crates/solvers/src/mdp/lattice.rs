use hjb_core::{Cost, DimensionError, Dynamics, Vector};

use crate::{grid::Grid, hamiltonian::enumerate_controls};

use super::{ConfigError, Error, MarkovModel};

/// A deterministic MDP obtained by discretizing a control problem on a grid.
///
/// States are the grid nodes and actions the enumerated controls. Taking
/// control `u` at node `x` moves to the node nearest `x + dt · f(x, u)`
/// (clamped into the grid) at a cost of `stage(x, u) · dt`.
#[derive(Debug, Clone)]
pub struct LatticeModel<D, C> {
    grid: Grid,
    dynamics: D,
    cost: C,
    dt: f64,
    states: Vec<Vector>,
    actions: Vec<Vector>,
    transitions: Vec<(usize, f64)>,
    rewards: Vec<f64>,
}

impl<D: Dynamics, C: Cost> LatticeModel<D, C> {
    /// Precomputes every transition and reward.
    ///
    /// # Errors
    ///
    /// Returns an error if `dt` is not positive, the grid does not have one
    /// axis per state variable, or the dynamics reject a state or control.
    pub fn new(grid: Grid, dynamics: D, cost: C, dt: f64) -> Result<Self, Error> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::TimeStep.into());
        }
        DimensionError::check_len("grid axes", dynamics.state_dim(), grid.dims())?;

        let actions = enumerate_controls(dynamics.control_bounds(), dynamics.control_resolution());
        let states: Vec<Vector> = grid.points().map(|point| point.position).collect();

        let entries = states
            .len()
            .checked_mul(actions.len())
            .ok_or(Error::TooLarge {
                states: states.len(),
                actions: actions.len(),
            })?;
        let mut transitions = Vec::with_capacity(entries);
        let mut rewards = Vec::with_capacity(entries);
        for state in &states {
            for control in &actions {
                let velocity = dynamics.evaluate(state, control)?;
                let landing: Vector = state
                    .iter()
                    .zip(&velocity)
                    .map(|(x, v)| x + dt * v)
                    .collect();
                transitions.push((grid.nearest(&landing)?, 1.0));
                rewards.push(cost.stage(state, control) * dt);
            }
        }

        Ok(Self {
            grid,
            dynamics,
            cost,
            dt,
            states,
            actions,
            transitions,
            rewards,
        })
    }
}

impl<D, C> LatticeModel<D, C> {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn dynamics(&self) -> &D {
        &self.dynamics
    }

    pub fn cost(&self) -> &C {
        &self.cost
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    fn slot(&self, state: usize, action: usize) -> usize {
        state * self.actions.len() + action
    }
}

impl<D, C> MarkovModel for LatticeModel<D, C> {
    fn states(&self) -> &[Vector] {
        &self.states
    }

    fn actions(&self) -> &[Vector] {
        &self.actions
    }

    fn transition(&self, state: usize, action: usize) -> &[(usize, f64)] {
        std::slice::from_ref(&self.transitions[self.slot(state, action)])
    }

    fn reward(&self, state: usize, action: usize) -> f64 {
        self.rewards[self.slot(state, action)]
    }
}
