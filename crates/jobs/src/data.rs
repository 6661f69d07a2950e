use hjb_core::{DimensionError, Vector};
use hjb_models::{AnyCost, AnyDynamics};
use hjb_solvers::{
    grid::{Boundary, Grid},
    mdp::{self, LatticeModel, MarkovModel, TabularModel},
    pde::{self, HjbProblem},
    policy::GreedyPolicy,
    rollout::Trajectory,
};

/// Result data a finished job leaves in the store.
#[derive(Debug, Clone)]
pub enum JobData {
    Pde(PdeData),
    Mdp(MdpData),
    Rollout(Trajectory),
}

/// A solved value field together with the problem it solves.
#[derive(Debug, Clone)]
pub struct PdeData {
    pub grid: Grid,
    pub dynamics: AnyDynamics,
    pub cost: AnyCost,
    pub boundary: Boundary,
    pub solution: pde::Solution,

    /// Minimizing control at every node, row-major.
    pub controls: Vec<Vector>,
}

impl PdeData {
    /// The problem the stored field solves.
    ///
    /// # Errors
    ///
    /// Returns a [`DimensionError`] if the grid and dynamics disagree, which a
    /// stored solve never does.
    pub fn problem(&self) -> Result<HjbProblem<'_, AnyDynamics, AnyCost>, DimensionError> {
        Ok(HjbProblem::new(&self.grid, &self.dynamics, &self.cost)?.with_boundary(self.boundary))
    }
}

/// The MDP a value-iteration job solved.
#[derive(Debug, Clone)]
pub enum MdpModel {
    Tabular(TabularModel),
    Lattice(LatticeModel<AnyDynamics, AnyCost>),
}

impl MdpModel {
    fn inner(&self) -> &dyn MarkovModel {
        match self {
            Self::Tabular(model) => model,
            Self::Lattice(model) => model,
        }
    }
}

impl MarkovModel for MdpModel {
    fn states(&self) -> &[Vector] {
        self.inner().states()
    }

    fn actions(&self) -> &[Vector] {
        self.inner().actions()
    }

    fn transition(&self, state: usize, action: usize) -> &[(usize, f64)] {
        self.inner().transition(state, action)
    }

    fn reward(&self, state: usize, action: usize) -> f64 {
        self.inner().reward(state, action)
    }
}

/// Converged values and the greedy policy read off them.
#[derive(Debug, Clone)]
pub struct MdpData {
    pub model: MdpModel,
    pub discount: f64,
    pub solution: mdp::Solution,
    pub policy: GreedyPolicy,
}
