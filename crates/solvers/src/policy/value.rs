use hjb_core::{Cost, DimensionError, Dynamics, Vector};

use crate::{gradient::upwind_gradient, grid::Grid, hamiltonian::Hamiltonian, pde::HjbProblem};

use super::{Policy, PolicyError};

/// Feedback policy read off a solved value field.
///
/// Godunov gradients are computed once at every node. A query inside the
/// grid interpolates them multilinearly and returns the control minimizing
/// the Hamiltonian there. Queries outside the grid are rejected rather than
/// snapped to the nearest node.
#[derive(Debug, Clone)]
pub struct ValuePolicy<'a, D: ?Sized, C: ?Sized> {
    grid: &'a Grid,
    hamiltonian: Hamiltonian<'a, D, C>,
    gradients: Vec<Vector>,
}

impl<'a, D, C> ValuePolicy<'a, D, C>
where
    D: Dynamics + ?Sized,
    C: Cost + ?Sized,
{
    /// Builds the policy for `value` on the grid of `problem`.
    ///
    /// # Errors
    ///
    /// Returns a [`DimensionError`] if `value` does not have one entry per node.
    pub fn new(problem: &HjbProblem<'a, D, C>, value: &[f64]) -> Result<Self, DimensionError> {
        let grid = problem.grid();
        DimensionError::check("value", grid.size(), value)?;

        let gradients = grid
            .points()
            .map(|point| {
                upwind_gradient(grid, value, &point.coords, problem.boundary())
                    .map(|gradient| gradient.godunov())
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            grid,
            hamiltonian: Hamiltonian::new(problem.dynamics(), problem.cost()),
            gradients,
        })
    }

    /// Godunov gradient at every node, in row-major order.
    #[must_use]
    pub fn gradients(&self) -> &[Vector] {
        &self.gradients
    }

    /// Minimizing control at every node, in row-major order.
    ///
    /// # Errors
    ///
    /// Returns a [`DimensionError`] if the dynamics reject a node or control.
    pub fn table(&self) -> Result<Vec<Vector>, DimensionError> {
        self.grid
            .points()
            .map(|point| {
                self.hamiltonian
                    .evaluate(&point.position, &self.gradients[point.index])
                    .map(|best| best.control)
            })
            .collect()
    }

    fn interpolate(&self, state: &[f64]) -> Vector {
        let dims = self.grid.dims();
        let mut lower = Vec::with_capacity(dims);
        let mut fraction = Vec::with_capacity(dims);
        for axis in 0..dims {
            let n = self.grid.shape()[axis];
            let t = (state[axis] - self.grid.origin()[axis]) / self.grid.spacing()[axis];
            if n == 1 {
                lower.push(0);
                fraction.push(0.0);
                continue;
            }
            let base = t.floor().clamp(0.0, (n - 2) as f64);
            lower.push(base as usize);
            fraction.push((t - base).clamp(0.0, 1.0));
        }

        let mut gradient = vec![0.0; dims];
        let mut corner = vec![0; dims];
        for mask in 0..(1_usize << dims) {
            let mut weight = 1.0;
            for axis in 0..dims {
                let upper = (mask >> axis) & 1 == 1;
                let n = self.grid.shape()[axis];
                corner[axis] = if upper {
                    (lower[axis] + 1).min(n - 1)
                } else {
                    lower[axis]
                };
                weight *= if upper {
                    fraction[axis]
                } else {
                    1.0 - fraction[axis]
                };
            }
            if weight == 0.0 {
                continue;
            }
            let node = &self.gradients[self.grid.index_of(&corner)];
            for (g, n) in gradient.iter_mut().zip(node) {
                *g += weight * n;
            }
        }
        gradient
    }
}

impl<D, C> Policy for ValuePolicy<'_, D, C>
where
    D: Dynamics + ?Sized,
    C: Cost + ?Sized,
{
    fn control(&self, state: &[f64]) -> Result<Vector, PolicyError> {
        DimensionError::check("state", self.grid.dims(), state)?;
        if !self.grid.contains(state) {
            return Err(PolicyError::UnknownState {
                state: state.to_vec(),
            });
        }

        let gradient = self.interpolate(state);
        Ok(self.hamiltonian.evaluate(state, &gradient)?.control)
    }
}
