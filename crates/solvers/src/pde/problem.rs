use hjb_core::{Cost, DimensionError, Dynamics};

use crate::grid::{Boundary, Grid};

/// A control problem posed on a grid.
#[derive(Debug, Clone, Copy)]
pub struct HjbProblem<'a, D: ?Sized, C: ?Sized> {
    grid: &'a Grid,
    dynamics: &'a D,
    cost: &'a C,
    boundary: Boundary,
}

impl<'a, D, C> HjbProblem<'a, D, C>
where
    D: Dynamics + ?Sized,
    C: Cost + ?Sized,
{
    /// Poses `dynamics` and `cost` on `grid` with clamped boundaries.
    ///
    /// # Errors
    ///
    /// Returns a [`DimensionError`] if the grid does not have one axis per
    /// state variable.
    pub fn new(grid: &'a Grid, dynamics: &'a D, cost: &'a C) -> Result<Self, DimensionError> {
        DimensionError::check_len("grid axes", dynamics.state_dim(), grid.dims())?;
        Ok(Self {
            grid,
            dynamics,
            cost,
            boundary: Boundary::default(),
        })
    }

    /// Sets how neighbors past the grid edge are resolved.
    #[must_use]
    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    pub fn dynamics(&self) -> &'a D {
        self.dynamics
    }

    pub fn cost(&self) -> &'a C {
        self.cost
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Terminal cost at every node.
    #[must_use]
    pub fn terminal_values(&self) -> Vec<f64> {
        self.grid
            .points()
            .map(|point| self.cost.terminal(&point.position))
            .collect()
    }

    /// The starting field: `initial` when given, otherwise the terminal cost.
    pub(crate) fn seed(&self, initial: Option<&[f64]>) -> Result<Vec<f64>, DimensionError> {
        match initial {
            Some(values) => {
                DimensionError::check("initial", self.grid.size(), values)?;
                Ok(values.to_vec())
            }
            None => Ok(self.terminal_values()),
        }
    }
}
