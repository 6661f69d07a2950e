//! One-sided spatial differences of a value field.
//!
//! For each axis `i` at a node, with neighbors resolved by the boundary policy:
//!
//! ```text
//! D+_i = (V[i+1] - V[i]) / h_i
//! D-_i = (V[i] - V[i-1]) / h_i
//! ```
//!
//! [`UpwindGradient::directional`] picks the side each characteristic comes
//! from, which keeps the discretized Hamiltonian monotone.
//! [`UpwindGradient::godunov`] collapses the pair into a single gradient with
//! the Godunov rule, used wherever a plain gradient vector is needed.

use hjb_core::{DimensionError, Vector};

use crate::grid::{Boundary, Grid};

/// Forward and backward differences at one node.
#[derive(Debug, Clone, PartialEq)]
pub struct UpwindGradient {
    pub forward: Vector,
    pub backward: Vector,
}

impl UpwindGradient {
    /// Godunov gradient: per axis, `max(D-, 0)` or `min(D+, 0)`, whichever is
    /// larger in magnitude.
    ///
    /// When both one-sided differences point away from the node (a local
    /// minimum) the component is zero. Equal magnitudes keep the backward side.
    #[must_use]
    pub fn godunov(&self) -> Vector {
        self.forward
            .iter()
            .zip(&self.backward)
            .map(|(&forward, &backward)| {
                let from_behind = backward.max(0.0);
                let from_ahead = forward.min(0.0);
                if from_behind >= -from_ahead {
                    from_behind
                } else {
                    from_ahead
                }
            })
            .collect()
    }

    /// Upwind approximation of `∇V · s` for characteristic speeds `s`.
    ///
    /// Axes with positive speed use `D+`, negative speed `D-`, and zero speed
    /// contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`DimensionError`] if `speeds` has the wrong length.
    pub fn directional(&self, speeds: &[f64]) -> Result<f64, DimensionError> {
        DimensionError::check("speeds", self.forward.len(), speeds)?;

        Ok(speeds
            .iter()
            .zip(self.forward.iter().zip(&self.backward))
            .map(|(&s, (&forward, &backward))| {
                if s > 0.0 {
                    s * forward
                } else if s < 0.0 {
                    s * backward
                } else {
                    0.0
                }
            })
            .sum())
    }
}

/// Computes the one-sided differences of `values` at the node `coords`.
///
/// Neighbors past the grid edge are resolved by `boundary`, so no read ever
/// leaves the buffer.
///
/// # Errors
///
/// Returns a [`DimensionError`] if `values` does not have one entry per node
/// or `coords` has the wrong number of axes.
pub fn upwind_gradient(
    grid: &Grid,
    values: &[f64],
    coords: &[usize],
    boundary: Boundary,
) -> Result<UpwindGradient, DimensionError> {
    DimensionError::check_len("values", grid.size(), values.len())?;
    DimensionError::check_len("coords", grid.dims(), coords.len())?;

    let center = values[grid.index_of(coords)];
    let mut forward = Vec::with_capacity(grid.dims());
    let mut backward = Vec::with_capacity(grid.dims());

    for (axis, &h) in grid.spacing().iter().enumerate() {
        let ahead = values[grid.neighbor(coords, axis, 1, boundary)];
        let behind = values[grid.neighbor(coords, axis, -1, boundary)];
        forward.push((ahead - center) / h);
        backward.push((center - behind) / h);
    }

    Ok(UpwindGradient { forward, backward })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::grid::GridSpec;

    fn line(n: usize, h: f64) -> Grid {
        Grid::new(&GridSpec {
            shape: vec![n],
            spacing: vec![h],
            origin: vec![0.0],
        })
        .unwrap()
    }

    #[test]
    fn one_sided_differences() {
        let grid = line(4, 0.5);
        let values = [0.0, 1.0, 4.0, 9.0];

        let gradient = upwind_gradient(&grid, &values, &[1], Boundary::Clamp).unwrap();
        assert_relative_eq!(gradient.forward[0], 6.0);
        assert_relative_eq!(gradient.backward[0], 2.0);
    }

    #[test]
    fn clamp_gives_zero_outward_difference() {
        let grid = line(3, 1.0);
        let values = [1.0, 2.0, 4.0];

        let left = upwind_gradient(&grid, &values, &[0], Boundary::Clamp).unwrap();
        assert_relative_eq!(left.backward[0], 0.0);
        let right = upwind_gradient(&grid, &values, &[2], Boundary::Clamp).unwrap();
        assert_relative_eq!(right.forward[0], 0.0);
    }

    #[test]
    fn periodic_and_reflect_edges() {
        let grid = line(3, 1.0);
        let values = [1.0, 2.0, 4.0];

        let periodic = upwind_gradient(&grid, &values, &[0], Boundary::Periodic).unwrap();
        assert_relative_eq!(periodic.backward[0], -3.0);

        let reflect = upwind_gradient(&grid, &values, &[0], Boundary::Reflect).unwrap();
        assert_relative_eq!(reflect.backward[0], -1.0);
    }

    #[test]
    fn godunov_rule() {
        let pick = |forward: f64, backward: f64| {
            UpwindGradient {
                forward: vec![forward],
                backward: vec![backward],
            }
            .godunov()[0]
        };

        // Both sides increasing: information comes from behind.
        assert_relative_eq!(pick(3.0, 1.0), 1.0);
        // Both sides decreasing: information comes from ahead.
        assert_relative_eq!(pick(-2.0, -1.0), -2.0);
        // Local minimum: zero.
        assert_relative_eq!(pick(1.0, -1.0), 0.0);
        // Local maximum: the steeper side wins.
        assert_relative_eq!(pick(-3.0, 2.0), -3.0);
        assert_relative_eq!(pick(-1.0, 2.0), 2.0);
    }

    #[test]
    fn directional_uses_upwind_side() {
        let gradient = UpwindGradient {
            forward: vec![1.0, 10.0],
            backward: vec![2.0, 20.0],
        };
        assert_relative_eq!(gradient.directional(&[1.0, -1.0]).unwrap(), 1.0 - 20.0);
        assert_relative_eq!(gradient.directional(&[0.0, 2.0]).unwrap(), 20.0);
        assert!(gradient.directional(&[1.0]).is_err());
    }

    #[test]
    fn wrong_value_length_fails() {
        let grid = line(3, 1.0);
        assert!(upwind_gradient(&grid, &[0.0, 1.0], &[0], Boundary::Clamp).is_err());
    }
}
