//! Rectangular state-space lattices.
//!
//! A [`Grid`] places `shape[i]` equally spaced nodes along each axis, starting
//! at `origin[i]` with step `spacing[i]`. Nodes are enumerated in row-major
//! order (the last axis varies fastest), so a flat value array indexed by
//! [`GridPoint::index`] lines up with [`Grid::points`].

mod boundary;
mod error;
mod points;

pub use boundary::Boundary;
pub use error::GridError;
pub use points::{GridPoint, Points};

use hjb_core::{DimensionError, Vector};
use serde::{Deserialize, Serialize};

/// Slack, in units of spacing, allowed outside the grid's bounding box.
const LATTICE_TOLERANCE: f64 = 1e-9;

/// Serializable description of a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub shape: Vec<usize>,
    pub spacing: Vec<f64>,
    pub origin: Vec<f64>,
}

/// A validated rectangular lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    shape: Vec<usize>,
    spacing: Vec<f64>,
    origin: Vec<f64>,
    strides: Vec<usize>,
    size: usize,
}

impl Grid {
    /// Creates a grid from a spec.
    ///
    /// # Errors
    ///
    /// Returns a [`GridError`] if the spec has no axes, mismatched lengths, an
    /// empty axis, a non-positive spacing, or a non-finite origin.
    pub fn new(spec: &GridSpec) -> Result<Self, GridError> {
        let GridSpec {
            shape,
            spacing,
            origin,
        } = spec;

        if shape.is_empty() {
            return Err(GridError::NoAxes);
        }
        DimensionError::check("spacing", shape.len(), spacing)?;
        DimensionError::check("origin", shape.len(), origin)?;

        for axis in 0..shape.len() {
            if shape[axis] == 0 {
                return Err(GridError::EmptyAxis { axis });
            }
            if !spacing[axis].is_finite() || spacing[axis] <= 0.0 {
                return Err(GridError::Spacing { axis });
            }
            if !origin[axis].is_finite() {
                return Err(GridError::Origin { axis });
            }
        }

        let mut strides = vec![1_usize; shape.len()];
        for axis in (0..shape.len() - 1).rev() {
            strides[axis] = strides[axis + 1]
                .checked_mul(shape[axis + 1])
                .ok_or(GridError::TooLarge)?;
        }
        let size = strides[0]
            .checked_mul(shape[0])
            .ok_or(GridError::TooLarge)?;

        Ok(Self {
            shape: shape.clone(),
            spacing: spacing.clone(),
            origin: origin.clone(),
            strides,
            size,
        })
    }

    /// Creates a grid spanning `[lower[i], upper[i]]` with `shape[i]` nodes per axis.
    ///
    /// Both bounds are nodes of the grid. An axis with a single node sits at
    /// its lower bound.
    ///
    /// # Errors
    ///
    /// Returns a [`GridError`] if the lengths differ, an axis is empty, or an
    /// upper bound does not exceed its lower bound.
    pub fn from_bounds(lower: &[f64], upper: &[f64], shape: &[usize]) -> Result<Self, GridError> {
        DimensionError::check("lower", shape.len(), lower)?;
        DimensionError::check("upper", shape.len(), upper)?;

        let mut spacing = Vec::with_capacity(shape.len());
        for axis in 0..shape.len() {
            let n = shape[axis];
            if n == 0 {
                return Err(GridError::EmptyAxis { axis });
            }
            if n == 1 {
                spacing.push(1.0);
                continue;
            }
            if !(upper[axis] > lower[axis]) {
                return Err(GridError::Bounds { axis });
            }
            spacing.push((upper[axis] - lower[axis]) / (n - 1) as f64);
        }

        Self::new(&GridSpec {
            shape: shape.to_vec(),
            spacing,
            origin: lower.to_vec(),
        })
    }

    /// Returns the spec this grid was built from.
    #[must_use]
    pub fn spec(&self) -> GridSpec {
        GridSpec {
            shape: self.shape.clone(),
            spacing: self.spacing.clone(),
            origin: self.origin.clone(),
        }
    }

    /// Number of axes.
    #[must_use]
    pub fn dims(&self) -> usize {
        self.shape.len()
    }

    /// Total number of nodes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[must_use]
    pub fn spacing(&self) -> &[f64] {
        &self.spacing
    }

    #[must_use]
    pub fn origin(&self) -> &[f64] {
        &self.origin
    }

    /// Coordinate of the last node along `axis`.
    #[must_use]
    pub fn upper(&self, axis: usize) -> f64 {
        self.origin[axis] + (self.shape[axis] - 1) as f64 * self.spacing[axis]
    }

    /// Flat row-major index of the node at `coords`.
    ///
    /// `coords` must be in range for every axis.
    #[must_use]
    pub fn index_of(&self, coords: &[usize]) -> usize {
        coords
            .iter()
            .zip(&self.strides)
            .map(|(c, stride)| c * stride)
            .sum()
    }

    /// Integer coordinates of the node at flat `index`.
    #[must_use]
    pub fn coords_of(&self, index: usize) -> Vec<usize> {
        let mut rest = index;
        self.strides
            .iter()
            .zip(&self.shape)
            .map(|(stride, n)| {
                let c = rest / stride;
                rest %= stride;
                c.min(n - 1)
            })
            .collect()
    }

    /// Physical position of the node at `coords`.
    #[must_use]
    pub fn position(&self, coords: &[usize]) -> Vector {
        coords
            .iter()
            .zip(self.origin.iter().zip(&self.spacing))
            .map(|(&c, (o, h))| o + c as f64 * h)
            .collect()
    }

    /// Iterates over every node in row-major order.
    #[must_use]
    pub fn points(&self) -> Points<'_> {
        Points::new(self)
    }

    /// Flat index of the neighbor `step` nodes away from `coords` along `axis`.
    ///
    /// Out-of-range neighbors are resolved by `boundary`, so the result is
    /// always a valid index into a buffer of [`Grid::size`] entries.
    #[must_use]
    pub fn neighbor(&self, coords: &[usize], axis: usize, step: isize, boundary: Boundary) -> usize {
        let n = self.shape[axis];
        let current = coords[axis];
        let resolved = boundary.resolve(current as isize + step, n);
        self.index_of(coords) - current * self.strides[axis] + resolved * self.strides[axis]
    }

    /// Returns whether `state` lies inside the grid's bounding box.
    #[must_use]
    pub fn contains(&self, state: &[f64]) -> bool {
        state.len() == self.dims()
            && (0..self.dims()).all(|axis| {
                let slack = LATTICE_TOLERANCE * self.spacing[axis];
                state[axis] >= self.origin[axis] - slack && state[axis] <= self.upper(axis) + slack
            })
    }

    /// Flat index of the node nearest to `state`, clamping to the grid.
    ///
    /// This is a discretization helper for lattice transition models.
    ///
    /// # Errors
    ///
    /// Returns a [`DimensionError`] if `state` has the wrong length.
    pub fn nearest(&self, state: &[f64]) -> Result<usize, DimensionError> {
        DimensionError::check("state", self.dims(), state)?;

        let coords: Vec<usize> = (0..self.dims())
            .map(|axis| {
                let t = ((state[axis] - self.origin[axis]) / self.spacing[axis]).round();
                let max = (self.shape[axis] - 1) as f64;
                if t.is_nan() { 0 } else { t.clamp(0.0, max) as usize }
            })
            .collect();
        Ok(self.index_of(&coords))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn grid_2x3() -> Grid {
        Grid::new(&GridSpec {
            shape: vec![2, 3],
            spacing: vec![1.0, 0.5],
            origin: vec![0.0, -1.0],
        })
        .unwrap()
    }

    #[test]
    fn row_major_enumeration() {
        let grid = grid_2x3();
        let points: Vec<_> = grid.points().collect();

        assert_eq!(grid.size(), 6);
        assert_eq!(points.len(), 6);
        assert_eq!(points[0].coords, vec![0, 0]);
        assert_eq!(points[1].coords, vec![0, 1]);
        assert_eq!(points[3].coords, vec![1, 0]);
        assert_eq!(points[5].position, vec![1.0, 0.0]);

        for (i, point) in points.iter().enumerate() {
            assert_eq!(point.index, i);
            assert_eq!(grid.index_of(&point.coords), i);
            assert_eq!(grid.coords_of(i), point.coords);
        }
    }

    #[test]
    fn enumeration_is_deterministic() {
        let grid = grid_2x3();
        let first: Vec<_> = grid.points().collect();
        let second: Vec<_> = grid.points().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn from_bounds_includes_both_ends() {
        let grid = Grid::from_bounds(&[-5.0, -5.0], &[5.0, 5.0], &[21, 21]).unwrap();
        assert_eq!(grid.spacing(), &[0.5, 0.5]);
        assert_relative_eq!(grid.upper(0), 5.0);
        assert_eq!(grid.size(), 441);
    }

    #[test]
    fn rejects_invalid_specs() {
        let spec = |shape: Vec<usize>, spacing: Vec<f64>| GridSpec {
            origin: vec![0.0; shape.len()],
            shape,
            spacing,
        };

        assert_eq!(Grid::new(&spec(vec![], vec![])), Err(GridError::NoAxes));
        assert_eq!(
            Grid::new(&spec(vec![2, 0], vec![1.0, 1.0])),
            Err(GridError::EmptyAxis { axis: 1 })
        );
        assert_eq!(
            Grid::new(&spec(vec![2], vec![-1.0])),
            Err(GridError::Spacing { axis: 0 })
        );
        assert!(matches!(
            Grid::new(&spec(vec![2, 2], vec![1.0])),
            Err(GridError::Dimension(_))
        ));
        assert_eq!(
            Grid::from_bounds(&[1.0], &[1.0], &[3]),
            Err(GridError::Bounds { axis: 0 })
        );
    }

    #[test]
    fn node_count_overflow_is_an_error() {
        let spec = GridSpec {
            shape: vec![usize::MAX, 2],
            spacing: vec![1.0, 1.0],
            origin: vec![0.0, 0.0],
        };
        assert_eq!(Grid::new(&spec), Err(GridError::TooLarge));

        let grid = Grid::new(&GridSpec {
            shape: vec![1 << 20, 1 << 20],
            ..spec
        })
        .unwrap();
        assert_eq!(grid.size(), 1 << 40);
        assert_eq!(grid.index_of(&[1, 3]), (1 << 20) + 3);
    }

    #[test]
    fn neighbors_respect_boundary() {
        let grid = Grid::new(&GridSpec {
            shape: vec![4],
            spacing: vec![1.0],
            origin: vec![0.0],
        })
        .unwrap();

        assert_eq!(grid.neighbor(&[0], 0, -1, Boundary::Clamp), 0);
        assert_eq!(grid.neighbor(&[0], 0, -1, Boundary::Periodic), 3);
        assert_eq!(grid.neighbor(&[0], 0, -1, Boundary::Reflect), 1);
        assert_eq!(grid.neighbor(&[3], 0, 1, Boundary::Clamp), 3);
        assert_eq!(grid.neighbor(&[3], 0, 1, Boundary::Periodic), 0);
        assert_eq!(grid.neighbor(&[3], 0, 1, Boundary::Reflect), 2);
        assert_eq!(grid.neighbor(&[1], 0, 1, Boundary::Clamp), 2);
    }

    #[test]
    fn neighbor_along_inner_axis() {
        let grid = grid_2x3();
        // (1, 2) -> index 5; stepping the first axis forward clamps in place.
        assert_eq!(grid.neighbor(&[1, 2], 0, 1, Boundary::Clamp), 5);
        assert_eq!(grid.neighbor(&[1, 2], 0, -1, Boundary::Clamp), 2);
        assert_eq!(grid.neighbor(&[1, 2], 1, 1, Boundary::Periodic), 3);
    }

    #[test]
    fn nearest_clamps_into_grid() {
        let grid = grid_2x3();

        assert_eq!(grid.nearest(&[0.9, -0.6]).unwrap(), 4);
        assert_eq!(grid.nearest(&[10.0, 10.0]).unwrap(), 5);
        assert_eq!(grid.nearest(&[-10.0, -10.0]).unwrap(), 0);
        assert!(grid.nearest(&[0.0]).is_err());
    }

    #[test]
    fn contains_checks_bounding_box() {
        let grid = grid_2x3();
        assert!(grid.contains(&[0.5, 0.0]));
        assert!(grid.contains(&[1.0, -1.0]));
        assert!(!grid.contains(&[1.1, 0.0]));
        assert!(!grid.contains(&[0.5]));
    }
}
