//! Discrete minimization of the control Hamiltonian.
//!
//! ```text
//! H(x, p) = min_u [ stage(x, u) + p · f(x, u) ]
//! ```
//!
//! The minimization runs over a finite control set enumerated once from the
//! dynamics' bounds and resolution. Ties keep the first control in
//! enumeration order.

use hjb_core::{ControlBounds, Cost, DimensionError, Dynamics, Vector, dot};

use crate::gradient::UpwindGradient;

/// Result of minimizing the Hamiltonian at one state.
#[derive(Debug, Clone, PartialEq)]
pub struct HamiltonianValue {
    /// The minimum over the control set.
    pub value: f64,

    /// The minimizing control.
    pub control: Vector,

    /// Index of the minimizing control in [`Hamiltonian::controls`].
    pub control_index: usize,
}

/// Binds a dynamics model and a cost to an enumerated control set.
#[derive(Debug, Clone)]
pub struct Hamiltonian<'a, D: ?Sized, C: ?Sized> {
    dynamics: &'a D,
    cost: &'a C,
    controls: Vec<Vector>,
}

impl<'a, D, C> Hamiltonian<'a, D, C>
where
    D: Dynamics + ?Sized,
    C: Cost + ?Sized,
{
    /// Enumerates the control set of `dynamics` and pairs it with `cost`.
    pub fn new(dynamics: &'a D, cost: &'a C) -> Self {
        let controls = enumerate_controls(dynamics.control_bounds(), dynamics.control_resolution());
        Self {
            dynamics,
            cost,
            controls,
        }
    }

    /// The candidate controls, in enumeration order.
    #[must_use]
    pub fn controls(&self) -> &[Vector] {
        &self.controls
    }

    pub fn dynamics(&self) -> &'a D {
        self.dynamics
    }

    pub fn cost(&self) -> &'a C {
        self.cost
    }

    /// Minimizes `stage(x, u) + gradient · f(x, u)` over the control set.
    ///
    /// # Errors
    ///
    /// Returns a [`DimensionError`] if `position` or `gradient` does not have
    /// `state_dim` entries.
    pub fn evaluate(
        &self,
        position: &[f64],
        gradient: &[f64],
    ) -> Result<HamiltonianValue, DimensionError> {
        DimensionError::check("gradient", self.dynamics.state_dim(), gradient)?;
        self.minimize(position, |control| {
            let velocity = self.dynamics.evaluate(position, control)?;
            dot(gradient, &velocity)
        })
    }

    /// Minimizes `stage(x, u) + ∇V · f(x, u)` with the transport term
    /// discretized on the upwind side of each characteristic.
    ///
    /// # Errors
    ///
    /// Returns a [`DimensionError`] if `position` or `gradient` does not have
    /// `state_dim` entries.
    pub fn evaluate_upwind(
        &self,
        position: &[f64],
        gradient: &UpwindGradient,
    ) -> Result<HamiltonianValue, DimensionError> {
        DimensionError::check("gradient", self.dynamics.state_dim(), &gradient.forward)?;
        DimensionError::check("gradient", self.dynamics.state_dim(), &gradient.backward)?;
        self.minimize(position, |control| {
            let speeds = self.dynamics.characteristic_speeds(position, control)?;
            gradient.directional(&speeds)
        })
    }

    fn minimize<T>(&self, position: &[f64], mut transport: T) -> Result<HamiltonianValue, DimensionError>
    where
        T: FnMut(&[f64]) -> Result<f64, DimensionError>,
    {
        DimensionError::check("position", self.dynamics.state_dim(), position)?;

        let mut best: Option<(usize, f64)> = None;
        for (index, control) in self.controls.iter().enumerate() {
            let value = self.cost.stage(position, control) + transport(control)?;
            match best {
                Some((_, current)) if !(value < current) => {}
                _ => best = Some((index, value)),
            }
        }

        // The control set always has at least one sample.
        let (control_index, value) = best.unwrap_or((0, f64::INFINITY));
        Ok(HamiltonianValue {
            value,
            control: self.controls.get(control_index).cloned().unwrap_or_default(),
            control_index,
        })
    }
}

/// Enumerates a control grid over `bounds` with spacing at most `resolution`.
///
/// Each axis gets `n = ceil(width / resolution)` intervals and `n + 1`
/// samples including both bounds. An axis with zero width, or any axis when
/// `resolution` is not positive, gets a single sample: zero clamped into the
/// bounds. Controls are returned in row-major order (last axis fastest).
#[must_use]
pub fn enumerate_controls(bounds: &[ControlBounds], resolution: f64) -> Vec<Vector> {
    let axes: Vec<Vec<f64>> = bounds
        .iter()
        .map(|axis| axis_samples(axis, resolution))
        .collect();

    let mut controls: Vec<Vector> = vec![Vec::with_capacity(axes.len())];
    for samples in &axes {
        controls = controls
            .iter()
            .flat_map(|prefix| {
                samples.iter().map(move |&sample| {
                    let mut control = prefix.clone();
                    control.push(sample);
                    control
                })
            })
            .collect();
    }
    controls
}

/// Number of controls [`enumerate_controls`] would return, without
/// enumerating them.
///
/// Returns `None` if the count does not fit in a `usize`.
#[must_use]
pub fn control_count(bounds: &[ControlBounds], resolution: f64) -> Option<usize> {
    bounds.iter().try_fold(1_usize, |count, axis| {
        let samples = match axis_intervals(axis, resolution) {
            Some(intervals) => intervals.checked_add(1)?,
            None => 1,
        };
        count.checked_mul(samples)
    })
}

/// Intervals along one control axis, or `None` for a single-sample axis.
///
/// Saturates at `usize::MAX` for resolutions far below the width.
fn axis_intervals(axis: &ControlBounds, resolution: f64) -> Option<usize> {
    let width = axis.width();
    if !(width > 0.0) || !(resolution > 0.0) || !width.is_finite() || !resolution.is_finite() {
        return None;
    }
    Some((width / resolution).ceil().max(1.0) as usize)
}

fn axis_samples(axis: &ControlBounds, resolution: f64) -> Vec<f64> {
    let Some(intervals) = axis_intervals(axis, resolution) else {
        return vec![axis.clamp(0.0)];
    };

    let width = axis.width();
    let step = width / intervals as f64;
    (0..=intervals)
        .map(|k| {
            if k == intervals {
                axis.max
            } else {
                axis.min + k as f64 * step
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use hjb_models::{DoubleIntegrator, DoubleIntegratorConfig, QuadraticCost};

    use super::*;

    fn double_integrator() -> DoubleIntegrator {
        DoubleIntegrator::new(DoubleIntegratorConfig {
            position_dimension: 1,
            control_limit: 2.0,
            damping: 0.0,
            control_resolution: 0.5,
            ..DoubleIntegratorConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn enumerates_both_bounds() {
        let controls = enumerate_controls(&[ControlBounds::symmetric(1.0)], 0.5);
        assert_eq!(
            controls,
            vec![vec![-1.0], vec![-0.5], vec![0.0], vec![0.5], vec![1.0]]
        );
    }

    #[test]
    fn counts_controls_without_enumerating() {
        let bounds = [ControlBounds::symmetric(1.0), ControlBounds::new(0.0, 0.0)];
        assert_eq!(control_count(&bounds, 0.5), Some(5));
        assert_eq!(
            control_count(&bounds, 0.5),
            Some(enumerate_controls(&bounds, 0.5).len())
        );
        assert_eq!(control_count(&[], 0.5), Some(1));

        let plane = [ControlBounds::symmetric(1.0); 2];
        assert_eq!(control_count(&plane, 1e-300), None);
        assert_eq!(control_count(&plane, 0.0), Some(1));
    }

    #[test]
    fn uneven_resolution_rounds_up_intervals() {
        let controls = enumerate_controls(&[ControlBounds::new(0.0, 1.0)], 0.4);
        assert_eq!(controls.len(), 4);
        assert_relative_eq!(controls[1][0], 1.0 / 3.0);
        assert_relative_eq!(controls[3][0], 1.0);
    }

    #[test]
    fn degenerate_axes_get_one_sample() {
        let zero_width = enumerate_controls(&[ControlBounds::new(0.5, 0.5)], 0.1);
        assert_eq!(zero_width, vec![vec![0.5]]);

        let bad_resolution = enumerate_controls(&[ControlBounds::symmetric(2.0)], 0.0);
        assert_eq!(bad_resolution, vec![vec![0.0]]);

        let positive_only = enumerate_controls(&[ControlBounds::new(1.0, 3.0)], -1.0);
        assert_eq!(positive_only, vec![vec![1.0]]);
    }

    #[test]
    fn multi_axis_row_major() {
        let controls = enumerate_controls(
            &[ControlBounds::new(0.0, 1.0), ControlBounds::new(-1.0, 1.0)],
            1.0,
        );
        assert_eq!(
            controls,
            vec![
                vec![0.0, -1.0],
                vec![0.0, 0.0],
                vec![0.0, 1.0],
                vec![1.0, -1.0],
                vec![1.0, 0.0],
                vec![1.0, 1.0],
            ]
        );
    }

    #[test]
    fn minimizes_over_controls() {
        let dynamics = double_integrator();
        let cost = QuadraticCost::new(vec![1.0, 1.0], vec![1.0], None).unwrap();
        let hamiltonian = Hamiltonian::new(&dynamics, &cost);

        // f = [v, u]; p = [0, 2]: minimize u² + 2u over {-2, ..., 2} -> u = -1.
        let result = hamiltonian.evaluate(&[1.0, 0.0], &[0.0, 2.0]).unwrap();
        assert_eq!(result.control, vec![-1.0]);
        assert_eq!(hamiltonian.controls()[result.control_index], result.control);
        assert_relative_eq!(result.value, 1.0 + 1.0 - 2.0);
    }

    #[test]
    fn ties_keep_first_control() {
        let dynamics = double_integrator();
        let cost = QuadraticCost::new(vec![0.0, 0.0], vec![0.0], None).unwrap();
        let hamiltonian = Hamiltonian::new(&dynamics, &cost);

        let result = hamiltonian.evaluate(&[0.0, 0.0], &[0.0, 0.0]).unwrap();
        assert_eq!(result.control_index, 0);
        assert_eq!(result.control, vec![-2.0]);
    }

    #[test]
    fn upwind_matches_dot_product_for_smooth_fields() {
        let dynamics = double_integrator();
        let cost = QuadraticCost::new(vec![1.0, 1.0], vec![1.0], None).unwrap();
        let hamiltonian = Hamiltonian::new(&dynamics, &cost);

        let gradient = UpwindGradient {
            forward: vec![0.5, -1.0],
            backward: vec![0.5, -1.0],
        };
        let upwind = hamiltonian.evaluate_upwind(&[1.0, 1.0], &gradient).unwrap();
        let plain = hamiltonian.evaluate(&[1.0, 1.0], &[0.5, -1.0]).unwrap();
        assert_relative_eq!(upwind.value, plain.value);
        assert_eq!(upwind.control, plain.control);
    }

    #[test]
    fn rejects_wrong_lengths() {
        let dynamics = double_integrator();
        let cost = QuadraticCost::new(vec![1.0, 1.0], vec![1.0], None).unwrap();
        let hamiltonian = Hamiltonian::new(&dynamics, &cost);

        assert!(hamiltonian.evaluate(&[1.0], &[0.0, 0.0]).is_err());
        assert!(hamiltonian.evaluate(&[1.0, 0.0], &[0.0]).is_err());
    }
}
