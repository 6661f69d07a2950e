use hjb_core::{Cost, DimensionError, Dynamics};

use crate::{grid::Grid, hamiltonian::Hamiltonian};

/// Largest stable explicit step for advection at `max_speed` on `grid`.
///
/// Returns `min_j h_j / max_speed`, or infinity when `max_speed` is zero.
#[must_use]
pub fn cfl_bound(grid: &Grid, max_speed: f64) -> f64 {
    let finest = grid
        .spacing()
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    if max_speed > 0.0 {
        finest / max_speed
    } else {
        f64::INFINITY
    }
}

/// Default explicit step `cfl / (Σ_j a / h_j + λ)`.
///
/// `a` is the larger of the model's declared `max_speed` and the largest
/// characteristic speed observed over every node and candidate control. The
/// result never exceeds `cfl · cfl_bound(grid, max_speed)`. When nothing moves
/// and there is no discounting it falls back to the finest spacing.
pub(crate) fn stable_time_step<D, C>(
    grid: &Grid,
    hamiltonian: &Hamiltonian<'_, D, C>,
    discount_rate: f64,
    cfl: f64,
) -> Result<f64, DimensionError>
where
    D: Dynamics + ?Sized,
    C: Cost + ?Sized,
{
    let dynamics = hamiltonian.dynamics();
    let mut speed = dynamics.max_speed().abs();
    for point in grid.points() {
        for control in hamiltonian.controls() {
            let speeds = dynamics.characteristic_speeds(&point.position, control)?;
            speed = speeds.iter().fold(speed, |a, s| a.max(s.abs()));
        }
    }

    let rate: f64 = grid.spacing().iter().map(|h| speed / h).sum::<f64>() + discount_rate;
    if rate > 0.0 && rate.is_finite() {
        Ok(cfl / rate)
    } else {
        Ok(grid
            .spacing()
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min))
    }
}
