use hjb_core::{Cost, Dynamics, Observer};
use tracing::info;

use crate::{grid::GridPoint, hamiltonian::Hamiltonian};

use super::{
    Action, Error, Event, HjbProblem, Solution, Status, TransientConfig, cfl::stable_time_step,
    hamiltonian_at,
};

/// Slack absorbing round-off when counting steps to the horizon.
const STEP_COUNT_SLACK: f64 = 1e-9;

pub(super) fn run<D, C, Obs>(
    problem: &HjbProblem<'_, D, C>,
    config: &TransientConfig,
    initial: Option<&[f64]>,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    D: Dynamics + ?Sized,
    C: Cost + ?Sized,
    Obs: Observer<Event, Action>,
{
    config.validate()?;

    let grid = problem.grid();
    let hamiltonian = Hamiltonian::new(problem.dynamics(), problem.cost());
    let horizon = config.horizon;
    let time_step = match config.time_step {
        Some(dt) => dt,
        None => stable_time_step(grid, &hamiltonian, config.discount_rate, config.cfl)?,
    }
    .min(horizon);
    let steps = ((horizon / time_step - STEP_COUNT_SLACK).ceil() as usize).max(1);

    let mut value = problem.seed(initial)?;
    let mut next = vec![0.0; value.len()];
    let points: Vec<GridPoint> = grid.points().collect();

    info!(
        nodes = grid.size(),
        controls = hamiltonian.controls().len(),
        time_step,
        steps,
        "transient solve started"
    );

    let mut residual = f64::INFINITY;
    for iteration in 1..=steps {
        let dt = if iteration == steps {
            horizon - (steps - 1) as f64 * time_step
        } else {
            time_step
        };

        // Jacobi: every node reads the field from the previous step.
        residual = 0.0;
        for point in &points {
            let h = hamiltonian_at(problem, &hamiltonian, &value, point)?;
            let current = value[point.index];
            let delta = dt * (h - config.discount_rate * current);
            let updated = current + delta;
            if !updated.is_finite() {
                return Err(Error::NonFinite {
                    iteration,
                    index: point.index,
                });
            }
            next[point.index] = updated;
            residual = residual.max(delta.abs());
        }
        std::mem::swap(&mut value, &mut next);

        let elapsed = if iteration == steps {
            horizon
        } else {
            iteration as f64 * time_step
        };
        let event = Event {
            iteration,
            residual,
            time_step: dt,
            elapsed,
        };
        let action = observer.observe(&event);

        if residual < config.tolerance {
            info!(iterations = iteration, residual, elapsed, "transient solve converged");
            return Ok(Solution {
                status: Status::Converged,
                value,
                iterations: iteration,
                residual,
                time_step,
            });
        }

        if let Some(Action::StopEarly) = action {
            info!(iterations = iteration, residual, elapsed, "transient solve stopped by observer");
            return Ok(Solution {
                status: Status::StoppedByObserver,
                value,
                iterations: iteration,
                residual,
                time_step,
            });
        }
    }

    info!(iterations = steps, residual, "transient solve reached horizon");
    Ok(Solution {
        status: Status::Complete,
        value,
        iterations: steps,
        residual,
        time_step,
    })
}
