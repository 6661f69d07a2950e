use hjb_core::{Cost, Dynamics, Observer};
use tracing::{info, warn};

use crate::{grid::GridPoint, hamiltonian::Hamiltonian};

use super::{
    Action, Error, Event, HjbProblem, Solution, Status, SteadyConfig, cfl::stable_time_step,
    hamiltonian_at,
};

pub(super) fn run<D, C, Obs>(
    problem: &HjbProblem<'_, D, C>,
    config: &SteadyConfig,
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
    let time_step = match config.time_step {
        Some(dt) => dt,
        None => stable_time_step(grid, &hamiltonian, config.discount_rate, config.cfl)?,
    };
    let mut value = problem.seed(initial)?;
    let points: Vec<GridPoint> = grid.points().collect();
    let gain = config.relaxation * time_step;

    info!(
        nodes = grid.size(),
        controls = hamiltonian.controls().len(),
        time_step,
        "steady solve started"
    );

    let mut residual = f64::INFINITY;
    for iteration in 1..=config.max_iters {
        residual = 0.0;

        // Gauss-Seidel: each node reads neighbors already updated this sweep.
        for point in &points {
            let h = hamiltonian_at(problem, &hamiltonian, &value, point)?;
            let current = value[point.index];
            let delta = gain * (h - config.discount_rate * current);
            let next = current + delta;
            if !next.is_finite() {
                return Err(Error::NonFinite {
                    iteration,
                    index: point.index,
                });
            }
            value[point.index] = next;
            residual = residual.max(delta.abs());
        }

        let event = Event {
            iteration,
            residual,
            time_step,
            elapsed: iteration as f64 * time_step,
        };
        let action = observer.observe(&event);

        if residual < config.tolerance {
            info!(iterations = iteration, residual, "steady solve converged");
            return Ok(Solution {
                status: Status::Converged,
                value,
                iterations: iteration,
                residual,
                time_step,
            });
        }

        if let Some(Action::StopEarly) = action {
            info!(iterations = iteration, residual, "steady solve stopped by observer");
            return Ok(Solution {
                status: Status::StoppedByObserver,
                value,
                iterations: iteration,
                residual,
                time_step,
            });
        }
    }

    warn!(
        iterations = config.max_iters,
        residual, "steady solve hit its iteration limit"
    );
    Ok(Solution {
        status: Status::MaxIters,
        value,
        iterations: config.max_iters,
        residual,
        time_step,
    })
}
