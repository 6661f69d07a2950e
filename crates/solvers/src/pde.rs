//! Grid solvers for the Hamilton-Jacobi-Bellman equation.
//!
//! # Equation
//!
//! Both solvers discretize
//!
//! ```text
//! 0 = min_u [ stage(x, u) + ∇V(x) · f(x, u) ] - λ V(x)
//! ```
//!
//! with the transport term taken on the upwind side of each characteristic
//! (see [`crate::gradient`]) and the minimum taken over the enumerated control
//! set (see [`crate::hamiltonian`]).
//!
//! # Solvers
//!
//! - [`solve_steady`] relaxes the stationary equation in pseudo-time with
//!   in-place Gauss-Seidel sweeps in row-major order:
//!   `V_i += ω · dτ · (H_i - λ V_i)`.
//! - [`solve_transient`] marches the cost-to-go backward from the terminal
//!   cost over a finite horizon with explicit Jacobi steps:
//!   `V ← V + dt · (H - λ V)`.
//!
//! Both derive a CFL-stable step from the grid spacing and the largest
//! characteristic speed unless one is given. See [`cfl_bound`].
//!
//! # Observer Events
//!
//! Each sweep or time step emits one [`Event`]. Observers can return
//! [`Action::StopEarly`] to halt and keep the current field. Convergence is
//! checked after the observer runs, so the final event is always delivered.

mod action;
mod cfl;
mod config;
mod error;
mod event;
mod problem;
mod solution;
mod steady;
mod transient;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use cfl::cfl_bound;
pub use config::{ConfigError, DEFAULT_CFL, SteadyConfig, TransientConfig};
pub use error::Error;
pub use event::Event;
pub use problem::HjbProblem;
pub use solution::{Solution, Status};

use hjb_core::{Cost, DimensionError, Dynamics, Observer};

use crate::{gradient::upwind_gradient, grid::GridPoint, hamiltonian::Hamiltonian};

/// Solves the stationary HJB equation by pseudo-time relaxation.
///
/// `initial` seeds the field; `None` starts from the terminal cost. Hitting
/// `max_iters` without converging is reported through [`Status::MaxIters`],
/// not as an error.
///
/// # Errors
///
/// Returns an error if the config is invalid, `initial` has the wrong length,
/// the models reject a state or control, or the field becomes non-finite.
pub fn solve_steady<D, C, Obs>(
    problem: &HjbProblem<'_, D, C>,
    config: &SteadyConfig,
    initial: Option<&[f64]>,
    observer: Obs,
) -> Result<Solution, Error>
where
    D: Dynamics + ?Sized,
    C: Cost + ?Sized,
    Obs: Observer<Event, Action>,
{
    steady::run(problem, config, initial, observer)
}

/// Solves the stationary HJB equation without observer support.
///
/// # Errors
///
/// See [`solve_steady`].
pub fn solve_steady_unobserved<D, C>(
    problem: &HjbProblem<'_, D, C>,
    config: &SteadyConfig,
    initial: Option<&[f64]>,
) -> Result<Solution, Error>
where
    D: Dynamics + ?Sized,
    C: Cost + ?Sized,
{
    solve_steady(problem, config, initial, ())
}

/// Marches the cost-to-go backward over `config.horizon`.
///
/// Takes `ceil(horizon / dt)` steps, shortening the last one to land on the
/// horizon, and exits early once a step changes no node by more than
/// `config.tolerance`.
///
/// # Errors
///
/// Returns an error if the config is invalid, `initial` has the wrong length,
/// the models reject a state or control, or the field becomes non-finite.
pub fn solve_transient<D, C, Obs>(
    problem: &HjbProblem<'_, D, C>,
    config: &TransientConfig,
    initial: Option<&[f64]>,
    observer: Obs,
) -> Result<Solution, Error>
where
    D: Dynamics + ?Sized,
    C: Cost + ?Sized,
    Obs: Observer<Event, Action>,
{
    transient::run(problem, config, initial, observer)
}

/// Marches the cost-to-go backward without observer support.
///
/// # Errors
///
/// See [`solve_transient`].
pub fn solve_transient_unobserved<D, C>(
    problem: &HjbProblem<'_, D, C>,
    config: &TransientConfig,
    initial: Option<&[f64]>,
) -> Result<Solution, Error>
where
    D: Dynamics + ?Sized,
    C: Cost + ?Sized,
{
    solve_transient(problem, config, initial, ())
}

/// Upwind Hamiltonian at one node of the current field.
fn hamiltonian_at<D, C>(
    problem: &HjbProblem<'_, D, C>,
    hamiltonian: &Hamiltonian<'_, D, C>,
    value: &[f64],
    point: &GridPoint,
) -> Result<f64, DimensionError>
where
    D: Dynamics + ?Sized,
    C: Cost + ?Sized,
{
    let gradient = upwind_gradient(problem.grid(), value, &point.coords, problem.boundary())?;
    Ok(hamiltonian.evaluate_upwind(&point.position, &gradient)?.value)
}
