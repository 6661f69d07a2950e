//! Value iteration for finite Markov decision processes.
//!
//! Each sweep applies the Bellman backup to every state at once (Jacobi):
//!
//! ```text
//! V'(s) = min_a [ reward(s, a) + discount · Σ P(next | s, a) · V(next) ]
//! ```
//!
//! Iteration stops when no state changes by `tolerance` or more, or after
//! `max_iters` sweeps. One [`Event`] is emitted per sweep, and observers can
//! return [`Action::StopEarly`].

mod action;
mod config;
mod error;
mod event;
mod lattice;
mod model;
mod solution;
mod tabular;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use lattice::LatticeModel;
pub use model::MarkovModel;
pub use solution::{Solution, Status};
pub use tabular::TabularModel;

pub(crate) use config::check_discount;
pub(crate) use model::{check_model, q_value};

use hjb_core::{DimensionError, Observer};
use tracing::{info, warn};

/// Runs value iteration on `model`.
///
/// `initial` seeds the value array; `None` starts from zero.
///
/// # Errors
///
/// Returns an error if `initial` has the wrong length, the model has no
/// actions, a transition targets an unknown state, or a value becomes
/// non-finite.
pub fn value_iteration<M, Obs>(
    model: &M,
    config: &Config,
    initial: Option<&[f64]>,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    M: MarkovModel + ?Sized,
    Obs: Observer<Event, Action>,
{
    check_model(model)?;

    let states = model.states().len();
    let actions = model.actions().len();
    let mut value = match initial {
        Some(values) => {
            DimensionError::check("initial", states, values)?;
            values.to_vec()
        }
        None => vec![0.0; states],
    };
    let mut next = vec![0.0; states];

    info!(states, actions, discount = config.discount(), "value iteration started");

    let mut residual = f64::INFINITY;
    for iteration in 1..=config.max_iters() {
        residual = 0.0;
        for state in 0..states {
            let best = (0..actions)
                .map(|action| q_value(model, config.discount(), &value, state, action))
                .fold(f64::INFINITY, f64::min);
            if !best.is_finite() {
                return Err(Error::NonFinite { iteration, state });
            }
            residual = residual.max((best - value[state]).abs());
            next[state] = best;
        }
        std::mem::swap(&mut value, &mut next);

        let action = observer.observe(&Event {
            iteration,
            residual,
        });

        if residual < config.tolerance() {
            info!(iterations = iteration, residual, "value iteration converged");
            return Ok(Solution {
                status: Status::Converged,
                value,
                iterations: iteration,
                residual,
            });
        }

        if let Some(Action::StopEarly) = action {
            info!(iterations = iteration, residual, "value iteration stopped by observer");
            return Ok(Solution {
                status: Status::StoppedByObserver,
                value,
                iterations: iteration,
                residual,
            });
        }
    }

    warn!(
        iterations = config.max_iters(),
        residual, "value iteration hit its iteration limit"
    );
    Ok(Solution {
        status: Status::MaxIters,
        value,
        iterations: config.max_iters(),
        residual,
    })
}

/// Runs value iteration without observer support.
///
/// # Errors
///
/// See [`value_iteration`].
pub fn value_iteration_unobserved<M>(
    model: &M,
    config: &Config,
    initial: Option<&[f64]>,
) -> Result<Solution, Error>
where
    M: MarkovModel + ?Sized,
{
    value_iteration(model, config, initial, ())
}
