//! Closed-loop trajectory rollout.
//!
//! [`simulate`] steps a dynamics model forward under a feedback policy using
//! explicit Euler:
//!
//! ```text
//! x_{k+1} = x_k + dt · f(x_k, policy(x_k))
//! ```
//!
//! and accumulates `Σ stage(x_k, u_k) · dt + terminal(x_N)` along the way.
//!
//! [`simulate_chain`] walks a discrete MDP instead, following the most
//! probable successor of each greedy action.
//!
//! # Example
//!
//! ```ignore
//! use hjb_solvers::rollout;
//!
//! let trajectory = rollout::simulate_unobserved(&dynamics, &cost, &policy, &[-3.0, 0.0], 20, 0.05)?;
//!
//! for (t, x) in trajectory.times.iter().zip(&trajectory.states) {
//!     println!("t={t}: {x:?}");
//! }
//! ```

mod action;
mod error;
mod event;
mod trajectory;

pub use action::Action;
pub use error::Error;
pub use event::Event;
pub use trajectory::{Status, Trajectory};

use hjb_core::{Cost, DimensionError, Dynamics, Observer, Vector};
use tracing::debug;

use crate::{
    mdp::MarkovModel,
    policy::{GreedyPolicy, Policy, PolicyError},
};

/// Simulates `steps` Euler steps of `dynamics` under `policy` from `start`.
///
/// # Observer
///
/// The observer receives an [`Event`] for the start state and after each
/// step, and may return [`Action::StopEarly`] to end the rollout. The
/// terminal cost is charged at whichever state the rollout ends on.
///
/// # Errors
///
/// Returns an error if `dt` is not positive, `start` has the wrong length,
/// the policy has no control for a visited state, or the state becomes
/// non-finite.
pub fn simulate<D, C, P, Obs>(
    dynamics: &D,
    cost: &C,
    policy: &P,
    start: &[f64],
    steps: usize,
    dt: f64,
    mut observer: Obs,
) -> Result<Trajectory, Error>
where
    D: Dynamics + ?Sized,
    C: Cost + ?Sized,
    P: Policy + ?Sized,
    Obs: Observer<Event, Action>,
{
    if !dt.is_finite() || dt <= 0.0 {
        return Err(Error::TimeStep);
    }
    DimensionError::check("start", dynamics.state_dim(), start)?;

    let mut times = vec![0.0];
    let mut states: Vec<Vector> = vec![start.to_vec()];
    let mut controls = Vec::new();
    let mut running = 0.0;

    let event = Event {
        step: 0,
        time: 0.0,
        state: start.to_vec(),
        cost: 0.0,
    };
    let mut status = match observer.observe(&event) {
        Some(Action::StopEarly) => Status::StoppedByObserver,
        None => Status::Complete,
    };

    let mut current = start.to_vec();
    for step in 1..=steps {
        if status == Status::StoppedByObserver {
            break;
        }

        let control = policy.control(&current)?;
        let velocity = dynamics.evaluate(&current, &control)?;
        running += cost.stage(&current, &control) * dt;

        let next: Vector = current
            .iter()
            .zip(&velocity)
            .map(|(x, v)| x + dt * v)
            .collect();
        if next.iter().any(|x| !x.is_finite()) {
            return Err(Error::NonFinite { step });
        }

        let time = step as f64 * dt;
        times.push(time);
        states.push(next.clone());
        controls.push(control);

        let event = Event {
            step,
            time,
            state: next.clone(),
            cost: running,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            status = Status::StoppedByObserver;
        }

        current = next;
    }

    let total = running + cost.terminal(&current);
    debug!(steps = controls.len(), cost = total, "rollout finished");

    Ok(Trajectory {
        status,
        times,
        states,
        controls,
        cost: total,
    })
}

/// Simulates a rollout without observation.
///
/// This is a convenience wrapper around [`simulate`] that discards events.
///
/// # Errors
///
/// See [`simulate`].
pub fn simulate_unobserved<D, C, P>(
    dynamics: &D,
    cost: &C,
    policy: &P,
    start: &[f64],
    steps: usize,
    dt: f64,
) -> Result<Trajectory, Error>
where
    D: Dynamics + ?Sized,
    C: Cost + ?Sized,
    P: Policy + ?Sized,
{
    simulate(dynamics, cost, policy, start, steps, dt, ())
}

/// Walks `model` under `policy` for `steps` transitions from `start`.
///
/// Each step takes the greedy action and moves to its most probable
/// successor, the earliest listed one on ties. The cost is the sum of the
/// rewards collected; `dt` only labels the time axis.
///
/// # Errors
///
/// Returns an error if `dt` is not positive, `start` is not one of the
/// model's states, or an action has no in-range successor.
pub fn simulate_chain<M>(
    model: &M,
    policy: &GreedyPolicy,
    start: &[f64],
    steps: usize,
    dt: f64,
) -> Result<Trajectory, Error>
where
    M: MarkovModel + ?Sized,
{
    if !dt.is_finite() || dt <= 0.0 {
        return Err(Error::TimeStep);
    }

    let unknown = || PolicyError::UnknownState {
        state: start.to_vec(),
    };
    let mut state = policy.lookup(start).ok_or_else(unknown)?;

    let mut times = vec![0.0];
    let mut states = vec![start.to_vec()];
    let mut controls = Vec::new();
    let mut cost = 0.0;

    for step in 1..=steps {
        let action = policy.action_index(state).ok_or_else(unknown)?;
        let next = model
            .transition(state, action)
            .iter()
            .fold(None, |best: Option<(usize, f64)>, &(next, p)| match best {
                Some((_, q)) if q >= p => best,
                _ => Some((next, p)),
            })
            .map(|(next, _)| next)
            .filter(|&next| next < model.states().len())
            .ok_or(Error::Transition { state, action })?;

        cost += model.reward(state, action);
        times.push(step as f64 * dt);
        states.push(model.states()[next].clone());
        controls.push(model.actions()[action].clone());
        state = next;
    }

    Ok(Trajectory {
        status: Status::Complete,
        times,
        states,
        controls,
        cost,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use hjb_models::{QuadraticCost, SingleIntegrator, SingleIntegratorConfig};

    use super::*;
    use crate::mdp::TabularModel;
    use crate::policy::extract_greedy_policy;

    fn drift() -> SingleIntegrator {
        SingleIntegrator::new(SingleIntegratorConfig {
            dimension: 1,
            control_limit: 1.0,
            control_resolution: 0.5,
        })
        .unwrap()
    }

    fn cost() -> QuadraticCost {
        QuadraticCost::new(vec![0.0], vec![1.0], None).unwrap()
    }

    fn constant(u: f64) -> impl Fn(&[f64]) -> Result<Vector, PolicyError> {
        move |_state: &[f64]| Ok(vec![u])
    }

    #[test]
    fn constant_control_motion() {
        let trajectory =
            simulate_unobserved(&drift(), &cost(), &constant(2.0), &[0.0], 10, 0.1).unwrap();

        assert_eq!(trajectory.status, Status::Complete);
        assert_eq!(trajectory.steps(), 10);
        assert_eq!(trajectory.states.len(), 11);
        assert_relative_eq!(trajectory.final_state().unwrap()[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(trajectory.times[10], 1.0);
        // Σ u² · dt = 10 · 4 · 0.1
        assert_relative_eq!(trajectory.cost, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn observer_can_stop_early() {
        let observer = |event: &Event| (event.step >= 5).then_some(Action::StopEarly);

        let trajectory =
            simulate(&drift(), &cost(), &constant(1.0), &[0.0], 100, 0.1, observer).unwrap();

        assert_eq!(trajectory.status, Status::StoppedByObserver);
        assert_eq!(trajectory.steps(), 5);
        assert_eq!(trajectory.states.len(), 6);
    }

    #[test]
    fn zero_steps_returns_start() {
        let trajectory =
            simulate_unobserved(&drift(), &cost(), &constant(1.0), &[5.0], 0, 0.1).unwrap();

        assert_eq!(trajectory.status, Status::Complete);
        assert_eq!(trajectory.states, vec![vec![5.0]]);
        assert!(trajectory.controls.is_empty());
    }

    #[test]
    fn step_numbers_start_at_zero() {
        let mut steps = Vec::new();
        simulate(
            &drift(),
            &cost(),
            &constant(0.0),
            &[0.0],
            4,
            0.25,
            |event: &Event| {
                steps.push(event.step);
                None
            },
        )
        .unwrap();

        assert_eq!(steps, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn rejects_bad_inputs() {
        let result = simulate_unobserved(&drift(), &cost(), &constant(0.0), &[0.0, 0.0], 1, 0.1);
        assert!(matches!(result, Err(Error::Dimension(_))));

        let result = simulate_unobserved(&drift(), &cost(), &constant(0.0), &[0.0], 1, 0.0);
        assert_eq!(result, Err(Error::TimeStep));

        let refuse = |state: &[f64]| -> Result<Vector, PolicyError> {
            Err(PolicyError::UnknownState {
                state: state.to_vec(),
            })
        };
        let result = simulate_unobserved(&drift(), &cost(), &refuse, &[0.0], 1, 0.1);
        assert!(matches!(result, Err(Error::Policy(_))));
    }

    #[test]
    fn chain_follows_most_probable_successor() {
        // State 0 mostly moves to 1; state 1 stays.
        let model = TabularModel::new(
            vec![vec![0.0], vec![1.0]],
            vec![vec![0.5]],
            vec![
                vec![vec![(0, 0.2), (1, 0.8)]],
                vec![vec![(1, 1.0)]],
            ],
            vec![vec![1.0], vec![0.0]],
        )
        .unwrap();
        let policy = extract_greedy_policy(&model, 0.9, &[0.0, 0.0]).unwrap();

        let trajectory = simulate_chain(&model, &policy, &[0.0], 3, 0.5).unwrap();
        assert_eq!(trajectory.states, vec![vec![0.0], vec![1.0], vec![1.0], vec![1.0]]);
        assert_eq!(trajectory.controls, vec![vec![0.5]; 3]);
        assert_relative_eq!(trajectory.cost, 1.0);
        assert_relative_eq!(trajectory.times[3], 1.5);

        assert!(matches!(
            simulate_chain(&model, &policy, &[0.5], 3, 0.5),
            Err(Error::Policy(PolicyError::UnknownState { .. }))
        ));
    }
}
