use approx::assert_relative_eq;
use hjb_models::{QuadraticCost, SingleIntegrator, SingleIntegratorConfig};

use crate::grid::Grid;

use super::{
    Action, Config, ConfigError, Error, Event, LatticeModel, MarkovModel, Status, TabularModel,
    value_iteration, value_iteration_unobserved,
};

/// Two states on a line; action 0 stays, action 1 moves to the other state.
fn shuttle() -> TabularModel {
    TabularModel::new(
        vec![vec![0.0], vec![1.0]],
        vec![vec![0.0], vec![1.0]],
        vec![
            vec![vec![(0, 1.0)], vec![(1, 1.0)]],
            vec![vec![(1, 1.0)], vec![(0, 1.0)]],
        ],
        vec![vec![1.0, 2.0], vec![0.0, 1.0]],
    )
    .unwrap()
}

fn config(discount: f64) -> Config {
    Config::new(discount, 1e-9, 5000).unwrap()
}

#[test]
fn converges_to_bellman_fixed_point() {
    let solution = value_iteration_unobserved(&shuttle(), &config(0.9), None).unwrap();

    assert_eq!(solution.status, Status::Converged);
    // V(1) = 0 by staying; V(0) = min(1 + 0.9 V(0), 2 + 0.9 V(1)) = 2.
    assert_relative_eq!(solution.value[1], 0.0, epsilon = 1e-8);
    assert_relative_eq!(solution.value[0], 2.0, epsilon = 1e-8);
}

#[test]
fn reseeding_with_converged_values_is_idempotent() {
    let model = shuttle();
    let config = config(0.9);

    let first = value_iteration_unobserved(&model, &config, None).unwrap();
    let second = value_iteration_unobserved(&model, &config, Some(&first.value)).unwrap();

    assert!(second.iterations <= 1);
    assert!(second.residual < config.tolerance());
    assert_eq!(second.status, Status::Converged);
}

#[test]
fn stochastic_transitions_use_expected_value() {
    // From state 0 the only action lands on 1 or 2 with equal probability.
    let model = TabularModel::new(
        vec![vec![0.0], vec![1.0], vec![2.0]],
        vec![vec![0.0]],
        vec![
            vec![vec![(1, 0.5), (2, 0.5)]],
            vec![vec![(1, 1.0)]],
            vec![vec![(2, 1.0)]],
        ],
        vec![vec![1.0], vec![0.0], vec![1.0]],
    )
    .unwrap();

    let solution = value_iteration_unobserved(&model, &config(0.5), None).unwrap();
    // V(1) = 0, V(2) = 1 / (1 - 0.5) = 2, V(0) = 1 + 0.5 · (0 + 2) / 2 = 1.5.
    assert_relative_eq!(solution.value[0], 1.5, epsilon = 1e-8);
    assert_relative_eq!(solution.value[2], 2.0, epsilon = 1e-8);
}

#[test]
fn undiscounted_growth_hits_iteration_limit() {
    let model = TabularModel::new(
        vec![vec![0.0]],
        vec![vec![0.0]],
        vec![vec![vec![(0, 1.0)]]],
        vec![vec![1.0]],
    )
    .unwrap();

    let config = Config::new(1.0, 1e-6, 10).unwrap();
    let solution = value_iteration_unobserved(&model, &config, None).unwrap();

    assert_eq!(solution.status, Status::MaxIters);
    assert_eq!(solution.iterations, 10);
    assert_relative_eq!(solution.value[0], 10.0);
}

#[test]
fn observer_sees_every_sweep_and_can_stop() {
    let slow = TabularModel::new(
        vec![vec![0.0]],
        vec![vec![0.0]],
        vec![vec![vec![(0, 1.0)]]],
        vec![vec![1.0]],
    )
    .unwrap();

    let mut residuals = Vec::new();
    let solution = value_iteration(&slow, &config(0.99), None, |event: &Event| {
        residuals.push(event.residual);
        (event.iteration == 4).then_some(Action::StopEarly)
    })
    .unwrap();

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(solution.iterations, 4);
    assert_eq!(residuals.len(), 4);
}

#[test]
fn rejects_invalid_models_and_seeds() {
    assert_eq!(Config::new(0.0, 1e-6, 10), Err(ConfigError::Discount));
    assert_eq!(Config::new(1.5, 1e-6, 10), Err(ConfigError::Discount));
    assert_eq!(Config::new(0.9, -1.0, 10), Err(ConfigError::Tolerance));

    let no_actions = TabularModel::new(vec![vec![0.0]], vec![], vec![vec![]], vec![vec![]]);
    assert_eq!(no_actions, Err(Error::NoActions));

    let out_of_range = TabularModel::new(
        vec![vec![0.0]],
        vec![vec![0.0]],
        vec![vec![vec![(3, 1.0)]]],
        vec![vec![0.0]],
    );
    assert_eq!(
        out_of_range,
        Err(Error::TransitionOutOfRange {
            state: 0,
            action: 0,
            next: 3
        })
    );

    let ragged = TabularModel::new(
        vec![vec![0.0], vec![1.0]],
        vec![vec![0.0]],
        vec![vec![vec![(0, 1.0)]]],
        vec![vec![0.0], vec![0.0]],
    );
    assert!(matches!(ragged, Err(Error::Dimension(_))));

    let result = value_iteration_unobserved(&shuttle(), &config(0.9), Some(&[0.0]));
    assert!(matches!(result, Err(Error::Dimension(_))));
}

fn lattice() -> LatticeModel<SingleIntegrator, QuadraticCost> {
    let grid = Grid::from_bounds(&[-1.0], &[1.0], &[5]).unwrap();
    let dynamics = SingleIntegrator::new(SingleIntegratorConfig {
        dimension: 1,
        control_limit: 1.0,
        control_resolution: 0.5,
    })
    .unwrap();
    let cost = QuadraticCost::new(vec![1.0], vec![1.0], None).unwrap();
    LatticeModel::new(grid, dynamics, cost, 0.5).unwrap()
}

#[test]
fn lattice_transitions_snap_to_nearest_node() {
    let model = lattice();

    assert_eq!(model.states().len(), 5);
    assert_eq!(model.actions().len(), 5);

    // x = 1 (node 4) with u = -1 (action 0) lands on 0.5 (node 3).
    assert_eq!(model.transition(4, 0), &[(3, 1.0)]);
    // x = 1 with u = 1 leaves the grid and is clamped back onto node 4.
    assert_eq!(model.transition(4, 4), &[(4, 1.0)]);
    // Reward is the stage cost times dt: (1 + 1) · 0.5.
    assert_relative_eq!(model.reward(4, 0), 1.0);
}

#[test]
fn lattice_value_is_zero_at_goal() {
    let model = lattice();
    let solution = value_iteration_unobserved(&model, &config(0.95), None).unwrap();

    assert_eq!(solution.status, Status::Converged);
    assert_relative_eq!(solution.value[2], 0.0, epsilon = 1e-9);
    assert!(solution.value[0] > solution.value[1]);
    assert!(solution.value[1] > solution.value[2]);
    assert!(solution.value[4] > solution.value[2]);
}

#[test]
fn lattice_rejects_bad_time_step() {
    let grid = Grid::from_bounds(&[-1.0], &[1.0], &[5]).unwrap();
    let dynamics = SingleIntegrator::new(SingleIntegratorConfig {
        dimension: 1,
        ..SingleIntegratorConfig::default()
    })
    .unwrap();
    let cost = QuadraticCost::new(vec![1.0], vec![1.0], None).unwrap();

    let result = LatticeModel::new(grid, dynamics, cost, 0.0);
    assert!(matches!(result, Err(Error::Config(ConfigError::TimeStep))));
}
