use approx::assert_relative_eq;
use hjb_core::Dynamics;
use hjb_models::{QuadraticCost, SingleIntegrator, SingleIntegratorConfig};

use crate::grid::{Boundary, Grid};

use super::{
    Action, ConfigError, Error, Event, HjbProblem, Status, SteadyConfig, TransientConfig,
    cfl_bound, solve_steady, solve_steady_unobserved, solve_transient, solve_transient_unobserved,
};

fn integrator(dimension: usize) -> SingleIntegrator {
    SingleIntegrator::new(SingleIntegratorConfig {
        dimension,
        ..SingleIntegratorConfig::default()
    })
    .unwrap()
}

fn unit_cost(dimension: usize) -> QuadraticCost {
    QuadraticCost::new(vec![1.0; dimension], vec![1.0; dimension], None).unwrap()
}

fn line() -> Grid {
    Grid::from_bounds(&[-2.0], &[2.0], &[41]).unwrap()
}

#[test]
fn discounted_steady_solve_converges() {
    let grid = line();
    let dynamics = integrator(1);
    let cost = unit_cost(1);
    let problem = HjbProblem::new(&grid, &dynamics, &cost).unwrap();

    let config = SteadyConfig {
        max_iters: 20_000,
        discount_rate: 1.0,
        ..SteadyConfig::default()
    };
    let solution = solve_steady_unobserved(&problem, &config, None).unwrap();

    assert_eq!(solution.status, Status::Converged);
    assert!(solution.residual < config.tolerance);

    let value = &solution.value;
    assert_relative_eq!(value[20], 0.0, epsilon = 1e-9);
    for i in 0..20 {
        assert!(
            (value[i] - value[40 - i]).abs() < 1e-3,
            "value should be symmetric about the origin at node {i}"
        );
        assert!(value[i] > value[i + 1], "value should decrease toward the origin");
    }
}

#[test]
fn reseeding_a_converged_field_exits_immediately() {
    let grid = line();
    let dynamics = integrator(1);
    let cost = unit_cost(1);
    let problem = HjbProblem::new(&grid, &dynamics, &cost).unwrap();
    let config = SteadyConfig {
        max_iters: 20_000,
        discount_rate: 1.0,
        ..SteadyConfig::default()
    };

    let first = solve_steady_unobserved(&problem, &config, None).unwrap();
    let second = solve_steady_unobserved(&problem, &config, Some(&first.value)).unwrap();

    assert_eq!(second.status, Status::Converged);
    assert_eq!(second.iterations, 1);
}

#[test]
fn steady_reports_iteration_limit() {
    let grid = line();
    let dynamics = integrator(1);
    let cost = unit_cost(1);
    let problem = HjbProblem::new(&grid, &dynamics, &cost).unwrap();

    let config = SteadyConfig {
        max_iters: 3,
        tolerance: 0.0,
        ..SteadyConfig::default()
    };
    let solution = solve_steady_unobserved(&problem, &config, None).unwrap();

    assert_eq!(solution.status, Status::MaxIters);
    assert_eq!(solution.iterations, 3);
    assert!(solution.residual.is_finite());
}

#[test]
fn observer_can_stop_steady_solve() {
    let grid = line();
    let dynamics = integrator(1);
    let cost = unit_cost(1);
    let problem = HjbProblem::new(&grid, &dynamics, &cost).unwrap();

    let mut seen = Vec::new();
    let solution = solve_steady(
        &problem,
        &SteadyConfig {
            tolerance: 0.0,
            ..SteadyConfig::default()
        },
        None,
        |event: &Event| {
            seen.push(event.iteration);
            (event.iteration == 3).then_some(Action::StopEarly)
        },
    )
    .unwrap();

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(solution.iterations, 3);
    assert_eq!(seen, vec![1, 2, 3]);
}

#[test]
fn default_transient_step_respects_cfl_bound() {
    let grid = Grid::from_bounds(&[-1.0, -2.0], &[1.0, 2.0], &[11, 21]).unwrap();
    let dynamics = integrator(2);
    let cost = unit_cost(2);
    let problem = HjbProblem::new(&grid, &dynamics, &cost).unwrap();

    let config = TransientConfig {
        horizon: 0.5,
        ..TransientConfig::default()
    };
    let solution = solve_transient_unobserved(&problem, &config, None).unwrap();

    let bound = cfl_bound(&grid, dynamics.max_speed());
    assert!(solution.time_step <= bound);
    // a = 3 on both axes with h = 0.2: dt = 0.8 / (15 + 15).
    assert_relative_eq!(solution.time_step, 0.8 / 30.0);
}

#[test]
fn explicit_large_step_is_accepted() {
    let grid = line();
    let dynamics = integrator(1);
    let cost = unit_cost(1);
    let problem = HjbProblem::new(&grid, &dynamics, &cost).unwrap();

    let config = TransientConfig {
        horizon: 1.0,
        time_step: Some(0.5),
        ..TransientConfig::default()
    };
    let result = solve_transient_unobserved(&problem, &config, None);

    match result {
        Ok(solution) => {
            assert_eq!(solution.iterations, 2);
            assert_relative_eq!(solution.time_step, 0.5);
        }
        Err(error) => assert!(matches!(error, Error::NonFinite { .. })),
    }
}

#[test]
fn last_step_lands_on_horizon() {
    let grid = line();
    let dynamics = integrator(1);
    let cost = unit_cost(1);
    let problem = HjbProblem::new(&grid, &dynamics, &cost).unwrap();

    let config = TransientConfig {
        horizon: 0.1,
        tolerance: 0.0,
        time_step: Some(0.03),
        ..TransientConfig::default()
    };

    let mut events = Vec::new();
    let solution = solve_transient(&problem, &config, None, |event: &Event| {
        events.push(*event);
        None
    })
    .unwrap();

    assert_eq!(solution.status, Status::Complete);
    assert_eq!(solution.iterations, 4);
    assert_eq!(events.len(), 4);
    assert_relative_eq!(events[3].time_step, 0.01, epsilon = 1e-12);
    assert_relative_eq!(events[3].elapsed, 0.1);
}

#[test]
fn transient_accumulates_running_cost() {
    let grid = line();
    let dynamics = integrator(1);
    let cost = unit_cost(1);
    let problem = HjbProblem::new(&grid, &dynamics, &cost).unwrap();

    let config = TransientConfig {
        horizon: 0.2,
        tolerance: 0.0,
        ..TransientConfig::default()
    };
    let solution = solve_transient_unobserved(&problem, &config, None).unwrap();

    // The origin is an equilibrium with zero stage cost.
    assert_relative_eq!(solution.value[20], 0.0, epsilon = 1e-12);
    assert!(solution.value[0] > 0.0);
    assert!(solution.value.iter().all(|v| v.is_finite() && *v >= 0.0));
}

#[test]
fn rejects_mismatched_inputs() {
    let grid = line();
    let dynamics = integrator(1);
    let cost = unit_cost(1);

    let planar = integrator(2);
    assert!(HjbProblem::new(&grid, &planar, &cost).is_err());

    let problem = HjbProblem::new(&grid, &dynamics, &cost)
        .unwrap()
        .with_boundary(Boundary::Reflect);
    let result = solve_steady_unobserved(&problem, &SteadyConfig::default(), Some(&[0.0; 3]));
    assert!(matches!(result, Err(Error::Dimension(_))));

    let result = solve_transient_unobserved(
        &problem,
        &TransientConfig {
            horizon: 0.0,
            ..TransientConfig::default()
        },
        None,
    );
    assert_eq!(result, Err(Error::Config(ConfigError::Horizon)));
}
