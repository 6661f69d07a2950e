//! End-to-end: solve a double integrator on a grid and roll out its policy.

use hjb_core::Dynamics;
use hjb_models::{DoubleIntegrator, DoubleIntegratorConfig, QuadraticCost};
use hjb_solvers::{
    grid::Grid,
    pde::{self, HjbProblem, TransientConfig, cfl_bound},
    policy::{Policy, ValuePolicy},
    rollout,
};

fn setup() -> (Grid, DoubleIntegrator, QuadraticCost) {
    let grid = Grid::from_bounds(&[-5.0, -5.0], &[5.0, 5.0], &[21, 21]).unwrap();
    let dynamics = DoubleIntegrator::new(DoubleIntegratorConfig {
        position_dimension: 1,
        control_limit: 2.0,
        damping: 0.0,
        ..DoubleIntegratorConfig::default()
    })
    .unwrap();
    let cost = QuadraticCost::new(vec![1.0, 1.0], vec![1.0], None).unwrap();
    (grid, dynamics, cost)
}

/// Half-width of the band the rollout settles into around the origin.
///
/// The control set is discrete, so the feedback has a dead band: a residual
/// velocity small enough that braking costs more than it saves is left
/// alone, and the position drifts slowly once it has arrived.
const SETTLING_BAND: f64 = 0.5;

#[test]
fn transient_solve_stays_within_cfl_budget() {
    let (grid, dynamics, cost) = setup();
    let problem = HjbProblem::new(&grid, &dynamics, &cost).unwrap();
    let config = TransientConfig {
        horizon: 2.0,
        ..TransientConfig::default()
    };

    let mut residuals = Vec::new();
    let solution = pde::solve_transient(&problem, &config, None, |event: &pde::Event| {
        residuals.push(event.residual);
        None
    })
    .unwrap();

    assert_eq!(solution.status, pde::Status::Complete);
    assert!(solution.time_step <= cfl_bound(&grid, dynamics.max_speed()));
    let budget = (config.horizon / solution.time_step).ceil() as usize;
    assert!(solution.iterations <= budget);
    assert_eq!(residuals.len(), solution.iterations);
    assert!(solution.value.iter().all(|v| v.is_finite()));

    // Without discounting the cost-to-go keeps growing over the horizon, but
    // each step's update shrinks as the field fills in.
    let first = residuals[0];
    assert!(solution.residual < first, "{} !< {first}", solution.residual);
    assert!(solution.residual < 1.5);
}

#[test]
fn rollout_settles_near_origin() {
    let (grid, dynamics, cost) = setup();
    let problem = HjbProblem::new(&grid, &dynamics, &cost).unwrap();
    let config = TransientConfig {
        horizon: 2.0,
        ..TransientConfig::default()
    };
    let solution = pde::solve_transient_unobserved(&problem, &config, None).unwrap();
    let policy = ValuePolicy::new(&problem, &solution.value).unwrap();

    // Starting at rest left of the origin, the policy pushes right.
    assert!(policy.control(&[-3.0, 0.0]).unwrap()[0] > 0.0);

    let trajectory =
        rollout::simulate_unobserved(&dynamics, &cost, &policy, &[-3.0, 0.0], 200, 0.05).unwrap();
    assert_eq!(trajectory.states.len(), 201);

    let arrival = trajectory
        .states
        .iter()
        .position(|x| x[0].abs() < SETTLING_BAND)
        .expect("rollout never reached the origin");

    // On the way in the distance to the origin never grows.
    for pair in trajectory.states[..=arrival].windows(2) {
        assert!(
            pair[1][0].abs() <= pair[0][0].abs() + 1e-12,
            "position moved away from the origin: {:?} -> {:?}",
            pair[0],
            pair[1]
        );
    }

    // Once there it stays, with less than a grid cell of velocity left.
    for state in &trajectory.states[arrival..] {
        assert!(state[0].abs() < SETTLING_BAND, "left the origin: {state:?}");
    }
    let last = trajectory.final_state().unwrap();
    assert!(last[1].abs() < grid.spacing()[1]);
    assert!(trajectory.cost.is_finite());
}
