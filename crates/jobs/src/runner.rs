//! Synchronous solve drivers used by the service's blocking workers.
//!
//! Each driver runs one solver under a [`ProgressLog`] chained with a
//! [`Deadline`] built from the service settings, and turns the result into
//! [`JobMetrics`] plus the [`JobData`] kept in the store. A solve the deadline
//! stops is reported as [`RunError::TimedOut`].

use hjb_observers::{Deadline, ProgressLog, chain};
use hjb_solvers::{
    mdp,
    pde::{self, HjbProblem},
    policy::{ValuePolicy, extract_greedy_policy},
    rollout::{self, Trajectory},
};
use tracing::info;

use crate::{
    data::{JobData, MdpData, PdeData},
    error::RunError,
    job::{JobId, JobMetrics},
    settings::ServiceSettings,
    submission::{MdpPlan, PdePlan, PdeSolver, RolloutRequest},
};

/// What a successful run leaves behind.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub metrics: JobMetrics,
    pub data: JobData,
}

/// Solves a PDE plan and extracts its feedback control table.
///
/// # Errors
///
/// Returns an error if the solver fails, the deadline stops it, or the
/// control table cannot be built.
pub fn run_pde(plan: PdePlan, settings: &ServiceSettings) -> Result<Outcome, RunError> {
    let PdePlan {
        grid,
        dynamics,
        cost,
        boundary,
        solver,
        initial,
    } = plan;

    let (solution, controls) = {
        let problem = HjbProblem::new(&grid, &dynamics, &cost)?.with_boundary(boundary);
        let observer = chain(
            ProgressLog::new("pde", settings.progress_stride),
            Deadline::within(settings.solve_timeout()),
        );

        let solution = match solver {
            PdeSolver::Steady(config) => {
                pde::solve_steady(&problem, &config, initial.as_deref(), observer)?
            }
            PdeSolver::Transient(config) => {
                pde::solve_transient(&problem, &config, initial.as_deref(), observer)?
            }
        };
        if solution.status == pde::Status::StoppedByObserver {
            return Err(timed_out(settings));
        }

        let controls = ValuePolicy::new(&problem, &solution.value)?.table()?;
        (solution, controls)
    };

    info!(
        nodes = grid.size(),
        iterations = solution.iterations,
        residual = solution.residual,
        "pde job solved"
    );

    let metrics = JobMetrics {
        iterations: solution.iterations,
        residual: solution.residual,
        time_step: Some(solution.time_step),
        ties: None,
        status: pde_status(solution.status).to_owned(),
        steps: None,
        cost: None,
    };
    let data = JobData::Pde(PdeData {
        grid,
        dynamics,
        cost,
        boundary,
        solution,
        controls,
    });
    Ok(Outcome { metrics, data })
}

/// Runs value iteration on an MDP plan and extracts its greedy policy.
///
/// # Errors
///
/// Returns an error if value iteration or policy extraction fails or the
/// deadline stops the solve.
pub fn run_mdp(plan: MdpPlan, settings: &ServiceSettings) -> Result<Outcome, RunError> {
    let MdpPlan {
        model,
        config,
        initial,
    } = plan;

    let observer = chain(
        ProgressLog::new("mdp", settings.progress_stride),
        Deadline::within(settings.solve_timeout()),
    );
    let solution = mdp::value_iteration(&model, &config, initial.as_deref(), observer)?;
    if solution.status == mdp::Status::StoppedByObserver {
        return Err(timed_out(settings));
    }

    let policy = extract_greedy_policy(&model, config.discount(), &solution.value)?;
    info!(
        iterations = solution.iterations,
        residual = solution.residual,
        ties = policy.ties(),
        "mdp job solved"
    );

    let metrics = JobMetrics {
        iterations: solution.iterations,
        residual: solution.residual,
        time_step: None,
        ties: Some(policy.ties()),
        status: mdp_status(solution.status).to_owned(),
        steps: None,
        cost: None,
    };
    let data = JobData::Mdp(MdpData {
        model,
        discount: config.discount(),
        solution,
        policy,
    });
    Ok(Outcome { metrics, data })
}

/// Rolls out the policy stored by a finished PDE or MDP job.
///
/// PDE sources drive the continuous dynamics with the interpolated value
/// policy. MDP sources walk the chain under the greedy policy.
///
/// # Errors
///
/// Returns an error if the request is longer than the settings allow, the
/// source holds no policy, the rollout leaves the policy's domain, or the
/// deadline stops it.
pub fn run_rollout(
    source_id: JobId,
    source: &JobData,
    request: &RolloutRequest,
    settings: &ServiceSettings,
) -> Result<Outcome, RunError> {
    request.validate(&settings.limits)?;
    let trajectory = match source {
        JobData::Pde(data) => {
            let problem = data.problem()?;
            let policy = ValuePolicy::new(&problem, &data.solution.value)?;
            rollout::simulate(
                &data.dynamics,
                &data.cost,
                &policy,
                &request.start,
                request.steps,
                request.dt,
                Deadline::within(settings.solve_timeout()),
            )?
        }
        JobData::Mdp(data) => rollout::simulate_chain(
            &data.model,
            &data.policy,
            &request.start,
            request.steps,
            request.dt,
        )?,
        JobData::Rollout(_) => return Err(RunError::NoPolicy(source_id)),
    };
    if trajectory.status == rollout::Status::StoppedByObserver {
        return Err(timed_out(settings));
    }

    info!(
        source = %source_id,
        steps = trajectory.steps(),
        cost = trajectory.cost,
        "rollout finished"
    );
    Ok(Outcome {
        metrics: rollout_metrics(&trajectory),
        data: JobData::Rollout(trajectory),
    })
}

fn rollout_metrics(trajectory: &Trajectory) -> JobMetrics {
    JobMetrics {
        iterations: trajectory.steps(),
        residual: 0.0,
        time_step: None,
        ties: None,
        status: "complete".to_owned(),
        steps: Some(trajectory.steps()),
        cost: Some(trajectory.cost),
    }
}

fn timed_out(settings: &ServiceSettings) -> RunError {
    RunError::TimedOut {
        seconds: settings.solve_timeout_secs.unwrap_or_default(),
    }
}

fn pde_status(status: pde::Status) -> &'static str {
    match status {
        pde::Status::Converged => "converged",
        pde::Status::Complete => "complete",
        pde::Status::MaxIters => "max_iters",
        pde::Status::StoppedByObserver => "stopped_by_observer",
    }
}

fn mdp_status(status: mdp::Status) -> &'static str {
    match status {
        mdp::Status::Converged => "converged",
        mdp::Status::MaxIters => "max_iters",
        mdp::Status::StoppedByObserver => "stopped_by_observer",
    }
}
