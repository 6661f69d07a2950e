use std::sync::Arc;

use serde_json::Value;
use tokio::task;
use tracing::{info, warn};

use crate::{
    artifacts,
    data::JobData,
    error::{RunError, ServiceError},
    job::{Artifact, HjbJob, JobId, JobKind, JobStatus, JobUpdate},
    role::{Caller, Capability, authorize},
    runner::{self, Outcome},
    settings::ServiceSettings,
    store::JobStore,
    submission::{MdpSubmission, PdeSubmission, RolloutRequest},
};

/// Role-gated front door to the solvers.
///
/// Submissions return as soon as the job is recorded. The solve itself runs
/// on Tokio's blocking pool and reports back through the shared
/// [`JobStore`]. Cloning the service shares the store.
#[derive(Debug, Clone)]
pub struct JobService {
    store: Arc<JobStore>,
    settings: Arc<ServiceSettings>,
}

impl JobService {
    /// A service with an empty store.
    #[must_use]
    pub fn new(settings: ServiceSettings) -> Self {
        Self::with_store(Arc::new(JobStore::new()), settings)
    }

    /// A service recording jobs in `store`.
    #[must_use]
    pub fn with_store(store: Arc<JobStore>, settings: ServiceSettings) -> Self {
        Self {
            store,
            settings: Arc::new(settings),
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<JobStore> {
        &self.store
    }

    #[must_use]
    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Records a job of `kind` and starts working on it.
    ///
    /// `config` is kept verbatim on the job. PDE and MDP payloads are
    /// validated by the worker, so a malformed one yields a `FAILED` job.
    /// Rollout payloads are decoded here because their source job is checked
    /// before anything is recorded.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unauthorized`] below the operator role. For
    /// rollouts, also returns [`ServiceError::InvalidRequest`] for an
    /// undecodable payload, [`ServiceError::Rejected`] for one longer than
    /// the settings allow, [`ServiceError::NotFound`] for an unknown source
    /// and [`ServiceError::DependencyFailed`] for a source that failed.
    pub fn submit(
        &self,
        caller: &Caller,
        kind: JobKind,
        config: Value,
    ) -> Result<HjbJob, ServiceError> {
        authorize(caller, Capability::Write)?;

        let task = match kind {
            JobKind::Pde => Task::Pde(config.clone()),
            JobKind::Mdp => Task::Mdp(config.clone()),
            JobKind::Rollout => {
                let request: RolloutRequest = serde_json::from_value(config.clone())?;
                request.validate(&self.settings.limits)?;
                let source = self
                    .store
                    .get(request.job_id)
                    .ok_or(ServiceError::NotFound(request.job_id))?;
                if source.status == JobStatus::Failed {
                    return Err(ServiceError::DependencyFailed(source.id));
                }
                Task::Rollout {
                    request,
                    source: source.id,
                }
            }
        };

        let job = self.store.create(kind, config);
        info!(job = %job.id, kind = kind.as_str(), "job submitted");

        let worker = Worker {
            store: Arc::clone(&self.store),
            settings: Arc::clone(&self.settings),
            id: job.id,
        };
        tokio::spawn(worker.run(task));
        Ok(job)
    }

    /// Submits a grid PDE solve.
    ///
    /// # Errors
    ///
    /// See [`JobService::submit`].
    pub fn submit_pde(
        &self,
        caller: &Caller,
        submission: &PdeSubmission,
    ) -> Result<HjbJob, ServiceError> {
        self.submit(caller, JobKind::Pde, serde_json::to_value(submission)?)
    }

    /// Submits a value-iteration solve.
    ///
    /// # Errors
    ///
    /// See [`JobService::submit`].
    pub fn submit_mdp(
        &self,
        caller: &Caller,
        submission: &MdpSubmission,
    ) -> Result<HjbJob, ServiceError> {
        self.submit(caller, JobKind::Mdp, serde_json::to_value(submission)?)
    }

    /// Submits a rollout under the policy of another job.
    ///
    /// The rollout waits for its source to finish and fails if the source
    /// does.
    ///
    /// # Errors
    ///
    /// See [`JobService::submit`].
    pub fn submit_rollout(
        &self,
        caller: &Caller,
        request: &RolloutRequest,
    ) -> Result<HjbJob, ServiceError> {
        self.submit(caller, JobKind::Rollout, serde_json::to_value(request)?)
    }

    /// The current record of a job.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unauthorized`] without read access and
    /// [`ServiceError::NotFound`] for an unknown id.
    pub fn get(&self, caller: &Caller, id: JobId) -> Result<HjbJob, ServiceError> {
        authorize(caller, Capability::Read)?;
        self.store.get(id).ok_or(ServiceError::NotFound(id))
    }

    /// The result data of a job, once it has completed.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unauthorized`] without read access and
    /// [`ServiceError::NotFound`] for an unknown id.
    pub fn data(&self, caller: &Caller, id: JobId) -> Result<Option<Arc<JobData>>, ServiceError> {
        authorize(caller, Capability::Read)?;
        if self.store.get(id).is_none() {
            return Err(ServiceError::NotFound(id));
        }
        Ok(self.store.data(id))
    }

    /// Waits for a job to reach a terminal status and returns its record.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unauthorized`] without read access and
    /// [`ServiceError::NotFound`] for an unknown id.
    pub async fn wait(&self, caller: &Caller, id: JobId) -> Result<HjbJob, ServiceError> {
        authorize(caller, Capability::Read)?;
        terminal_status(&self.store, id).await?;
        self.store.get(id).ok_or(ServiceError::NotFound(id))
    }
}

/// Resolves once job `id` is `COMPLETED` or `FAILED`.
async fn terminal_status(store: &JobStore, id: JobId) -> Result<JobStatus, ServiceError> {
    let mut status = store.subscribe(id).ok_or(ServiceError::NotFound(id))?;
    let terminal = status
        .wait_for(|status| status.is_terminal())
        .await
        .map_err(|_| ServiceError::Abandoned(id))?;
    Ok(*terminal)
}

/// What a worker has been asked to do.
enum Task {
    Pde(Value),
    Mdp(Value),
    Rollout { request: RolloutRequest, source: JobId },
}

/// Drives one job from `PENDING` to a terminal status.
struct Worker {
    store: Arc<JobStore>,
    settings: Arc<ServiceSettings>,
    id: JobId,
}

impl Worker {
    async fn run(self, task: Task) {
        let result = match task {
            Task::Pde(config) => {
                self.solve(move |settings| {
                    let submission: PdeSubmission = serde_json::from_value(config)?;
                    runner::run_pde(submission.plan(&settings.limits)?, settings)
                })
                .await
            }
            Task::Mdp(config) => {
                self.solve(move |settings| {
                    let submission: MdpSubmission = serde_json::from_value(config)?;
                    runner::run_mdp(submission.plan(&settings.limits)?, settings)
                })
                .await
            }
            Task::Rollout { request, source } => self.rollout(request, source).await,
        };
        self.finish(result);
    }

    async fn rollout(&self, request: RolloutRequest, source: JobId) -> Result<Finished, RunError> {
        match terminal_status(&self.store, source).await {
            Ok(JobStatus::Completed) => {}
            _ => return Err(RunError::SourceFailed(source)),
        }
        let data = self.store.data(source).ok_or(RunError::NoPolicy(source))?;

        self.solve(move |settings| runner::run_rollout(source, &data, &request, settings))
            .await
    }

    /// Marks the job running and runs `work` on the blocking pool.
    async fn solve<F>(&self, work: F) -> Result<Finished, RunError>
    where
        F: FnOnce(&ServiceSettings) -> Result<Outcome, RunError> + Send + 'static,
    {
        self.store
            .update(self.id, JobUpdate::status(JobStatus::Running))?;

        let settings = Arc::clone(&self.settings);
        let id = self.id;
        task::spawn_blocking(move || {
            let outcome = work(&settings)?;
            Finished::write(outcome, id, &settings)
        })
        .await
        .map_err(|_| RunError::Panicked)?
    }

    fn finish(&self, result: Result<Finished, RunError>) {
        let update = match result {
            Ok(Finished { outcome, artifacts }) => {
                if let Err(error) = self.store.attach_data(self.id, outcome.data) {
                    warn!(job = %self.id, %error, "cannot store job data");
                }
                info!(job = %self.id, iterations = outcome.metrics.iterations, "job completed");
                JobUpdate::status(JobStatus::Completed)
                    .with_metrics(outcome.metrics)
                    .with_artifacts(artifacts)
            }
            Err(error) => {
                warn!(job = %self.id, %error, "job failed");
                JobUpdate::status(JobStatus::Failed).with_error(error.to_string())
            }
        };

        if let Err(error) = self.store.update(self.id, update) {
            warn!(job = %self.id, %error, "cannot record job result");
        }
    }
}

/// A successful outcome with its artifacts on disk.
struct Finished {
    outcome: Outcome,
    artifacts: Vec<Artifact>,
}

impl Finished {
    fn write(outcome: Outcome, id: JobId, settings: &ServiceSettings) -> Result<Self, RunError> {
        let artifacts = match &settings.artifact_dir {
            Some(root) => artifacts::write(root, id, &outcome.data)?,
            None => Vec::new(),
        };
        Ok(Self { outcome, artifacts })
    }
}
