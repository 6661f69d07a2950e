use hjb_core::DimensionError;
use hjb_solvers::{mdp, pde, rollout};
use thiserror::Error;

use crate::{
    artifacts::ArtifactError, job::JobId, role::AuthError, store::StoreError,
    submission::SubmissionError,
};

/// Errors returned to callers of the job service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    #[error("job {0} not found")]
    NotFound(JobId),

    #[error("source job {0} failed")]
    DependencyFailed(JobId),

    #[error("invalid request: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error("rejected request: {0}")]
    Rejected(#[from] SubmissionError),

    #[error("job {0} stopped publishing its status")]
    Abandoned(JobId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Reasons a job ends up `FAILED`.
///
/// The message is recorded in the job's `error` field.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid submission: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error("pde solve failed: {0}")]
    Pde(#[from] pde::Error),

    #[error("value iteration failed: {0}")]
    Mdp(#[from] mdp::Error),

    #[error("rollout failed: {0}")]
    Rollout(#[from] rollout::Error),

    #[error(transparent)]
    Dimension(#[from] DimensionError),

    #[error("solve exceeded its {seconds}s budget")]
    TimedOut { seconds: f64 },

    #[error("source job {0} failed")]
    SourceFailed(JobId),

    #[error("source job {0} has no policy to roll out")]
    NoPolicy(JobId),

    #[error("solver panicked")]
    Panicked,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}
