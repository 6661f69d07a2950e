//! Job orchestration for HJB solves.
//!
//! A [`JobService`] accepts PDE, MDP, and rollout submissions from a
//! [`Caller`], records each as an [`HjbJob`] in a shared [`JobStore`], and
//! runs the solve on Tokio's blocking pool:
//!
//! ```text
//! PENDING → RUNNING → COMPLETED
//!                   ↘ FAILED
//! ```
//!
//! Writes require [`Role::Operator`] or above and reads [`Role::Viewer`].
//! Solver results stay in the store as [`JobData`]; numeric artifacts are
//! written to disk when [`ServiceSettings::artifact_dir`] is set.
//!
//! # Example
//!
//! ```ignore
//! use hjb_jobs::{Caller, JobService, Role, ServiceSettings};
//!
//! let service = JobService::new(ServiceSettings::default());
//! let operator = Caller::new(Role::Operator);
//!
//! let job = service.submit_pde(&operator, submission)?;
//! let done = service.wait(&operator, job.id).await?;
//! println!("{}", serde_json::to_string_pretty(&done)?);
//! ```

pub mod artifacts;
mod data;
mod error;
mod job;
mod role;
pub mod runner;
mod service;
mod settings;
mod store;
mod submission;

pub use data::{JobData, MdpData, MdpModel, PdeData};
pub use error::{RunError, ServiceError};
pub use job::{Artifact, HjbJob, JobId, JobKind, JobMetrics, JobStatus, JobUpdate};
pub use role::{AuthError, Caller, Capability, Role, authorize};
pub use service::JobService;
pub use settings::{Limits, ServiceSettings, SettingsError};
pub use store::{JobStore, StoreError};
pub use submission::{
    MdpModelSpec, MdpPlan, MdpSubmission, PdePlan, PdeSolver, PdeSubmission, RolloutRequest,
    SubmissionError, ValueSeed,
};
