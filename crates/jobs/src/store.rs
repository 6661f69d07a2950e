use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError, RwLock},
};

use jiff::{SignedDuration, Timestamp};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;

use crate::{
    data::JobData,
    job::{HjbJob, JobId, JobKind, JobStatus, JobUpdate},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("job {0} not found")]
    NotFound(JobId),

    #[error("job {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: JobId,
        from: JobStatus,
        to: JobStatus,
    },
}

/// In-memory job records and their result data.
///
/// The map sits behind a read-write lock and every job has its own mutex, so
/// writers to different jobs never contend. Each job also carries a watch
/// channel that publishes its status.
#[derive(Debug, Default)]
pub struct JobStore {
    slots: RwLock<HashMap<JobId, Arc<Slot>>>,
}

#[derive(Debug)]
struct Slot {
    record: Mutex<Record>,
    status: watch::Sender<JobStatus>,
}

#[derive(Debug)]
struct Record {
    job: HjbJob,
    data: Option<Arc<JobData>>,
}

impl JobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new `PENDING` job and returns it.
    pub fn create(&self, kind: JobKind, config: Value) -> HjbJob {
        let now = Timestamp::now();
        let job = HjbJob {
            id: JobId::random(),
            kind,
            status: JobStatus::Pending,
            created_at: now,
            updated_at: now,
            config,
            metrics: None,
            artifacts: Vec::new(),
            error: None,
        };

        let (status, _) = watch::channel(JobStatus::Pending);
        let slot = Slot {
            record: Mutex::new(Record {
                job: job.clone(),
                data: None,
            }),
            status,
        };

        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(job.id, Arc::new(slot));
        job
    }

    /// A snapshot of the job record.
    #[must_use]
    pub fn get(&self, id: JobId) -> Option<HjbJob> {
        let slot = self.slot(id)?;
        let record = slot.record.lock().unwrap_or_else(PoisonError::into_inner);
        Some(record.job.clone())
    }

    /// Merges `update` into the job and returns the new record.
    ///
    /// `updated_at` always moves strictly forward, even when the clock has
    /// not ticked since the previous update.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id and
    /// [`StoreError::InvalidTransition`] if the status would move backward or
    /// leave a terminal state. A rejected update changes nothing.
    pub fn update(&self, id: JobId, update: JobUpdate) -> Result<HjbJob, StoreError> {
        let slot = self.slot(id).ok_or(StoreError::NotFound(id))?;
        let mut record = slot.record.lock().unwrap_or_else(PoisonError::into_inner);
        let job = &mut record.job;

        if let Some(next) = update.status {
            if !job.status.can_transition_to(next) {
                return Err(StoreError::InvalidTransition {
                    id,
                    from: job.status,
                    to: next,
                });
            }
            job.status = next;
        }
        if let Some(metrics) = update.metrics {
            job.metrics = Some(metrics);
        }
        if let Some(artifacts) = update.artifacts {
            job.artifacts = artifacts;
        }
        if let Some(error) = update.error {
            job.error = Some(error);
        }
        job.updated_at = later_than(job.updated_at);

        slot.status.send_replace(job.status);
        Ok(job.clone())
    }

    /// Stores the result data of a job, replacing any previous data.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub fn attach_data(&self, id: JobId, data: JobData) -> Result<(), StoreError> {
        let slot = self.slot(id).ok_or(StoreError::NotFound(id))?;
        let mut record = slot.record.lock().unwrap_or_else(PoisonError::into_inner);
        record.data = Some(Arc::new(data));
        Ok(())
    }

    /// The result data of a job, if it has any yet.
    #[must_use]
    pub fn data(&self, id: JobId) -> Option<Arc<JobData>> {
        let slot = self.slot(id)?;
        let record = slot.record.lock().unwrap_or_else(PoisonError::into_inner);
        record.data.clone()
    }

    /// A receiver that sees every status change of the job.
    #[must_use]
    pub fn subscribe(&self, id: JobId) -> Option<watch::Receiver<JobStatus>> {
        self.slot(id).map(|slot| slot.status.subscribe())
    }

    /// Number of jobs recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, id: JobId) -> Option<Arc<Slot>> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }
}

/// The current time, or one nanosecond past `previous` if the clock lags.
fn later_than(previous: Timestamp) -> Timestamp {
    let now = Timestamp::now();
    if now > previous {
        return now;
    }
    previous
        .checked_add(SignedDuration::from_nanos(1))
        .unwrap_or(previous)
}
