use hjb_core::Observer;
use tracing::debug;

use crate::traits::{HasIteration, HasResidual};

/// Forwards solver progress to `tracing` at debug level.
///
/// Only every `stride`-th iteration is logged. The observer never acts.
#[derive(Debug, Clone)]
pub struct ProgressLog {
    label: &'static str,
    stride: usize,
    logged: usize,
}

impl ProgressLog {
    /// Logs every `stride`-th event under `label`. A zero stride logs every event.
    #[must_use]
    pub fn new(label: &'static str, stride: usize) -> Self {
        Self {
            label,
            stride: stride.max(1),
            logged: 0,
        }
    }

    /// Number of events written to the log so far.
    #[must_use]
    pub fn logged(&self) -> usize {
        self.logged
    }
}

impl<E, A> Observer<E, A> for ProgressLog
where
    E: HasIteration + HasResidual,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        let iteration = event.iteration();
        if iteration % self.stride == 0 {
            self.logged += 1;
            debug!(
                solver = self.label,
                iteration,
                residual = event.residual(),
                "solver progress"
            );
        }
        None
    }
}
