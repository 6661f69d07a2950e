use std::time::{Duration, Instant};

use hjb_core::Observer;

use crate::traits::CanStopEarly;

/// Stops a solve once a wall-clock budget is spent.
///
/// Solvers have no cancellation primitive of their own; this observer turns
/// an elapsed budget into the solver's early-stop action at the next event.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// A deadline `budget` from now.
    ///
    /// A budget too large to represent never expires.
    #[must_use]
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(budget),
        }
    }

    /// A deadline `budget` from now, or one that never expires.
    #[must_use]
    pub fn within(budget: Option<Duration>) -> Self {
        match budget {
            Some(budget) => Self::after(budget),
            None => Self { at: None },
        }
    }
}

impl<E, A: CanStopEarly> Observer<E, A> for Deadline {
    fn observe(&mut self, _event: &E) -> Option<A> {
        self.at
            .is_some_and(|at| Instant::now() >= at)
            .then(A::stop_early)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Stop;

    impl CanStopEarly for Stop {
        fn stop_early() -> Self {
            Stop
        }
    }

    #[test]
    fn zero_budget_stops_immediately() {
        let mut deadline = Deadline::after(Duration::ZERO);
        assert_eq!(Observer::<(), Stop>::observe(&mut deadline, &()), Some(Stop));
        assert_eq!(Observer::<(), Stop>::observe(&mut deadline, &()), Some(Stop));
    }

    #[test]
    fn generous_budget_lets_solve_run() {
        let mut deadline = Deadline::after(Duration::from_secs(3600));
        assert_eq!(Observer::<(), Stop>::observe(&mut deadline, &()), None);
    }

    #[test]
    fn missing_budget_never_expires() {
        let mut deadline = Deadline::within(None);
        assert_eq!(Observer::<(), Stop>::observe(&mut deadline, &()), None);

        let mut huge = Deadline::after(Duration::MAX);
        assert_eq!(Observer::<(), Stop>::observe(&mut huge, &()), None);
    }
}
