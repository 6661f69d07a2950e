/// Receives solver events and decides how the iteration should proceed.
///
/// Solvers emit one event per sweep, time step, or rollout step. An observer
/// can record progress, forward it to a logging backend, or stop a long solve
/// early without the solver knowing anything about cancellation.
///
/// Returning `Some(action)` requests a solver-specific action. Returning
/// `None` lets the solver continue unchanged.
///
/// Closures implement `Observer` automatically, and `()` is a no-op observer.
pub trait Observer<E, A> {
    /// Observes a solver event and optionally returns a control action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Action {
        Stop,
    }

    fn drive<Obs: Observer<usize, Action>>(mut observer: Obs, events: usize) -> usize {
        for event in 0..events {
            if let Some(Action::Stop) = observer.observe(&event) {
                return event;
            }
        }
        events
    }

    #[test]
    fn unit_observer_never_acts() {
        assert_eq!(drive((), 5), 5);
    }

    #[test]
    fn closure_observer_can_stop() {
        let mut seen = Vec::new();
        let stopped_at = drive(
            |event: &usize| {
                seen.push(*event);
                (*event == 2).then_some(Action::Stop)
            },
            10,
        );
        assert_eq!(stopped_at, 2);
        assert_eq!(seen, vec![0, 1, 2]);
    }
}
