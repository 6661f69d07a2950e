use hjb_core::Observer;

/// Two observers watching the same solve.
///
/// Both see every event. When both return an action the first one wins.
#[derive(Debug, Clone)]
pub struct Chain<O1, O2> {
    first: O1,
    second: O2,
}

/// Combines two observers into one.
pub fn chain<O1, O2>(first: O1, second: O2) -> Chain<O1, O2> {
    Chain { first, second }
}

impl<E, A, O1, O2> Observer<E, A> for Chain<O1, O2>
where
    O1: Observer<E, A>,
    O2: Observer<E, A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        let first = self.first.observe(event);
        let second = self.second.observe(event);
        first.or(second)
    }
}
