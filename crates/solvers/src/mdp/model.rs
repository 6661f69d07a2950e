use hjb_core::Vector;

/// A finite Markov decision process with costs to minimize.
///
/// States and actions are addressed by index into [`MarkovModel::states`] and
/// [`MarkovModel::actions`]. Transition probabilities are expected to sum to
/// one; this is not checked.
pub trait MarkovModel {
    /// Every state, in a fixed order.
    fn states(&self) -> &[Vector];

    /// Every action, in a fixed order.
    fn actions(&self) -> &[Vector];

    /// Successor states of `state` under `action`, as `(next, probability)`.
    fn transition(&self, state: usize, action: usize) -> &[(usize, f64)];

    /// Cost of taking `action` in `state`.
    fn reward(&self, state: usize, action: usize) -> f64;
}

impl<M: MarkovModel + ?Sized> MarkovModel for &M {
    fn states(&self) -> &[Vector] {
        (**self).states()
    }

    fn actions(&self) -> &[Vector] {
        (**self).actions()
    }

    fn transition(&self, state: usize, action: usize) -> &[(usize, f64)] {
        (**self).transition(state, action)
    }

    fn reward(&self, state: usize, action: usize) -> f64 {
        (**self).reward(state, action)
    }
}

/// Expected cost of `action` in `state` followed by the discounted value.
pub(crate) fn q_value<M: MarkovModel + ?Sized>(
    model: &M,
    discount: f64,
    value: &[f64],
    state: usize,
    action: usize,
) -> f64 {
    let expected: f64 = model
        .transition(state, action)
        .iter()
        .map(|&(next, probability)| probability * value[next])
        .sum();
    model.reward(state, action) + discount * expected
}

/// Checks that the model has actions and every transition stays in range.
pub(crate) fn check_model<M: MarkovModel + ?Sized>(model: &M) -> Result<(), super::Error> {
    let states = model.states().len();
    let actions = model.actions().len();
    if actions == 0 {
        return Err(super::Error::NoActions);
    }

    for state in 0..states {
        for action in 0..actions {
            if let Some(&(next, _)) = model
                .transition(state, action)
                .iter()
                .find(|(next, _)| *next >= states)
            {
                return Err(super::Error::TransitionOutOfRange {
                    state,
                    action,
                    next,
                });
            }
        }
    }
    Ok(())
}
