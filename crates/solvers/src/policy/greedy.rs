use std::collections::HashMap;

use hjb_core::{DimensionError, Vector};

use crate::mdp::{self, MarkovModel, check_discount, check_model, q_value};

use super::{Policy, PolicyError};

/// Q-values within this distance of the running best count as ties.
pub const TIE_TOLERANCE: f64 = 1e-12;

/// The minimizing action of every state of an MDP.
#[derive(Debug, Clone, PartialEq)]
pub struct GreedyPolicy {
    actions: Vec<Vector>,
    choices: Vec<usize>,
    ties: usize,
    index: HashMap<Vec<u64>, usize>,
}

/// Picks the action minimizing the one-step lookahead of `value` in every
/// state.
///
/// Candidates within [`TIE_TOLERANCE`] of the running best are counted in
/// [`GreedyPolicy::ties`] and the earlier action is kept, so repeated calls
/// produce identical policies.
///
/// # Errors
///
/// Returns an error if `discount` is outside `(0, 1]`, `value` does not have
/// one entry per state, or the model has no actions or an out-of-range
/// transition.
pub fn extract_greedy_policy<M>(
    model: &M,
    discount: f64,
    value: &[f64],
) -> Result<GreedyPolicy, mdp::Error>
where
    M: MarkovModel + ?Sized,
{
    check_discount(discount)?;
    check_model(model)?;
    DimensionError::check("value", model.states().len(), value)?;

    let actions = model.actions().len();
    let mut ties = 0;
    let choices = (0..model.states().len())
        .map(|state| {
            let mut best = 0;
            let mut best_q = q_value(model, discount, value, state, 0);
            let mut tied = 0;
            for action in 1..actions {
                let q = q_value(model, discount, value, state, action);
                if q < best_q - TIE_TOLERANCE {
                    best = action;
                    best_q = q;
                    tied = 0;
                } else if (q - best_q).abs() <= TIE_TOLERANCE {
                    tied += 1;
                }
            }
            ties += tied;
            best
        })
        .collect();

    let index = model
        .states()
        .iter()
        .enumerate()
        .map(|(i, state)| (state_key(state), i))
        .collect();

    Ok(GreedyPolicy {
        actions: model.actions().to_vec(),
        choices,
        ties,
        index,
    })
}

/// Bitwise key of a state, with `-0.0` folded onto `0.0`.
fn state_key(state: &[f64]) -> Vec<u64> {
    state.iter().map(|x| (x + 0.0).to_bits()).collect()
}

impl GreedyPolicy {
    /// Chosen action index of every state, in the model's state order.
    #[must_use]
    pub fn actions(&self) -> &[usize] {
        &self.choices
    }

    /// Number of candidate actions that tied the action finally chosen,
    /// summed over states.
    #[must_use]
    pub fn ties(&self) -> usize {
        self.ties
    }

    /// Chosen action index of the state at `state_index`.
    #[must_use]
    pub fn action_index(&self, state_index: usize) -> Option<usize> {
        self.choices.get(state_index).copied()
    }

    /// Index of the model state exactly equal to `state`.
    #[must_use]
    pub fn lookup(&self, state: &[f64]) -> Option<usize> {
        self.index.get(&state_key(state)).copied()
    }

    /// The action vector chosen for `state`.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::UnknownState`] if `state` is not exactly one of
    /// the model's states.
    pub fn policy(&self, state: &[f64]) -> Result<&Vector, PolicyError> {
        self.lookup(state)
            .and_then(|i| self.choices.get(i))
            .and_then(|&a| self.actions.get(a))
            .ok_or_else(|| PolicyError::UnknownState {
                state: state.to_vec(),
            })
    }
}

impl Policy for GreedyPolicy {
    fn control(&self, state: &[f64]) -> Result<Vector, PolicyError> {
        self.policy(state).cloned()
    }
}
