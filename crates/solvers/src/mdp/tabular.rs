use hjb_core::{DimensionError, Vector};

use super::{Error, MarkovModel, model::check_model};

/// An MDP given by explicit tables.
///
/// `transitions[s][a]` lists the `(next, probability)` successors of state
/// `s` under action `a`, and `rewards[s][a]` the cost of that choice.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularModel {
    states: Vec<Vector>,
    actions: Vec<Vector>,
    transitions: Vec<Vec<Vec<(usize, f64)>>>,
    rewards: Vec<Vec<f64>>,
}

impl TabularModel {
    /// Creates a model after checking every table against the state and
    /// action counts.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no actions, a table has the wrong shape,
    /// or a transition targets a state that does not exist.
    pub fn new(
        states: Vec<Vector>,
        actions: Vec<Vector>,
        transitions: Vec<Vec<Vec<(usize, f64)>>>,
        rewards: Vec<Vec<f64>>,
    ) -> Result<Self, Error> {
        DimensionError::check_len("transitions", states.len(), transitions.len())?;
        DimensionError::check_len("rewards", states.len(), rewards.len())?;
        for row in &transitions {
            DimensionError::check_len("transitions row", actions.len(), row.len())?;
        }
        for row in &rewards {
            DimensionError::check("rewards row", actions.len(), row)?;
        }

        let model = Self {
            states,
            actions,
            transitions,
            rewards,
        };
        check_model(&model)?;
        Ok(model)
    }
}

impl MarkovModel for TabularModel {
    fn states(&self) -> &[Vector] {
        &self.states
    }

    fn actions(&self) -> &[Vector] {
        &self.actions
    }

    fn transition(&self, state: usize, action: usize) -> &[(usize, f64)] {
        &self.transitions[state][action]
    }

    fn reward(&self, state: usize, action: usize) -> f64 {
        self.rewards[state][action]
    }
}
