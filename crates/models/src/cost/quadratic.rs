use hjb_core::{Cost, DimensionError, Vector};

use crate::ModelError;

/// Weighted squared distance to a goal state plus weighted control effort.
///
/// ```text
/// stage(x, u) = Σ w_i (x_i - g_i)² + Σ r_j u_j²
/// ```
///
/// The terminal cost is zero. States and controls are expected to have the
/// same lengths as the weight vectors; [`CostSpec`](crate::CostSpec) checks
/// this against the dynamics when a cost is built from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticCost {
    state_weights: Vector,
    control_weights: Vector,
    goal: Vector,
}

impl QuadraticCost {
    /// Creates a quadratic cost. A missing goal means the origin.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if a weight is negative or non-finite, or if
    /// the goal length differs from the state weights.
    pub fn new(
        state_weights: Vector,
        control_weights: Vector,
        goal: Option<Vector>,
    ) -> Result<Self, ModelError> {
        for &w in &state_weights {
            ModelError::non_negative(w, "stateWeights")?;
        }
        for &r in &control_weights {
            ModelError::non_negative(r, "controlWeights")?;
        }

        let goal = goal.unwrap_or_else(|| vec![0.0; state_weights.len()]);
        DimensionError::check("goal", state_weights.len(), &goal)?;
        ModelError::require(
            goal.iter().all(|g| g.is_finite()),
            "goal",
            "must be finite",
        )?;

        Ok(Self {
            state_weights,
            control_weights,
            goal,
        })
    }

    /// Number of weighted state axes.
    #[must_use]
    pub fn state_dim(&self) -> usize {
        self.state_weights.len()
    }

    /// Number of weighted control axes.
    #[must_use]
    pub fn control_dim(&self) -> usize {
        self.control_weights.len()
    }

    /// The goal state.
    #[must_use]
    pub fn goal(&self) -> &[f64] {
        &self.goal
    }
}

impl Cost for QuadraticCost {
    fn stage(&self, state: &[f64], control: &[f64]) -> f64 {
        let state_term: f64 = state
            .iter()
            .zip(&self.goal)
            .zip(&self.state_weights)
            .map(|((x, g), w)| w * (x - g).powi(2))
            .sum();

        let control_term: f64 = control
            .iter()
            .zip(&self.control_weights)
            .map(|(u, r)| r * u * u)
            .sum();

        state_term + control_term
    }
}
