use hjb_core::{Cost, Vector};
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Lower bound applied to an obstacle's softness before dividing by it.
const MIN_SOFTNESS: f64 = 1e-9;

/// A soft circular (or spherical) obstacle.
///
/// The center covers the leading axes of the state, so a position-only center
/// works with states that also carry velocities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub center: Vector,
    pub radius: f64,
    pub weight: f64,
    #[serde(default = "default_softness")]
    pub softness: f64,
}

fn default_softness() -> f64 {
    1.0
}

impl Obstacle {
    /// Creates an obstacle with unit softness.
    #[must_use]
    pub fn new(center: Vector, radius: f64, weight: f64) -> Self {
        Self {
            center,
            radius,
            weight,
            softness: default_softness(),
        }
    }

    /// Sets the softness of the penalty profile.
    #[must_use]
    pub fn softness(mut self, softness: f64) -> Self {
        self.softness = softness;
        self
    }

    /// Checks that the obstacle's parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if any field is negative or non-finite.
    pub fn validate(&self) -> Result<(), ModelError> {
        ModelError::require(
            self.center.iter().all(|c| c.is_finite()),
            "obstacle center",
            "must be finite",
        )?;
        ModelError::non_negative(self.radius, "obstacle radius")?;
        ModelError::non_negative(self.weight, "obstacle weight")?;
        ModelError::non_negative(self.softness, "obstacle softness")
    }

    /// Penalty contributed at `state`.
    ///
    /// Inside the radius the penalty is
    /// `weight · (exp(-d²/s) - exp(-r²/s))` with `s = max(softness, ε)`, which
    /// is zero at `d = r` and grows as `d` shrinks. Outside it is zero.
    #[must_use]
    pub fn penalty(&self, state: &[f64]) -> f64 {
        let distance_squared: f64 = state
            .iter()
            .zip(&self.center)
            .map(|(x, c)| (x - c).powi(2))
            .sum();

        if distance_squared >= self.radius * self.radius {
            return 0.0;
        }

        let softness = self.softness.max(MIN_SOFTNESS);
        let edge = (-self.radius * self.radius / softness).exp();
        self.weight * ((-distance_squared / softness).exp() - edge)
    }
}

/// A base cost with obstacle penalties added to both stage and terminal cost.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleCost<C> {
    base: C,
    obstacles: Vec<Obstacle>,
}

/// Layers obstacle penalties on top of `base`.
///
/// With no obstacles the result behaves exactly like `base`.
pub fn with_obstacle_cost<C: Cost>(base: C, obstacles: Vec<Obstacle>) -> ObstacleCost<C> {
    ObstacleCost { base, obstacles }
}

impl<C> ObstacleCost<C> {
    /// The wrapped base cost.
    pub fn base(&self) -> &C {
        &self.base
    }

    /// The obstacles, in the order they were given.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    fn penalty(&self, state: &[f64]) -> f64 {
        self.obstacles.iter().map(|o| o.penalty(state)).sum()
    }
}

impl<C: Cost> Cost for ObstacleCost<C> {
    fn stage(&self, state: &[f64], control: &[f64]) -> f64 {
        self.base.stage(state, control) + self.penalty(state)
    }

    fn terminal(&self, state: &[f64]) -> f64 {
        self.base.terminal(state) + self.penalty(state)
    }
}
