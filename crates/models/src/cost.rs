//! Built-in cost models.

mod obstacle;
mod quadratic;

pub use obstacle::{Obstacle, ObstacleCost, with_obstacle_cost};
pub use quadratic::QuadraticCost;
