//! Built-in dynamics and cost models.
//!
//! # Dynamics
//!
//! - [`SingleIntegrator`] — `x' = u`
//! - [`DoubleIntegrator`] — positions driven by damped, actuated velocities
//! - [`DubinsCar`] — constant-speed planar vehicle with bounded turn rate
//!
//! # Costs
//!
//! - [`QuadraticCost`] — weighted squared distance to a goal plus control effort
//! - [`ObstacleCost`] — soft penalties layered on any base cost, built with
//!   [`with_obstacle_cost`]
//!
//! # Specs
//!
//! [`DynamicsSpec`] and [`CostSpec`] are serde-friendly descriptions that
//! validate into the tagged [`AnyDynamics`] and [`AnyCost`] variants.

pub mod cost;
pub mod dynamics;
mod error;
mod spec;

pub use cost::{Obstacle, ObstacleCost, QuadraticCost, with_obstacle_cost};
pub use dynamics::{
    DoubleIntegrator, DoubleIntegratorConfig, DubinsCar, DubinsCarConfig, SingleIntegrator,
    SingleIntegratorConfig,
};
pub use error::ModelError;
pub use spec::{AnyCost, AnyDynamics, CostSpec, DynamicsSpec};
