//! Built-in dynamics models.

mod double_integrator;
mod dubins;
mod single_integrator;

pub use double_integrator::{DoubleIntegrator, DoubleIntegratorConfig};
pub use dubins::{DubinsCar, DubinsCarConfig};
pub use single_integrator::{SingleIntegrator, SingleIntegratorConfig};
