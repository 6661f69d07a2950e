use crate::{DimensionError, Vector};

/// Admissible range of one control axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlBounds {
    pub min: f64,
    pub max: f64,
}

impl ControlBounds {
    /// Creates bounds from a minimum and maximum.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Creates bounds `[-limit, limit]`.
    #[must_use]
    pub fn symmetric(limit: f64) -> Self {
        Self::new(-limit, limit)
    }

    /// Returns `max - min`.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Clamps `value` into the bounds.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

/// Continuous-time system dynamics `x' = f(x, u)`.
///
/// A dynamics model is a stateless descriptor: every solver consumes it the
/// same way, and identical inputs always produce identical outputs.
///
/// Implementations must reject wrong-length states or controls with a
/// [`DimensionError`] instead of padding or truncating them.
pub trait Dynamics {
    /// Number of state variables.
    fn state_dim(&self) -> usize;

    /// Number of control variables.
    fn control_dim(&self) -> usize;

    /// Per-axis control bounds, one entry per control variable.
    fn control_bounds(&self) -> &[ControlBounds];

    /// Spacing used when the control set is discretized.
    fn control_resolution(&self) -> f64;

    /// Evaluates the state derivative at `state` under `control`.
    ///
    /// # Errors
    ///
    /// Returns a [`DimensionError`] if `state` or `control` has the wrong length.
    fn evaluate(&self, state: &[f64], control: &[f64]) -> Result<Vector, DimensionError>;

    /// Upper bound on the magnitude of any characteristic speed component.
    ///
    /// Time-dependent solvers derive their default CFL step from this value.
    fn max_speed(&self) -> f64;

    /// Per-axis characteristic (advection) speeds at `state` under `control`.
    ///
    /// The sign of each component selects the upwind side of the spatial
    /// difference on that axis. Defaults to [`Dynamics::evaluate`].
    ///
    /// # Errors
    ///
    /// Returns a [`DimensionError`] if `state` or `control` has the wrong length.
    fn characteristic_speeds(
        &self,
        state: &[f64],
        control: &[f64],
    ) -> Result<Vector, DimensionError> {
        self.evaluate(state, control)
    }

    /// Checks `state` and `control` against the declared dimensions.
    ///
    /// # Errors
    ///
    /// Returns a [`DimensionError`] for the first mismatched argument.
    fn check_dimensions(&self, state: &[f64], control: &[f64]) -> Result<(), DimensionError> {
        DimensionError::check("state", self.state_dim(), state)?;
        DimensionError::check("control", self.control_dim(), control)
    }
}

impl<D: Dynamics + ?Sized> Dynamics for &D {
    fn state_dim(&self) -> usize {
        (**self).state_dim()
    }

    fn control_dim(&self) -> usize {
        (**self).control_dim()
    }

    fn control_bounds(&self) -> &[ControlBounds] {
        (**self).control_bounds()
    }

    fn control_resolution(&self) -> f64 {
        (**self).control_resolution()
    }

    fn evaluate(&self, state: &[f64], control: &[f64]) -> Result<Vector, DimensionError> {
        (**self).evaluate(state, control)
    }

    fn max_speed(&self) -> f64 {
        (**self).max_speed()
    }

    fn characteristic_speeds(
        &self,
        state: &[f64],
        control: &[f64],
    ) -> Result<Vector, DimensionError> {
        (**self).characteristic_speeds(state, control)
    }
}

impl<D: Dynamics + ?Sized> Dynamics for Box<D> {
    fn state_dim(&self) -> usize {
        (**self).state_dim()
    }

    fn control_dim(&self) -> usize {
        (**self).control_dim()
    }

    fn control_bounds(&self) -> &[ControlBounds] {
        (**self).control_bounds()
    }

    fn control_resolution(&self) -> f64 {
        (**self).control_resolution()
    }

    fn evaluate(&self, state: &[f64], control: &[f64]) -> Result<Vector, DimensionError> {
        (**self).evaluate(state, control)
    }

    fn max_speed(&self) -> f64 {
        (**self).max_speed()
    }

    fn characteristic_speeds(
        &self,
        state: &[f64],
        control: &[f64],
    ) -> Result<Vector, DimensionError> {
        (**self).characteristic_speeds(state, control)
    }
}
