/// Running and terminal cost of an optimal control problem.
///
/// Costs are pure: the same state and control always yield the same value.
/// Layered costs (such as obstacle penalties) wrap a base cost and add to
/// both methods.
pub trait Cost {
    /// Cost rate incurred at `state` under `control`.
    fn stage(&self, state: &[f64], control: &[f64]) -> f64;

    /// Cost charged at the end of the horizon.
    ///
    /// The default implementation returns zero.
    fn terminal(&self, _state: &[f64]) -> f64 {
        0.0
    }
}

impl<C: Cost + ?Sized> Cost for &C {
    fn stage(&self, state: &[f64], control: &[f64]) -> f64 {
        (**self).stage(state, control)
    }

    fn terminal(&self, state: &[f64]) -> f64 {
        (**self).terminal(state)
    }
}

impl<C: Cost + ?Sized> Cost for Box<C> {
    fn stage(&self, state: &[f64], control: &[f64]) -> f64 {
        (**self).stage(state, control)
    }

    fn terminal(&self, state: &[f64]) -> f64 {
        (**self).terminal(state)
    }
}
