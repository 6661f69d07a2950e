use thiserror::Error;

/// A fixed-length ordered sequence of reals, used for states and controls.
pub type Vector = Vec<f64>;

/// A slice had a different length than the problem requires.
///
/// Solvers never pad or truncate mismatched inputs; they fail with this error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{what} has length {actual}, expected {expected}")]
pub struct DimensionError {
    /// What was being checked (for example `"state"` or `"control"`).
    pub what: &'static str,

    /// The required length.
    pub expected: usize,

    /// The length that was provided.
    pub actual: usize,
}

impl DimensionError {
    /// Checks that `values` has exactly `expected` entries.
    ///
    /// # Errors
    ///
    /// Returns a [`DimensionError`] naming `what` if the lengths differ.
    pub fn check(what: &'static str, expected: usize, values: &[f64]) -> Result<(), Self> {
        Self::check_len(what, expected, values.len())
    }

    /// Checks that a collection length equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns a [`DimensionError`] naming `what` if the lengths differ.
    pub fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self {
                what,
                expected,
                actual,
            })
        }
    }
}

/// Dot product of two equal-length slices.
///
/// # Errors
///
/// Returns a [`DimensionError`] if the lengths differ.
pub fn dot(a: &[f64], b: &[f64]) -> Result<f64, DimensionError> {
    DimensionError::check("vector", a.len(), b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}
