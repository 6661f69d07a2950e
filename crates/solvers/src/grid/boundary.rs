use serde::{Deserialize, Serialize};

/// How a neighbor lookup past the edge of an axis is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    /// Repeat the edge node, giving a zero one-sided difference.
    #[default]
    Clamp,

    /// Wrap around to the opposite edge.
    #[serde(alias = "wrap")]
    Periodic,

    /// Mirror about the edge node (a Neumann-like zero-flux condition).
    #[serde(alias = "neumann")]
    Reflect,
}

impl Boundary {
    /// Maps a possibly out-of-range coordinate onto `0..n`.
    ///
    /// `n` must be at least one.
    #[must_use]
    pub fn resolve(self, coord: isize, n: usize) -> usize {
        let last = n as isize - 1;
        if (0..=last).contains(&coord) {
            return coord as usize;
        }

        match self {
            Self::Clamp => coord.clamp(0, last) as usize,
            Self::Periodic => coord.rem_euclid(n as isize) as usize,
            Self::Reflect => {
                if last == 0 {
                    return 0;
                }
                let period = 2 * last;
                let folded = coord.rem_euclid(period);
                (if folded > last { period - folded } else { folded }) as usize
            }
        }
    }
}
