use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of iterations between progress log lines.
const DEFAULT_PROGRESS_STRIDE: usize = 100;

/// Size caps checked against every submission before it is built.
///
/// ```toml
/// [limits]
/// max_grid_nodes = 250000
/// max_rollout_steps = 10000
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    /// Largest grid, in nodes.
    pub max_grid_nodes: usize,

    /// Largest control set a dynamics model may enumerate.
    pub max_controls: usize,

    /// Largest lattice MDP, in node-control pairs.
    pub max_lattice_entries: usize,

    /// Longest rollout, in steps.
    pub max_rollout_steps: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_grid_nodes: 1_000_000,
            max_controls: 10_000,
            max_lattice_entries: 10_000_000,
            max_rollout_steps: 1_000_000,
        }
    }
}

/// Service-wide settings, usually loaded from a TOML file.
///
/// ```toml
/// artifact_dir = "out/hjb"
/// solve_timeout_secs = 30
/// progress_stride = 50
///
/// [limits]
/// max_grid_nodes = 250000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceSettings {
    /// Where jobs write their artifacts. Nothing is written when unset.
    pub artifact_dir: Option<PathBuf>,

    /// Wall-clock budget of a single solve. Unlimited when unset.
    pub solve_timeout_secs: Option<f64>,

    /// Iterations between progress log lines.
    pub progress_stride: usize,

    /// Size caps for submissions.
    pub limits: Limits,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            artifact_dir: None,
            solve_timeout_secs: None,
            progress_stride: DEFAULT_PROGRESS_STRIDE,
            limits: Limits::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings from {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("solve_timeout_secs must be finite and positive")]
    Timeout,
}

impl ServiceSettings {
    /// Parses and validates settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid settings TOML or the timeout
    /// is not a positive number of seconds.
    pub fn from_toml(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or
    /// [`ServiceSettings::from_toml`] rejects it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::Timeout`] if the timeout is set but is not a
    /// representable positive duration.
    pub fn validate(&self) -> Result<(), SettingsError> {
        match self.solve_timeout_secs {
            Some(secs) if Duration::try_from_secs_f64(secs).map_or(true, |d| d.is_zero()) => {
                Err(SettingsError::Timeout)
            }
            _ => Ok(()),
        }
    }

    /// The solve budget as a duration, if one is set and valid.
    #[must_use]
    pub fn solve_timeout(&self) -> Option<Duration> {
        self.solve_timeout_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .filter(|budget| !budget.is_zero())
    }
}
