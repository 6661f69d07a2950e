use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use hjb_core::Vector;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Pde,
    Mdp,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pde => "pde",
            Self::Mdp => "mdp",
        })
    }
}

/// Rollout to run under the solved policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RolloutConfig {
    pub start: Vector,
    #[serde(default = "default_steps")]
    pub steps: usize,
    #[serde(default = "default_dt")]
    pub dt: f64,
}

fn default_steps() -> usize {
    100
}

fn default_dt() -> f64 {
    0.05
}

/// Contents of a `hjb solve --config` file.
///
/// The `pde` and `mdp` sections are passed to the job service unchanged and
/// validated there.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveConfig {
    pub mode: Mode,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub pde: Option<Value>,
    #[serde(default)]
    pub mdp: Option<Value>,
    #[serde(default)]
    pub rollout: Option<RolloutConfig>,
}

impl SolveConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }
}
