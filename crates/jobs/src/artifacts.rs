//! Numeric job outputs written to disk.
//!
//! Every job gets its own directory, `<root>/<job id>/`:
//!
//! | Job     | Files                                                      |
//! |---------|------------------------------------------------------------|
//! | PDE     | `V.csv` (position, value), `policy.csv` (position, control) |
//! | MDP     | `V.csv` (state, value), `policy.csv` (state, action, control) |
//! | ROLLOUT | `rollout.json` (the trajectory)                            |

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use hjb_solvers::{mdp::MarkovModel, rollout::Trajectory};
use thiserror::Error;

use crate::{
    data::{JobData, MdpData, PdeData},
    job::{Artifact, JobId},
};

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot encode trajectory: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes the artifacts of job `id` under `root` and returns what was written.
///
/// # Errors
///
/// Returns an error if the job directory or a file cannot be written.
pub fn write(root: &Path, id: JobId, data: &JobData) -> Result<Vec<Artifact>, ArtifactError> {
    let dir = root.join(id.to_string());
    fs::create_dir_all(&dir).map_err(|source| ArtifactError::Io {
        path: dir.clone(),
        source,
    })?;

    match data {
        JobData::Pde(data) => {
            let (values, policy) = pde_tables(data);
            Ok(vec![
                save(&dir, "V.csv", &values)?,
                save(&dir, "policy.csv", &policy)?,
            ])
        }
        JobData::Mdp(data) => {
            let (values, policy) = mdp_tables(data);
            Ok(vec![
                save(&dir, "V.csv", &values)?,
                save(&dir, "policy.csv", &policy)?,
            ])
        }
        JobData::Rollout(trajectory) => Ok(vec![save(
            &dir,
            "rollout.json",
            &rollout_json(trajectory)?,
        )?]),
    }
}

fn save(dir: &Path, name: &str, contents: &str) -> Result<Artifact, ArtifactError> {
    let path = dir.join(name);
    fs::write(&path, contents).map_err(|source| ArtifactError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(Artifact {
        name: name.to_owned(),
        path,
    })
}

fn pde_tables(data: &PdeData) -> (String, String) {
    let dims = data.grid.dims();
    let controls = data.controls.first().map_or(0, Vec::len);

    let mut values = header(columns("x", dims).chain(["value".to_owned()]));
    let mut policy = header(columns("x", dims).chain(columns("u", controls)));

    for point in data.grid.points() {
        push_row(&mut values, &point.position, &[data.solution.value[point.index]]);
        push_row(&mut policy, &point.position, &data.controls[point.index]);
    }
    (values, policy)
}

fn mdp_tables(data: &MdpData) -> (String, String) {
    let states = data.model.states();
    let actions = data.model.actions();
    let dims = states.first().map_or(0, Vec::len);
    let controls = actions.first().map_or(0, Vec::len);

    let mut values = header(columns("s", dims).chain(["value".to_owned()]));
    let mut policy = header(
        columns("s", dims)
            .chain(["action".to_owned()])
            .chain(columns("u", controls)),
    );

    for (index, state) in states.iter().enumerate() {
        push_row(&mut values, state, &[data.solution.value[index]]);

        let action = data.policy.actions()[index];
        let mut tail = vec![action as f64];
        tail.extend(&actions[action]);
        push_row(&mut policy, state, &tail);
    }
    (values, policy)
}

fn rollout_json(trajectory: &Trajectory) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(trajectory)
}

/// `{prefix}0`, `{prefix}1`, … up to `n` columns.
fn columns(prefix: &str, n: usize) -> impl Iterator<Item = String> + '_ {
    (0..n).map(move |i| format!("{prefix}{i}"))
}

fn header(names: impl Iterator<Item = String>) -> String {
    let mut line = names.collect::<Vec<_>>().join(",");
    line.push('\n');
    line
}

fn push_row(table: &mut String, lead: &[f64], tail: &[f64]) {
    let cells: Vec<String> = lead.iter().chain(tail).map(f64::to_string).collect();
    table.push_str(&cells.join(","));
    table.push('\n');
}
