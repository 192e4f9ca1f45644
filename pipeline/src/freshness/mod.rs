//! Make-like staleness checks between an output file and the artifacts it is built from.


use std::{
    io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use crate::{NodeId, intermediates::Artifact};

/// Why an output has to be (re)built.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StaleReason {
    /// The output does not exist.
    Missing,
    /// The prerequisite was rebuilt earlier in this run, or would be in a dry run.
    PrerequisiteRebuilt(NodeId),
    /// The prerequisite was modified more recently than the output.
    PrerequisiteNewer(NodeId),
}

impl std::fmt::Display for StaleReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StaleReason::Missing => f.write_str("output is missing"),
            StaleReason::PrerequisiteRebuilt(id) => write!(f, "prerequisite {id} was rebuilt"),
            StaleReason::PrerequisiteNewer(id) => write!(f, "prerequisite {id} is newer"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Freshness {
    UpToDate,
    Stale(StaleReason),
}

#[derive(Debug, thiserror::Error)]
pub enum FreshnessError {
    #[error("prerequisite {node_id} at {path:?} no longer exists")]
    PrerequisiteVanished { node_id: NodeId, path: PathBuf },
    #[error("reading modification time of {path:?}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Decides whether `target` must be built from `prerequisites`.
///
/// Checks, in order: the target is missing, a prerequisite was renewed in this run, a
/// prerequisite is strictly newer than the target. Equal modification times are up to date.
pub fn check(
    target: &Path,
    prerequisites: &[(&NodeId, &Artifact)],
) -> Result<Freshness, FreshnessError> {
    let Some(target_modified) = modified(target)? else {
        return Ok(Freshness::Stale(StaleReason::Missing));
    };

    if let Some((id, _)) = prerequisites
        .iter()
        .find(|(_, artifact)| artifact.is_renewed())
    {
        return Ok(Freshness::Stale(StaleReason::PrerequisiteRebuilt(
            (*id).clone(),
        )));
    }

    for (id, artifact) in prerequisites {
        let prerequisite_modified =
            modified(&artifact.path)?.ok_or_else(|| FreshnessError::PrerequisiteVanished {
                node_id: (*id).clone(),
                path: artifact.path.clone(),
            })?;
        if prerequisite_modified > target_modified {
            return Ok(Freshness::Stale(StaleReason::PrerequisiteNewer((*id).clone())));
        }
    }

    Ok(Freshness::UpToDate)
}

/// Returns the modification time of the file at `path`, or [None] if there is no such file.
fn modified(path: &Path) -> Result<Option<SystemTime>, FreshnessError> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(FreshnessError::Metadata {
                path: path.to_owned(),
                source,
            });
        }
    };
    metadata
        .modified()
        .map(Some)
        .map_err(|source| FreshnessError::Metadata {
            path: path.to_owned(),
            source,
        })
}
