//! Intermediate data types, that are outputs of some [crate::Node] and inputs to others during
//! a build.

use std::path::PathBuf;

use crate::freshness::StaleReason;

/// A file produced (or, in a dry run, to be produced) by a node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Artifact {
    /// Location of the file, already resolved against the build directory.
    pub path: PathBuf,
    pub state: ArtifactState,
}

/// What happened to an [Artifact] during this run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ArtifactState {
    /// Existing file, used as it is.
    Present,
    /// Rebuilt during this run.
    Built { reason: StaleReason },
    /// Would be rebuilt, had this not been a dry run.
    Planned { reason: StaleReason, action: String },
}

impl Artifact {
    pub fn present(path: PathBuf) -> Self {
        Self {
            path,
            state: ArtifactState::Present,
        }
    }

    /// Returns true if the artifact was (or would have been) rebuilt in this run, which makes
    /// everything built from it stale too.
    pub fn is_renewed(&self) -> bool {
        !matches!(self.state, ArtifactState::Present)
    }
}

pub type IntermediateSet = generic_pipeline::intermediates::GenericIntermediateSet<Artifact>;
