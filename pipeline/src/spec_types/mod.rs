//! Types used within recipe node specification types.


use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

pub mod pdf;

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum OutputPathError {
    #[error("output path is empty")]
    Empty,
    #[error("output path {0:?} must be relative")]
    NotRelative(PathBuf),
    #[error("output path {0:?} must not contain \"..\" components")]
    ParentComponent(PathBuf),
    #[error("output path {0:?} does not name a file")]
    NoFileName(PathBuf),
}

/// Relative path to an output file within the build directory.
///
/// Absolute paths, paths that could escape the build directory through `..`, and paths that
/// name only the build directory itself are rejected.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "PathBuf", into = "PathBuf")]
pub struct OutputPathBuf(PathBuf);

impl OutputPathBuf {
    pub fn new<P>(value: P) -> Result<Self, OutputPathError>
    where
        P: Into<PathBuf>,
    {
        let path = value.into();
        if path.as_os_str().is_empty() {
            return Err(OutputPathError::Empty);
        }
        let mut named = false;
        for component in path.components() {
            match component {
                Component::Prefix(_) | Component::RootDir => {
                    return Err(OutputPathError::NotRelative(path));
                }
                Component::ParentDir => return Err(OutputPathError::ParentComponent(path)),
                Component::CurDir => {}
                Component::Normal(_) => named = true,
            }
        }
        if !named {
            return Err(OutputPathError::NoFileName(path));
        }
        Ok(Self(path))
    }

    /// Returns the path of the output when building in `root`.
    pub fn under(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }
}

impl AsRef<Path> for OutputPathBuf {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl TryFrom<PathBuf> for OutputPathBuf {
    type Error = OutputPathError;

    fn try_from(value: PathBuf) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OutputPathBuf> for PathBuf {
    fn from(value: OutputPathBuf) -> Self {
        value.0
    }
}

impl std::fmt::Display for OutputPathBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.display().fmt(f)
    }
}
