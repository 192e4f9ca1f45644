use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

/// Specifies an externally supplied input file that must exist before anything is built.
///
/// A relative path is resolved against the build directory.
#[derive(Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SourceFile {
    #[serde(deserialize_with = "non_empty_path")]
    pub path: PathBuf,
}

fn non_empty_path<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
where
    D: Deserializer<'de>,
{
    let path = PathBuf::deserialize(deserializer)?;
    if path.as_os_str().is_empty() {
        return Err(serde::de::Error::custom("source path is empty"));
    }
    Ok(path)
}
