use serde::{Deserialize, Serialize};

use crate::spec_types::OutputPathBuf;

/// Specifies a file downloaded once from a fixed URL. An existing output is never re-fetched.
#[derive(Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Fetch {
    pub url: String,
    pub output: OutputPathBuf,
}
