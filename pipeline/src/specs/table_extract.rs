use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::spec_types::{OutputPathBuf, pdf};

/// Specifies the extraction of the tables on one page of a PDF into a JSON file, using Tabula.
#[derive(Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TableExtract {
    /// Node producing the PDF to extract from.
    pub pdf: crate::NodeId,
    /// Node producing the Tabula jar.
    pub tabula: crate::NodeId,
    /// 1-based page within `pdf`.
    pub page: NonZeroU32,
    #[serde(default)]
    pub method: pdf::TabulaExtractionMethod,
    pub output: OutputPathBuf,
}
