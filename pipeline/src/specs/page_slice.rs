use serde::{Deserialize, Serialize};

use crate::spec_types::{OutputPathBuf, pdf::PageRange};

/// Specifies a PDF made from a range of pages of another PDF.
#[derive(Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PageSlice {
    /// Node producing the PDF to take pages from.
    pub source: crate::NodeId,
    pub pages: PageRange,
    pub output: OutputPathBuf,
}
