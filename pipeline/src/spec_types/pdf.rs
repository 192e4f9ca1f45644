//! PDF-related recipe types.


use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Extraction algorithm for Tabula to use.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TabulaExtractionMethod {
    /// Let Tabula decide per page.
    Guess,
    /// Detect cells from ruling lines ("lines" mode).
    #[default]
    Lattice,
    /// Detect cells from whitespace between text.
    Stream,
}

impl TabulaExtractionMethod {
    /// Returns the tabula-java command line flag selecting this method.
    pub fn flag(self) -> &'static str {
        match self {
            TabulaExtractionMethod::Guess => "--guess",
            TabulaExtractionMethod::Lattice => "--lattice",
            TabulaExtractionMethod::Stream => "--stream",
        }
    }
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("page range {first}-{last} ends before it starts")]
pub struct PageRangeError {
    pub first: NonZeroU32,
    pub last: NonZeroU32,
}

/// Inclusive range of 1-based page numbers within a PDF.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "RawPageRange", into = "RawPageRange")]
pub struct PageRange {
    first: NonZeroU32,
    last: NonZeroU32,
}

impl PageRange {
    pub fn new(first: NonZeroU32, last: NonZeroU32) -> Result<Self, PageRangeError> {
        if first > last {
            return Err(PageRangeError { first, last });
        }
        Ok(Self { first, last })
    }
}

/// Formats as `first-last`, the form taken by both pdftk and qpdf.
impl std::fmt::Display for PageRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

#[derive(Clone, Copy, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct RawPageRange {
    first: NonZeroU32,
    last: NonZeroU32,
}

impl TryFrom<RawPageRange> for PageRange {
    type Error = PageRangeError;

    fn try_from(value: RawPageRange) -> Result<Self, Self::Error> {
        Self::new(value.first, value.last)
    }
}

impl From<PageRange> for RawPageRange {
    fn from(value: PageRange) -> Self {
        Self {
            first: value.first,
            last: value.last,
        }
    }
}
