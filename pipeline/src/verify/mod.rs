//! Inspection of the JSON written by Tabula, for checking what a build produced.


use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("reading {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path:?} is not a Tabula JSON table set")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One table found by Tabula. Geometry fields are ignored.
#[derive(Debug, Deserialize)]
pub struct JsonTable {
    #[serde(default)]
    pub extraction_method: String,
    #[serde(default)]
    pub page_number: u32,
    pub data: Vec<JsonRow>,
}

pub type JsonRow = Vec<JsonCell>;

#[derive(Debug, Deserialize)]
pub struct JsonCell {
    #[serde(default)]
    pub text: String,
}

/// Size of the tables in one JSON output.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TableSummary {
    pub tables: usize,
    pub rows: usize,
    /// Largest number of cells in any row.
    pub max_columns: usize,
}

impl std::fmt::Display for TableSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} table(s), {} row(s), up to {} column(s)",
            self.tables, self.rows, self.max_columns
        )
    }
}

pub fn summarise(tables: &[JsonTable]) -> TableSummary {
    let rows = tables.iter().flat_map(|table| &table.data);
    TableSummary {
        tables: tables.len(),
        rows: rows.clone().count(),
        max_columns: rows.map(Vec::len).max().unwrap_or(0),
    }
}

/// Reads the Tabula JSON output at `path` and summarises it.
pub fn summarise_table_json(path: &Path) -> Result<TableSummary, VerifyError> {
    let contents = std::fs::read(path).map_err(|source| VerifyError::Read {
        path: path.to_owned(),
        source,
    })?;
    let tables: Vec<JsonTable> =
        serde_json::from_slice(&contents).map_err(|source| VerifyError::Parse {
            path: path.to_owned(),
            source,
        })?;
    Ok(summarise(&tables))
}
