//! Concrete specialisations of [generic_pipeline::node::GenericNode]s.

mod fetch;
mod page_slice;
mod source_file;
mod table_extract;
#[cfg(test)]
mod test_defaults;
#[cfg(test)]
mod tests;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::impl_spec_conversions;
pub use fetch::Fetch;
pub use page_slice::PageSlice;
pub use source_file::SourceFile;
pub use table_extract::TableExtract;

/// Per-type wrapper of a specific type of recipe node.
#[derive(Debug, Deserialize, Eq, PartialEq, Serialize, strum_macros::EnumDiscriminants)]
#[strum_discriminants(derive(Hash, PartialOrd, Ord, strum_macros::Display))]
#[serde(tag = "type", content = "spec")]
pub enum Spec {
    SourceFile(SourceFile),
    Fetch(Fetch),
    PageSlice(PageSlice),
    TableExtract(TableExtract),
}

impl Spec {
    /// Returns the path of the file that the node provides, relative to the build directory
    /// unless absolute.
    pub fn artifact_path(&self) -> &Path {
        match self {
            Spec::SourceFile(spec) => &spec.path,
            Spec::Fetch(spec) => spec.output.as_ref(),
            Spec::PageSlice(spec) => spec.output.as_ref(),
            Spec::TableExtract(spec) => spec.output.as_ref(),
        }
    }

    /// Returns the IDs of the nodes that this node is built from.
    pub fn prerequisites(&self) -> Vec<&crate::NodeId> {
        match self {
            Spec::SourceFile(_) | Spec::Fetch(_) => Vec::new(),
            Spec::PageSlice(spec) => vec![&spec.source],
            Spec::TableExtract(spec) => vec![&spec.pdf, &spec.tabula],
        }
    }
}

impl generic_pipeline::node::SpecTrait for Spec {
    type Discrim = SpecDiscriminants;

    fn discriminant(&self) -> Self::Discrim {
        self.into()
    }
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("node spec is not of type {expected}, got {got}")]
pub struct WrongSpecType {
    pub expected: SpecDiscriminants,
    pub got: SpecDiscriminants,
}

impl_spec_conversions!(SourceFile, Fetch, PageSlice, TableExtract);
