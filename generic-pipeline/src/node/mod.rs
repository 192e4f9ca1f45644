//! Data types that declare a single artifact-producing step of a pipeline.

mod core_type;
#[cfg(any(test, feature = "testing"))]
mod test_defaults;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

pub use core_type::{NodeId, Tag, ValueError};

/// Required trait for the spec type carried by a [GenericNode], so that nodes can be dispatched
/// to a system by their kind.
pub trait SpecTrait {
    type Discrim: Copy + std::fmt::Debug + Eq + std::hash::Hash + Ord;

    fn discriminant(&self) -> Self::Discrim;
}

/// Generic wrapper and properties of a pipeline node.
///
/// `S` is the spec type.
#[derive(Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GenericNode<S> {
    pub id: NodeId,
    #[serde(default)]
    pub tags: HashSet<Tag>,
    /// Public nodes are the ones built when no explicit targets are requested.
    #[serde(default)]
    pub public: bool,
    #[serde(flatten)]
    pub spec: S,
}

impl<S> GenericNode<S> {
    /// Returns true if the node carries the given tag, or a tag nested beneath it (`peripheral`
    /// matches `peripheral/gpio`).
    pub fn has_tag_or_child(&self, tag: &Tag) -> bool {
        self.tags.iter().any(|node_tag| node_tag.is_self_or_child_of(tag))
    }
}
