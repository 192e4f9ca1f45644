//! Intermediate values, that are outputs of some [crate::node::GenericNode] and inputs to others
//! during processing.

use crate::node;

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum IntermediateError {
    #[error("intermediate value for node {node_id:?} not found")]
    NotFound { node_id: node::NodeId },
}

#[derive(Debug, PartialEq)]
pub struct GenericIntermediateSet<V> {
    intermediates: hashbrown::HashMap<node::NodeId, V>,
}

impl<V> Default for GenericIntermediateSet<V> {
    fn default() -> Self {
        Self {
            intermediates: Default::default(),
        }
    }
}

impl<V> GenericIntermediateSet<V> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn set(&mut self, node_id: node::NodeId, intermediate: V) {
        self.intermediates.insert(node_id, intermediate);
    }

    pub fn get<'a>(&'a self, node_id: &node::NodeId) -> Option<&'a V> {
        self.intermediates.get(node_id)
    }

    /// Returns the intermediate value for `node_id`, or an error if it is absent.
    pub fn require<'a>(&'a self, node_id: &node::NodeId) -> Result<&'a V, IntermediateError> {
        self.get(node_id).ok_or_else(|| IntermediateError::NotFound {
            node_id: node_id.clone(),
        })
    }
}
