use hashbrown::HashMap;

use crate::node;

/// Immutable set of [node::GenericNode]s, indexed for processing.
///
/// Iteration follows declaration order, so that anything reported per node comes out in the same
/// order as the nodes were written.
pub struct GenericPipeline<S> {
    nodes: Vec<node::GenericNode<S>>,
    id_to_index: HashMap<node::NodeId, usize>,
}

impl<S> GenericPipeline<S> {
    /// Creates the pipeline from the given nodes. Where IDs repeat, the last declared node wins;
    /// callers that care should check with [GenericPipeline::duplicate_ids] beforehand.
    pub fn new(nodes: impl IntoIterator<Item = node::GenericNode<S>>) -> Self {
        let mut kept: Vec<node::GenericNode<S>> = Vec::new();
        let mut id_to_index: HashMap<node::NodeId, usize> = HashMap::new();
        for node in nodes {
            match id_to_index.get(&node.id) {
                Some(&index) => kept[index] = node,
                None => {
                    id_to_index.insert(node.id.clone(), kept.len());
                    kept.push(node);
                }
            }
        }
        Self {
            nodes: kept,
            id_to_index,
        }
    }

    /// Returns the IDs that appear more than once in `nodes`, each reported once.
    pub fn duplicate_ids<'a>(
        nodes: impl IntoIterator<Item = &'a node::GenericNode<S>>,
    ) -> Vec<node::NodeId>
    where
        S: 'a,
    {
        let mut counts: HashMap<&node::NodeId, usize> = HashMap::new();
        let mut duplicates = Vec::new();
        for node in nodes {
            let count = counts.entry(&node.id).or_default();
            *count += 1;
            if *count == 2 {
                duplicates.push(node.id.clone());
            }
        }
        duplicates
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns an [Iterator] over all [node::GenericNode]s in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &node::GenericNode<S>> {
        self.nodes.iter()
    }

    /// Returns the [node::GenericNode] for the given [node::NodeId].
    pub fn get(&self, node_id: &node::NodeId) -> Option<&node::GenericNode<S>> {
        self.id_to_index
            .get(node_id)
            .and_then(|&index| self.nodes.get(index))
    }

    /// Returns the IDs of public nodes, in declaration order.
    pub fn public_node_ids(&self) -> Vec<node::NodeId> {
        self.nodes
            .iter()
            .filter(|node| node.public)
            .map(|node| node.id.clone())
            .collect()
    }

    /// Returns the IDs of nodes carrying any of the given tags (or tags nested beneath them), in
    /// declaration order.
    pub fn tagged_node_ids(&self, tags: &[node::Tag]) -> Vec<node::NodeId> {
        self.nodes
            .iter()
            .filter(|node| tags.iter().any(|tag| node.has_tag_or_child(tag)))
            .map(|node| node.id.clone())
            .collect()
    }
}
