//! Registration of prerequisites (inputs) for nodes within a pipeline.

use hashbrown::HashMap;

use crate::node;

/// Registers prerequisite nodes for the nodes of a pipeline.
#[derive(Default)]
pub struct InputsRegistrator {
    deps: HashMap<node::NodeId, Vec<node::NodeId>>,
}

impl InputsRegistrator {
    /// Creates a new empty [InputsRegistrator].
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns a [NodeInputsRegistrator] for registering inputs for the given [node::NodeId].
    pub fn for_node<'a>(&'a mut self, node_id: &'a node::NodeId) -> NodeInputsRegistrator<'a> {
        NodeInputsRegistrator { node_id, reg: self }
    }

    /// Consumes the [InputsRegistrator] and returns the registered prerequisites of each node, in
    /// registration order and without repeats. Nodes that registered nothing are absent.
    pub fn build(self) -> HashMap<node::NodeId, Vec<node::NodeId>> {
        self.deps
    }
}

/// Registers prerequisites for a single node.
pub struct NodeInputsRegistrator<'a> {
    node_id: &'a node::NodeId,
    reg: &'a mut InputsRegistrator,
}

impl<'a> NodeInputsRegistrator<'a> {
    /// Declares that the node with ID `dependency_node_id` must be processed successfully before
    /// the [node::NodeId] given to [InputsRegistrator::for_node].
    pub fn add_input(&mut self, dependency_node_id: &node::NodeId) {
        let deps = self.reg.deps.entry(self.node_id.clone()).or_default();
        if !deps.contains(dependency_node_id) {
            deps.push(dependency_node_id.clone());
        }
    }
}
