//! Data types that act upon a [node::GenericNode] to perform individual parts of a pipeline.

mod metasystem;

use crate::{PipelineTypes, intermediates, node, plinputs};

pub use metasystem::GenericMetaSystem;

/// Result of processing a node.
pub struct NodeResult<P>
where
    P: PipelineTypes,
{
    pub id: node::NodeId,
    pub value: Result<P::IntermediateValue, P::SystemError>,
}

impl<P> std::fmt::Debug for NodeResult<P>
where
    P: PipelineTypes,
    P::IntermediateValue: std::fmt::Debug,
    P::SystemError: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeResult")
            .field("id", &self.id)
            .field("value", &self.value)
            .finish()
    }
}

/// Required trait for types that perform processing of a [crate::node::GenericNode].
/// Implementations are expected to be stateless with regards to nodes and their intermediates.
pub trait GenericSystem<P>
where
    P: crate::PipelineTypes,
{
    /// Registers the set of node IDs that the given node depends on as inputs.
    fn inputs<'a>(
        &self,
        _node: &node::GenericNode<P::Spec>,
        _reg: &'a mut plinputs::NodeInputsRegistrator<'a>,
    ) -> Result<(), P::SystemError> {
        Ok(())
    }

    /// Checks that can be made on the node alone, before any node in the pipeline is processed.
    fn preflight(&self, _node: &node::GenericNode<P::Spec>) -> Result<(), P::SystemError> {
        Ok(())
    }

    /// Performs processing of the given [node::GenericNode], returning its intermediate value.
    fn process(
        &self,
        node: &node::GenericNode<P::Spec>,
        intermediates: &intermediates::GenericIntermediateSet<P::IntermediateValue>,
    ) -> Result<P::IntermediateValue, P::SystemError>;

    /// Performs processing of the given [node::GenericNode]s, returning their
    /// intermediate value(s). The nodes never depend upon each other.
    ///
    /// The default implementation processes in serial. Specific implementations may choose to
    /// optimise this.
    fn process_multiple<'a>(
        &self,
        nodes: &'a [&'a node::GenericNode<P::Spec>],
        intermediates: &intermediates::GenericIntermediateSet<P::IntermediateValue>,
    ) -> Vec<NodeResult<P>> {
        nodes
            .iter()
            .map(|&node| NodeResult::<P> {
                id: node.id.clone(),
                value: self.process(node, intermediates),
            })
            .collect()
    }
}
