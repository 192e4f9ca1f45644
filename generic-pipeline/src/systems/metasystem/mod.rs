
use std::{collections::BTreeMap, rc::Rc};

use super::{GenericSystem, NodeResult};
use crate::{
    intermediates,
    node::{self, SpecTrait},
    plinputs,
};

type Discrim<P> = <<P as crate::PipelineTypes>::Spec as node::SpecTrait>::Discrim;

/// Produces the error reported for nodes whose spec type has no registered system.
pub type MissingSystemErrorFn<P> =
    Box<dyn Fn(Discrim<P>) -> <P as crate::PipelineTypes>::SystemError>;

/// A system that delegates to other systems based on the discriminant of any given
/// [node::GenericNode]'s spec.
pub struct GenericMetaSystem<P>
where
    P: crate::PipelineTypes,
{
    systems: hashbrown::HashMap<Discrim<P>, Rc<dyn GenericSystem<P>>>,
    missing_system_error: MissingSystemErrorFn<P>,
}

impl<P> GenericMetaSystem<P>
where
    P: crate::PipelineTypes,
{
    /// Creates a new [GenericMetaSystem] that delegates to the given systems for the given
    /// discriminants. Nodes of any other type fail with the error built by
    /// `missing_system_error`.
    pub fn new(
        systems: hashbrown::HashMap<Discrim<P>, Rc<dyn GenericSystem<P>>>,
        missing_system_error: MissingSystemErrorFn<P>,
    ) -> Self {
        Self {
            systems,
            missing_system_error,
        }
    }

    fn system_for(
        &self,
        node: &node::GenericNode<P::Spec>,
    ) -> Result<&dyn GenericSystem<P>, P::SystemError> {
        let discrim = node.spec.discriminant();
        self.systems
            .get(&discrim)
            .map(Rc::as_ref)
            .ok_or_else(|| (self.missing_system_error)(discrim))
    }
}

impl<P> GenericSystem<P> for GenericMetaSystem<P>
where
    P: crate::PipelineTypes,
{
    fn inputs<'a>(
        &self,
        node: &node::GenericNode<P::Spec>,
        reg: &'a mut plinputs::NodeInputsRegistrator<'a>,
    ) -> Result<(), P::SystemError> {
        self.system_for(node)?.inputs(node, reg)
    }

    fn preflight(&self, node: &node::GenericNode<P::Spec>) -> Result<(), P::SystemError> {
        self.system_for(node)?.preflight(node)
    }

    fn process(
        &self,
        node: &node::GenericNode<P::Spec>,
        intermediates: &intermediates::GenericIntermediateSet<P::IntermediateValue>,
    ) -> Result<P::IntermediateValue, P::SystemError> {
        self.system_for(node)?.process(node, intermediates)
    }

    /// Groups the nodes by spec type and hands each group to its system in one batch. Groups are
    /// visited in discriminant order.
    fn process_multiple<'a>(
        &self,
        nodes: &'a [&'a node::GenericNode<P::Spec>],
        intermediates: &intermediates::GenericIntermediateSet<P::IntermediateValue>,
    ) -> Vec<NodeResult<P>> {
        let mut discrim_to_nodes: BTreeMap<Discrim<P>, Vec<&'a node::GenericNode<P::Spec>>> =
            BTreeMap::new();
        for &node in nodes {
            discrim_to_nodes
                .entry(node.spec.discriminant())
                .or_default()
                .push(node);
        }

        let mut results = Vec::with_capacity(nodes.len());
        for (discrim, group) in discrim_to_nodes {
            match self.systems.get(&discrim) {
                Some(system) => {
                    results.extend(system.process_multiple(&group, intermediates));
                }
                None => {
                    log::error!("No system registered for node type {discrim:?}.");
                    results.extend(group.iter().map(|node| NodeResult {
                        id: node.id.clone(),
                        value: Err((self.missing_system_error)(discrim)),
                    }));
                }
            }
        }
        results
    }
}
