
use std::rc::Rc;

use anyhow::Result;

use super::{Action, BuildEnv, Plan, register_prerequisites};
use crate::{Node, NodeResult, intermediates, specs};

/// System that makes a PDF from a range of pages of another, using the configured page slicer.
pub struct PageSliceSystem {
    env: Rc<BuildEnv>,
}

impl PageSliceSystem {
    pub fn new(env: Rc<BuildEnv>) -> Self {
        Self { env }
    }

    fn plan(&self, node: &Node, intermediates: &intermediates::IntermediateSet) -> Result<Plan> {
        let spec = <&specs::PageSlice>::try_from(&node.spec)?;
        let source = intermediates.require(&spec.source)?;
        self.env
            .plan(&spec.output, &[(&spec.source, source)], |output| {
                Action::Run(
                    self.env
                        .tools
                        .page_slice_command(&source.path, spec.pages, output),
                )
            })
    }
}

impl generic_pipeline::systems::GenericSystem<crate::PipelineTypes> for PageSliceSystem {
    fn inputs<'a>(
        &self,
        node: &Node,
        reg: &'a mut generic_pipeline::plinputs::NodeInputsRegistrator<'a>,
    ) -> Result<()> {
        register_prerequisites(node, reg);
        Ok(())
    }

    fn process(
        &self,
        node: &Node,
        intermediates: &intermediates::IntermediateSet,
    ) -> Result<intermediates::Artifact> {
        self.env
            .process_one(node, |node| self.plan(node, intermediates))
    }

    fn process_multiple<'a>(
        &self,
        nodes: &'a [&'a Node],
        intermediates: &intermediates::IntermediateSet,
    ) -> Vec<NodeResult> {
        self.env
            .process_planned(nodes, |node| self.plan(node, intermediates))
    }
}
