
use std::rc::Rc;

use anyhow::Result;

use super::{Action, BuildEnv, Plan, register_prerequisites};
use crate::{Node, NodeResult, intermediates, specs};

/// System to extract the tables on a page of a PDF file into JSON, by running Tabula.
///
/// Stale nodes within a batch are extracted concurrently, up to the job limit.
pub struct TableExtractSystem {
    env: Rc<BuildEnv>,
}

impl TableExtractSystem {
    pub fn new(env: Rc<BuildEnv>) -> Self {
        Self { env }
    }

    fn plan(&self, node: &Node, intermediates: &intermediates::IntermediateSet) -> Result<Plan> {
        let spec = <&specs::TableExtract>::try_from(&node.spec)?;
        let pdf = intermediates.require(&spec.pdf)?;
        let tabula = intermediates.require(&spec.tabula)?;
        self.env.plan(
            &spec.output,
            &[(&spec.pdf, pdf), (&spec.tabula, tabula)],
            |output| {
                Action::Run(self.env.tools.tabula_command(
                    &tabula.path,
                    &pdf.path,
                    spec.page.get(),
                    spec.method,
                    output,
                ))
            },
        )
    }
}

impl generic_pipeline::systems::GenericSystem<crate::PipelineTypes> for TableExtractSystem {
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
