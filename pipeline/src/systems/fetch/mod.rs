
use std::rc::Rc;

use anyhow::Result;

use super::{Action, BuildEnv, Plan};
use crate::{Node, NodeResult, intermediates, specs};

/// System that downloads files. A file that exists is trusted, whatever its age.
pub struct FetchSystem {
    env: Rc<BuildEnv>,
}

impl FetchSystem {
    pub fn new(env: Rc<BuildEnv>) -> Self {
        Self { env }
    }

    fn plan(&self, node: &Node) -> Result<Plan> {
        let spec = <&specs::Fetch>::try_from(&node.spec)?;
        self.env.plan(&spec.output, &[], |_| Action::Fetch {
            url: spec.url.clone(),
        })
    }
}

impl generic_pipeline::systems::GenericSystem<crate::PipelineTypes> for FetchSystem {
    fn process(
        &self,
        node: &Node,
        _intermediates: &intermediates::IntermediateSet,
    ) -> Result<intermediates::Artifact> {
        self.env.process_one(node, |node| self.plan(node))
    }

    fn process_multiple<'a>(
        &self,
        nodes: &'a [&'a Node],
        _intermediates: &intermediates::IntermediateSet,
    ) -> Vec<NodeResult> {
        self.env.process_planned(nodes, |node| self.plan(node))
    }
}
