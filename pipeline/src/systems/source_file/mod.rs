
use std::{path::PathBuf, rc::Rc};

use anyhow::{Context, Result};

use super::BuildEnv;
use crate::{Node, build::BuildError, intermediates, specs};

/// System for externally supplied input files. These are never built, only checked for.
pub struct SourceFileSystem {
    env: Rc<BuildEnv>,
}

impl SourceFileSystem {
    pub fn new(env: Rc<BuildEnv>) -> Self {
        Self { env }
    }

    fn existing_path(&self, node: &Node) -> Result<PathBuf> {
        let spec = <&specs::SourceFile>::try_from(&node.spec)?;
        let path = self.env.resolve(&spec.path);
        if !path
            .try_exists()
            .with_context(|| format!("checking for source file {path:?}"))?
        {
            return Err(BuildError::MissingSource {
                node_id: node.id.clone(),
                path,
            }
            .into());
        }
        Ok(path)
    }
}

impl generic_pipeline::systems::GenericSystem<crate::PipelineTypes> for SourceFileSystem {
    fn preflight(&self, node: &Node) -> Result<()> {
        self.existing_path(node).map(|_| ())
    }

    fn process(
        &self,
        node: &Node,
        _intermediates: &intermediates::IntermediateSet,
    ) -> Result<intermediates::Artifact> {
        self.existing_path(node).map(intermediates::Artifact::present)
    }
}
