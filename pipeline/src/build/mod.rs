//! Runs a [Recipe], reporting what happened to each node.


use std::{num::NonZeroUsize, path::PathBuf, rc::Rc};

use generic_pipeline::{
    node::Tag,
    processing::{GenericProcessor, NodeError, ProcessOptions, Selection, SelectionError},
};

use crate::{
    NodeId, Pipeline, PipelineTypes,
    fetch::Fetcher,
    freshness::StaleReason,
    intermediates::ArtifactState,
    recipe::{Recipe, RecipeError},
    specs::Spec,
    systems::{self, BuildEnv},
    tools::ToolRunner,
};

/// Errors specific to building nodes, as opposed to those of the tools run for them.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("source file {path:?} for {node_id} does not exist")]
    MissingSource { node_id: NodeId, path: PathBuf },
    #[error("building {node_id} succeeded, but did not produce {path:?}")]
    OutputNotProduced { node_id: NodeId, path: PathBuf },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BuildOptions {
    /// Keep building whatever does not depend on a failed node.
    pub keep_going: bool,
    /// Only report what would be built.
    pub dry_run: bool,
    /// Maximum number of external programs to run at once.
    pub jobs: NonZeroUsize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            keep_going: false,
            dry_run: false,
            jobs: NonZeroUsize::MIN,
        }
    }
}

/// Which nodes to build. Prerequisites of the chosen nodes are always included.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TargetSelection {
    /// Public nodes, or every node if none are public.
    Default,
    Named(Vec<NodeId>),
    /// Nodes carrying any of the tags, or tags nested beneath them.
    Tagged(Vec<Tag>),
}

#[derive(Debug)]
pub enum NodeStatus {
    /// Externally supplied file, present.
    Source,
    UpToDate,
    Built { reason: StaleReason },
    WouldBuild { reason: StaleReason, action: String },
    Failed(anyhow::Error),
    /// Not attempted, for the given reason.
    Skipped(String),
}

impl NodeStatus {
    pub fn is_success(&self) -> bool {
        !matches!(self, NodeStatus::Failed(_) | NodeStatus::Skipped(_))
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeStatus::Source => f.write_str("source"),
            NodeStatus::UpToDate => f.write_str("up to date"),
            NodeStatus::Built { reason } => write!(f, "built ({reason})"),
            NodeStatus::WouldBuild { reason, action } => {
                write!(f, "would build ({reason}): {action}")
            }
            NodeStatus::Failed(err) => write!(f, "failed: {err:#}"),
            NodeStatus::Skipped(reason) => write!(f, "skipped: {reason}"),
        }
    }
}

#[derive(Debug)]
pub struct NodeReport {
    pub id: NodeId,
    pub status: NodeStatus,
}

/// Outcome of a build. Nodes are listed in recipe order.
#[derive(Debug)]
pub struct BuildReport {
    pub nodes: Vec<NodeReport>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.nodes.iter().all(|node| node.status.is_success())
    }

    pub fn get(&self, node_id: &NodeId) -> Option<&NodeStatus> {
        self.nodes
            .iter()
            .find(|node| &node.id == node_id)
            .map(|node| &node.status)
    }
}

/// Builds the nodes of a recipe within a build directory.
pub struct Builder {
    pipeline: Pipeline,
    processor: GenericProcessor<PipelineTypes>,
}

impl Builder {
    pub fn new(
        recipe: Recipe,
        root: PathBuf,
        options: BuildOptions,
        runner: Box<dyn ToolRunner>,
        fetcher: Box<dyn Fetcher>,
    ) -> Result<Self, RecipeError> {
        recipe.validate()?;
        let (tools, pipeline) = recipe.into_parts();
        let env = Rc::new(BuildEnv {
            root,
            dry_run: options.dry_run,
            jobs: options.jobs,
            tools,
            runner,
            fetcher,
        });
        let processor = GenericProcessor::with_options(
            Rc::new(systems::new_meta_system(env)),
            ProcessOptions {
                keep_going: options.keep_going,
            },
        );
        Ok(Self {
            pipeline,
            processor,
        })
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn build(&self, targets: &TargetSelection) -> Result<BuildReport, RecipeError> {
        let selection = self.selection(targets)?;
        let mut outcome = self
            .processor
            .process(&self.pipeline, &selection)
            .map_err(|err| match err {
                SelectionError::UnknownTarget(id) => RecipeError::UnknownTarget(id),
            })?;

        let mut nodes = Vec::with_capacity(outcome.node_results.len());
        for node in self.pipeline.nodes() {
            let Some(result) = outcome.node_results.remove(&node.id) else {
                continue;
            };
            let status = match result {
                Ok(()) => match outcome.intermediates.get(&node.id).map(|a| &a.state) {
                    Some(ArtifactState::Present) => match node.spec {
                        Spec::SourceFile(_) => NodeStatus::Source,
                        _ => NodeStatus::UpToDate,
                    },
                    Some(ArtifactState::Built { reason }) => NodeStatus::Built {
                        reason: reason.clone(),
                    },
                    Some(ArtifactState::Planned { reason, action }) => NodeStatus::WouldBuild {
                        reason: reason.clone(),
                        action: action.clone(),
                    },
                    None => NodeStatus::Failed(anyhow::anyhow!(
                        "bug: no artifact recorded for {}",
                        node.id
                    )),
                },
                Err(NodeError::ProcessErrored(err)) => NodeStatus::Failed(err),
                Err(NodeError::Unprocessed(reason)) => NodeStatus::Skipped(reason.to_string()),
                Err(NodeError::Halted) => {
                    NodeStatus::Skipped("halted after an earlier failure".to_string())
                }
                Err(err @ (NodeError::Unexpected | NodeError::InternalError(_))) => {
                    NodeStatus::Failed(anyhow::anyhow!("{err}"))
                }
            };
            nodes.push(NodeReport {
                id: node.id.clone(),
                status,
            });
        }
        Ok(BuildReport { nodes })
    }

    fn selection(&self, targets: &TargetSelection) -> Result<Selection, RecipeError> {
        Ok(match targets {
            TargetSelection::Default => {
                let public = self.pipeline.public_node_ids();
                if public.is_empty() {
                    Selection::All
                } else {
                    Selection::Targets(public)
                }
            }
            TargetSelection::Named(ids) => Selection::Targets(ids.clone()),
            TargetSelection::Tagged(tags) => {
                let tagged = self.pipeline.tagged_node_ids(tags);
                if tagged.is_empty() {
                    return Err(RecipeError::UnmatchedTags(tags.clone()));
                }
                Selection::Targets(tagged)
            }
        })
    }
}
