//! Systems that build the artifact of each type of [crate::Node].

mod fetch;
mod page_slice;
mod source_file;
mod table_extract;

use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::{Context, Result, bail};

use crate::{
    Node, NodeId, NodeResult,
    build::BuildError,
    fetch::Fetcher,
    freshness::{self, Freshness, StaleReason},
    intermediates::{Artifact, ArtifactState},
    jobs,
    spec_types::OutputPathBuf,
    specs::SpecDiscriminants,
    tools::{Invocation, ToolRunner, ToolsConfig},
};
pub use fetch::FetchSystem;
pub use page_slice::PageSliceSystem;
pub use source_file::SourceFileSystem;
pub use table_extract::TableExtractSystem;

/// Registers the nodes that `node` is built from as its inputs.
fn register_prerequisites(
    node: &Node,
    reg: &mut generic_pipeline::plinputs::NodeInputsRegistrator<'_>,
) {
    for dependency in node.spec.prerequisites() {
        reg.add_input(dependency);
    }
}

/// Everything the systems share about the build being run.
pub struct BuildEnv {
    /// Directory that relative paths are resolved against.
    pub root: PathBuf,
    /// Report what would be built rather than building it.
    pub dry_run: bool,
    /// Maximum number of external commands to run at once.
    pub jobs: NonZeroUsize,
    pub tools: ToolsConfig,
    pub runner: Box<dyn ToolRunner>,
    pub fetcher: Box<dyn Fetcher>,
}

/// What producing an artifact involves.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Action {
    Run(Invocation),
    Fetch { url: String },
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Run(invocation) => invocation.fmt(f),
            Action::Fetch { url } => write!(f, "GET {url}"),
        }
    }
}

/// Outcome of checking a node against its prerequisites.
enum Plan {
    Ready(Artifact),
    Stale {
        path: PathBuf,
        reason: StaleReason,
        action: Action,
    },
}

/// A stale node waiting for its action to run.
struct Pending {
    index: usize,
    node_id: NodeId,
    path: PathBuf,
    reason: StaleReason,
    action: Action,
}

impl BuildEnv {
    /// Resolves a recipe path against the build directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    fn plan<F>(
        &self,
        output: &OutputPathBuf,
        prerequisites: &[(&NodeId, &Artifact)],
        action: F,
    ) -> Result<Plan>
    where
        F: FnOnce(&Path) -> Action,
    {
        let path = output.under(&self.root);
        Ok(match freshness::check(&path, prerequisites)? {
            Freshness::UpToDate => Plan::Ready(Artifact::present(path)),
            Freshness::Stale(reason) => {
                let action = action(&path);
                Plan::Stale {
                    path,
                    reason,
                    action,
                }
            }
        })
    }

    /// Plans every node with `plan`, then runs the actions of the stale ones, up to
    /// [BuildEnv::jobs] at a time. Results are in the same order as `nodes`.
    fn process_planned<F>(&self, nodes: &[&Node], mut plan: F) -> Vec<NodeResult>
    where
        F: FnMut(&Node) -> Result<Plan>,
    {
        let mut results: Vec<Option<NodeResult>> = Vec::with_capacity(nodes.len());
        let mut pending: Vec<Pending> = Vec::new();
        for (index, node) in nodes.iter().enumerate() {
            match plan(node) {
                Ok(Plan::Ready(artifact)) => {
                    log::info!("{} is up to date.", node.id);
                    results.push(Some(NodeResult {
                        id: node.id.clone(),
                        value: Ok(artifact),
                    }));
                }
                Ok(Plan::Stale {
                    path,
                    reason,
                    action,
                }) => {
                    results.push(None);
                    pending.push(Pending {
                        index,
                        node_id: node.id.clone(),
                        path,
                        reason,
                        action,
                    });
                }
                Err(err) => results.push(Some(NodeResult {
                    id: node.id.clone(),
                    value: Err(err),
                })),
            }
        }

        let executed = jobs::map_parallel(&pending, self.jobs, |pending| self.execute(pending));
        for (pending, value) in pending.into_iter().zip(executed) {
            results[pending.index] = Some(NodeResult {
                id: pending.node_id,
                value,
            });
        }

        results.into_iter().flatten().collect()
    }

    /// Processes a single node through [BuildEnv::process_planned].
    fn process_one<F>(&self, node: &Node, plan: F) -> Result<Artifact>
    where
        F: FnMut(&Node) -> Result<Plan>,
    {
        let mut results = self.process_planned(&[node], plan);
        match (results.pop(), results.is_empty()) {
            (Some(result), true) if result.id == node.id => result.value,
            _ => bail!("bug: expected exactly one result for node {}", node.id),
        }
    }

    fn execute(&self, pending: &Pending) -> Result<Artifact> {
        let Pending {
            node_id,
            path,
            reason,
            action,
            ..
        } = pending;

        if self.dry_run {
            log::info!("Would build {node_id} ({reason}): {action}");
            return Ok(Artifact {
                path: path.clone(),
                state: ArtifactState::Planned {
                    reason: reason.clone(),
                    action: action.to_string(),
                },
            });
        }

        log::info!("Building {node_id} ({reason}).");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {parent:?} for {node_id}"))?;
        }
        match action {
            Action::Run(invocation) => {
                log::debug!("{node_id}: {invocation}");
                self.runner
                    .run(invocation)
                    .with_context(|| format!("building {node_id}"))?;
            }
            Action::Fetch { url } => {
                self.fetcher
                    .fetch(url, path)
                    .with_context(|| format!("fetching {node_id}"))?;
            }
        }

        if !path.try_exists().with_context(|| format!("checking {path:?}"))? {
            return Err(BuildError::OutputNotProduced {
                node_id: node_id.clone(),
                path: path.clone(),
            }
            .into());
        }

        Ok(Artifact {
            path: path.clone(),
            state: ArtifactState::Built {
                reason: reason.clone(),
            },
        })
    }
}

/// Creates the [crate::MetaSystem] that builds every type of node within `env`.
pub fn new_meta_system(env: Rc<BuildEnv>) -> crate::MetaSystem {
    let mut systems: hashbrown::HashMap<
        SpecDiscriminants,
        Rc<dyn generic_pipeline::systems::GenericSystem<crate::PipelineTypes>>,
    > = hashbrown::HashMap::new();
    systems.insert(
        SpecDiscriminants::SourceFile,
        Rc::new(SourceFileSystem::new(env.clone())),
    );
    systems.insert(
        SpecDiscriminants::Fetch,
        Rc::new(FetchSystem::new(env.clone())),
    );
    systems.insert(
        SpecDiscriminants::PageSlice,
        Rc::new(PageSliceSystem::new(env.clone())),
    );
    systems.insert(
        SpecDiscriminants::TableExtract,
        Rc::new(TableExtractSystem::new(env)),
    );

    crate::MetaSystem::new(
        systems,
        Box::new(|discrim| anyhow::anyhow!("no system builds nodes of type {discrim}")),
    )
}
