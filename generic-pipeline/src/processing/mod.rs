//! Processing of a [pipeline::GenericPipeline].


use std::rc::Rc;

use hashbrown::{HashMap, HashSet};

use crate::{intermediates, node, pipeline, plinputs, systems};

/// Describes the outcome of an entire processing attempt.
#[derive(Debug)]
pub struct PipelineOutcome<V, E> {
    /// Result for every node that was selected for processing.
    pub node_results: HashMap<node::NodeId, Result<(), NodeError<E>>>,
    /// Intermediate values of the nodes that processed successfully.
    pub intermediates: intermediates::GenericIntermediateSet<V>,
}

impl<V, E> PipelineOutcome<V, E> {
    /// Returns true if every selected node processed successfully.
    pub fn is_success(&self) -> bool {
        self.node_results.values().all(Result::is_ok)
    }
}

/// Describes why a single node did not process successfully.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum NodeError<E> {
    /// Node processed, but unexpectedly. Dependent nodes not processed.
    #[error("node was processed unexpectedly")]
    Unexpected,
    /// Attempted to process the node, but resulted in an error.
    #[error("node failed: {0}")]
    ProcessErrored(E),
    /// No attempt was made to process the node.
    #[error("node was not processed: {0}")]
    Unprocessed(NodeUnprocessedReason),
    /// The node could have been processed, but processing stopped after an earlier failure.
    #[error("node was not processed, as processing halted after an earlier failure")]
    Halted,
    /// Processing encountered an internal error, likely a bug.
    #[error("internal error: {0}")]
    InternalError(String),
}

/// Describes the reasons for a single [node::GenericNode] being unprocessed.
#[derive(Debug, PartialEq)]
pub struct NodeUnprocessedReason {
    pub unprocessed_dependencies: HashMap<node::NodeId, UnprocessedDependencyReason>,
}

impl std::fmt::Display for NodeUnprocessedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut deps: Vec<_> = self.unprocessed_dependencies.iter().collect();
        deps.sort_by(|a, b| a.0.cmp(b.0));
        f.write_str("prerequisite(s) ")?;
        for (i, (dep_id, reason)) in deps.into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match reason {
                UnprocessedDependencyReason::Unprocessed => write!(f, "{dep_id} (not built)")?,
                UnprocessedDependencyReason::Unknown => write!(f, "{dep_id} (unknown)")?,
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UnprocessedDependencyReason {
    /// Could not process the node due to failing to process nodes that it depends on. This could
    /// be because a dependency errored during processing, or that there was a dependency cycle.
    Unprocessed,
    /// Dependency was unknown.
    Unknown,
}

/// Which nodes of a pipeline to process.
#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    /// Every node in the pipeline.
    All,
    /// The given nodes and, transitively, every node they depend upon.
    Targets(Vec<node::NodeId>),
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SelectionError {
    #[error("no node with ID {0:?} to build")]
    UnknownTarget(node::NodeId),
}

/// Options controlling a [GenericProcessor].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProcessOptions {
    /// Continue processing nodes that do not depend on a failed node, rather than halting after
    /// the first phase containing a failure.
    pub keep_going: bool,
}

/// Processes a [pipeline::GenericPipeline] using the [crate::systems::GenericSystem] that it was
/// given to process the nodes within.
pub struct GenericProcessor<P>
where
    P: crate::PipelineTypes,
{
    system: Rc<dyn systems::GenericSystem<P>>,
    options: ProcessOptions,
}

impl<P> GenericProcessor<P>
where
    P: crate::PipelineTypes,
{
    pub fn new(system: Rc<dyn systems::GenericSystem<P>>) -> Self {
        Self::with_options(system, ProcessOptions::default())
    }

    pub fn with_options(system: Rc<dyn systems::GenericSystem<P>>, options: ProcessOptions) -> Self {
        Self { system, options }
    }

    /// Processes the selected nodes, prerequisites before dependents.
    pub fn process(
        &self,
        nodes: &pipeline::GenericPipeline<P::Spec>,
        selection: &Selection,
    ) -> Result<PipelineOutcome<P::IntermediateValue, P::SystemError>, SelectionError> {
        let state = GenericProcessingState::new(nodes, selection, self.system.clone(), self.options)?;
        Ok(state.process())
    }
}

struct GenericProcessingState<'a, P>
where
    P: crate::PipelineTypes,
{
    nodes: &'a pipeline::GenericPipeline<P::Spec>,

    system: Rc<dyn systems::GenericSystem<P>>,
    options: ProcessOptions,

    // Map from NodeId to the NodeIds that depend on it.
    dep_id_to_dependee_ids: HashMap<node::NodeId, Vec<node::NodeId>>,

    outcome: PipelineOutcome<P::IntermediateValue, P::SystemError>,
    processable_ids: HashSet<node::NodeId>,
    // Map from NodeId to the NodeIds that it depends on. This is dynamically updated to remove
    // dependent NodeIds that have been successfully processed (when the value is empty, the
    // key can be scheduled for processing).
    unprocessed_id_to_dep_ids: HashMap<node::NodeId, HashSet<node::NodeId>>,
    halted: bool,
}

impl<'a, P> GenericProcessingState<'a, P>
where
    P: crate::PipelineTypes,
{
    fn new(
        nodes: &'a pipeline::GenericPipeline<P::Spec>,
        selection: &Selection,
        system: Rc<dyn systems::GenericSystem<P>>,
        options: ProcessOptions,
    ) -> Result<Self, SelectionError> {
        let mut node_results = HashMap::new();

        let mut reg = plinputs::InputsRegistrator::new();
        for node in nodes.nodes() {
            if let Err(err) = system.inputs(node, &mut reg.for_node(&node.id)) {
                node_results.insert(node.id.clone(), Err(NodeError::ProcessErrored(err)));
            }
        }
        let all_deps = reg.build();

        let selected = Self::select(nodes, &all_deps, selection)?;
        log::debug!(
            "Processing {} of {} nodes total.",
            selected.len(),
            nodes.len()
        );
        node_results.retain(|node_id, _| selected.contains(node_id));

        let mut processable_ids: HashSet<node::NodeId> = HashSet::new();
        let mut dep_id_to_dependee_ids: HashMap<node::NodeId, Vec<node::NodeId>> = HashMap::new();
        let mut unprocessed_id_to_dep_ids: HashMap<node::NodeId, HashSet<node::NodeId>> =
            HashMap::new();
        for node in nodes.nodes() {
            if !selected.contains(&node.id) || node_results.contains_key(&node.id) {
                continue;
            }
            match all_deps.get(&node.id) {
                None => {
                    processable_ids.insert(node.id.clone());
                }
                Some(deps) => {
                    for dep_id in deps {
                        dep_id_to_dependee_ids
                            .entry(dep_id.clone())
                            .or_default()
                            .push(node.id.clone());
                    }
                    unprocessed_id_to_dep_ids
                        .insert(node.id.clone(), deps.iter().cloned().collect());
                }
            }
        }

        Ok(Self {
            nodes,

            system,
            options,

            dep_id_to_dependee_ids,

            outcome: PipelineOutcome {
                node_results,
                intermediates: intermediates::GenericIntermediateSet::new(),
            },
            processable_ids,
            unprocessed_id_to_dep_ids,
            halted: false,
        })
    }

    /// Returns the IDs of the selected nodes and everything they transitively depend upon.
    fn select(
        nodes: &pipeline::GenericPipeline<P::Spec>,
        all_deps: &HashMap<node::NodeId, Vec<node::NodeId>>,
        selection: &Selection,
    ) -> Result<HashSet<node::NodeId>, SelectionError> {
        let targets = match selection {
            Selection::All => return Ok(nodes.nodes().map(|node| node.id.clone()).collect()),
            Selection::Targets(targets) => targets,
        };

        let mut selected = HashSet::new();
        let mut to_visit: Vec<node::NodeId> = Vec::with_capacity(targets.len());
        for target in targets {
            if nodes.get(target).is_none() {
                return Err(SelectionError::UnknownTarget(target.clone()));
            }
            to_visit.push(target.clone());
        }

        while let Some(node_id) = to_visit.pop() {
            if nodes.get(&node_id).is_none() || !selected.insert(node_id.clone()) {
                continue;
            }
            if let Some(deps) = all_deps.get(&node_id) {
                to_visit.extend(deps.iter().cloned());
            }
        }

        Ok(selected)
    }

    fn process(mut self) -> PipelineOutcome<P::IntermediateValue, P::SystemError> {
        self.preflight();

        while !self.halted && !self.processable_ids.is_empty() {
            log::debug!(
                "Processing {} nodes in this pass.",
                self.processable_ids.len()
            );

            let phase_nodes: Vec<_> = self.gather_phase_nodes();

            if phase_nodes.is_empty() {
                log::error!(
                    "Found no further processable nodes, but {} unprocessed node(s) remain. Earlier processes may have failed.",
                    self.unprocessed_id_to_dep_ids.len()
                );
                break;
            }

            let node_results = self
                .system
                .process_multiple(&phase_nodes, &self.outcome.intermediates);

            let mut newly_processable_ids = HashSet::new();
            let mut phase_failed = false;
            for node_result in node_results {
                let processed_node_id = node_result.id;
                if !self.processable_ids.remove(&processed_node_id) {
                    log::error!(
                        "Node {processed_node_id:?} was processed, despite not being requested to process. Faulty system?",
                    );
                    self.outcome
                        .node_results
                        .insert(processed_node_id, Err(NodeError::Unexpected));
                    phase_failed = true;
                    continue;
                }

                phase_failed |= !self.process_result(
                    node_result.value,
                    processed_node_id,
                    &mut newly_processable_ids,
                );
            }

            for node_id in self.processable_ids.drain() {
                let err = format!(
                    "Node {node_id:?} was not processed, despite being requested to process. Faulty system?",
                );
                log::error!("{err}");
                self.outcome
                    .node_results
                    .insert(node_id, Err(NodeError::InternalError(err)));
                phase_failed = true;
            }

            self.processable_ids.extend(newly_processable_ids.drain());

            if phase_failed && !self.options.keep_going {
                log::warn!("Halting processing after failure.");
                self.halted = true;
            }
        }

        self.report_remaining();

        self.outcome
    }

    /// Runs preflight checks on every node that is going to be processed. Failing nodes are
    /// removed from processing, and processing halts entirely unless
    /// [ProcessOptions::keep_going] is set.
    fn preflight(&mut self) {
        let mut failed = false;
        let candidate_ids: Vec<node::NodeId> = self
            .nodes
            .nodes()
            .filter(|node| {
                self.processable_ids.contains(&node.id)
                    || self.unprocessed_id_to_dep_ids.contains_key(&node.id)
            })
            .map(|node| node.id.clone())
            .collect();

        for node_id in candidate_ids {
            let Some(node) = self.nodes.get(&node_id) else {
                continue;
            };
            if let Err(err) = self.system.preflight(node) {
                log::error!("Preflight check failed for node {node_id:?}.");
                self.processable_ids.remove(&node_id);
                self.unprocessed_id_to_dep_ids.remove(&node_id);
                self.outcome
                    .node_results
                    .insert(node_id, Err(NodeError::ProcessErrored(err)));
                failed = true;
            }
        }

        if failed && !self.options.keep_going {
            log::warn!("Halting processing before any node was processed.");
            self.halted = true;
        }
    }

    /// Records an outcome for every selected node that has not yet got one.
    fn report_remaining(&mut self) {
        for node_id in self.processable_ids.drain() {
            self.outcome
                .node_results
                .insert(node_id, Err(NodeError::Halted));
        }

        let blocked_ids = self.blocked_ids();

        for (unprocessed_id, mut dep_ids) in self.unprocessed_id_to_dep_ids.drain() {
            let unprocessed_dependencies: HashMap<_, _> = dep_ids
                .drain()
                .map(|dep_id| {
                    let reason = if self.nodes.get(&dep_id).is_some() {
                        UnprocessedDependencyReason::Unprocessed
                    } else {
                        UnprocessedDependencyReason::Unknown
                    };
                    (dep_id, reason)
                })
                .collect();

            let error = if self.halted && !blocked_ids.contains(&unprocessed_id) {
                NodeError::Halted
            } else {
                log::error!("Node {unprocessed_id:?} was not processed.");
                NodeError::Unprocessed(NodeUnprocessedReason {
                    unprocessed_dependencies,
                })
            };
            self.outcome
                .node_results
                .insert(unprocessed_id, Err(error));
        }
    }

    /// Returns the IDs of still-unprocessed nodes that can never be processed because something
    /// they (transitively) depend on failed or is unknown.
    fn blocked_ids(&self) -> HashSet<node::NodeId> {
        let mut blocked: HashSet<node::NodeId> = self
            .outcome
            .node_results
            .iter()
            .filter(|(_, result)| matches!(result, Err(err) if !matches!(err, NodeError::Halted)))
            .map(|(node_id, _)| node_id.clone())
            .collect();

        loop {
            let newly_blocked: Vec<node::NodeId> = self
                .unprocessed_id_to_dep_ids
                .iter()
                .filter(|(node_id, dep_ids)| {
                    !blocked.contains(*node_id)
                        && dep_ids
                            .iter()
                            .any(|dep_id| self.nodes.get(dep_id).is_none() || blocked.contains(dep_id))
                })
                .map(|(node_id, _)| node_id.clone())
                .collect();
            if newly_blocked.is_empty() {
                return blocked;
            }
            blocked.extend(newly_blocked);
        }
    }

    fn gather_phase_nodes(&self) -> Vec<&'a node::GenericNode<P::Spec>> {
        // Declaration order keeps batches deterministic.
        self.nodes
            .nodes()
            .filter(|node| self.processable_ids.contains(&node.id))
            .collect()
    }

    /// Records the result of processing a node. Returns true on success.
    fn process_result(
        &mut self,
        interm_result: Result<P::IntermediateValue, P::SystemError>,
        processed_node_id: node::NodeId,
        newly_processable_ids: &mut HashSet<node::NodeId>,
    ) -> bool {
        match interm_result {
            Ok(interm) => {
                log::info!("Node {processed_node_id:?} processed successfully.");

                self.mark_dependent_nodes_processable(&processed_node_id, newly_processable_ids);

                self.outcome
                    .node_results
                    .insert(processed_node_id.clone(), Ok(()));
                self.outcome.intermediates.set(processed_node_id, interm);
                true
            }
            Err(err) => {
                log::error!("Error processing node {processed_node_id:?}.");
                self.outcome.node_results.insert(
                    processed_node_id.clone(),
                    Err(NodeError::ProcessErrored(err)),
                );
                false
            }
        }
    }

    /// Updates unprocessed_id_to_dep_ids and finds newly processable nodes in the process.
    fn mark_dependent_nodes_processable(
        &mut self,
        processed_node_id: &node::NodeId,
        newly_processable_ids: &mut HashSet<node::NodeId>,
    ) {
        let dependee_ids = match self.dep_id_to_dependee_ids.get(processed_node_id) {
            Some(dependee_ids) => dependee_ids,
            None => return,
        };

        for dependee_id in dependee_ids {
            let Some(dep_ids) = self.unprocessed_id_to_dep_ids.get_mut(dependee_id) else {
                // Withdrawn from processing by a failed preflight check.
                log::debug!(
                    "Node {dependee_id:?} was withdrawn before {processed_node_id:?} processed."
                );
                continue;
            };
            if !dep_ids.remove(processed_node_id) {
                let err = format!(
                    "Could not remove node {processed_node_id:?} from node {dependee_id:?}'s unprocessed dependencies. Bug in processor?"
                );
                log::error!("{err}");
                self.outcome
                    .node_results
                    .insert(dependee_id.clone(), Err(NodeError::InternalError(err)));
            }
            if dep_ids.is_empty() {
                self.unprocessed_id_to_dep_ids.remove(dependee_id);
                log::debug!("Newly processable node {dependee_id:?}.");
                newly_processable_ids.insert(dependee_id.clone());
            }
        }
    }
}
