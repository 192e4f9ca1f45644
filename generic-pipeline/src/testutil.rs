use std::cell::RefCell;

use hashbrown::HashSet;
use mockall::mock;
use serde::{Deserialize, Serialize};

use crate::{
    intermediates,
    node::{self, NodeId},
    pipeline, plinputs, processing, systems,
};

pub fn node_id(s: &str) -> node::NodeId {
    NodeId::test_node_id(s)
}

pub fn tag(s: &str) -> node::Tag {
    node::Tag::test_tag(s)
}

/// Per-type wrapper of a specific type of fake node.
#[derive(
    Debug, Deserialize, Eq, PartialEq, Serialize, strum_macros::EnumDiscriminants,
)]
#[strum_discriminants(derive(Hash, PartialOrd, Ord))]
#[serde(tag = "type", content = "spec")]
pub enum FakeSpec {
    /// Produces its value, depending on nothing.
    Value(ValueSpec),
    /// Joins the values of its dependencies with commas.
    Concat(ConcatSpec),
    /// Fails at the given stage.
    Error(ErrorSpec),
}

impl node::SpecTrait for FakeSpec {
    type Discrim = FakeSpecDiscriminants;

    fn discriminant(&self) -> Self::Discrim {
        self.into()
    }
}

impl From<ValueSpec> for FakeSpec {
    fn from(value: ValueSpec) -> Self {
        Self::Value(value)
    }
}

impl From<ConcatSpec> for FakeSpec {
    fn from(value: ConcatSpec) -> Self {
        Self::Concat(value)
    }
}

impl From<ErrorSpec> for FakeSpec {
    fn from(value: ErrorSpec) -> Self {
        Self::Error(value)
    }
}

#[derive(Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ValueSpec {
    pub value: String,
}

impl Default for ValueSpec {
    fn default() -> Self {
        Self {
            value: "value".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ConcatSpec {
    #[serde(default)]
    pub deps: Vec<node::NodeId>,
}

#[derive(Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ErrorSpec {
    pub when: ErrorWhen,
    #[serde(default)]
    pub deps: Vec<node::NodeId>,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorWhen {
    Inputs,
    Preflight,
    Process,
}

pub type FakeNode = node::GenericNode<FakeSpec>;

impl Default for FakeNode {
    fn default() -> Self {
        Self {
            id: node_id("default-node-id"),
            tags: Default::default(),
            public: Default::default(),
            spec: ValueSpec::default().into(),
        }
    }
}

pub fn value_node(id: &str, value: &str) -> FakeNode {
    FakeNode {
        id: node_id(id),
        spec: ValueSpec {
            value: value.into(),
        }
        .into(),
        ..Default::default()
    }
}

pub fn concat_node(id: &str, deps: &[&str]) -> FakeNode {
    FakeNode {
        id: node_id(id),
        spec: ConcatSpec {
            deps: deps.iter().map(|s| node_id(s)).collect(),
        }
        .into(),
        ..Default::default()
    }
}

pub fn error_node(id: &str, when: ErrorWhen, deps: &[&str]) -> FakeNode {
    FakeNode {
        id: node_id(id),
        spec: ErrorSpec {
            when,
            deps: deps.iter().map(|s| node_id(s)).collect(),
        }
        .into(),
        ..Default::default()
    }
}

#[derive(Debug, Eq, PartialEq)]
pub struct TestIntermediateValue(pub String);

pub type TestIntermediateSet = intermediates::GenericIntermediateSet<TestIntermediateValue>;

pub type TestPipeline = pipeline::GenericPipeline<FakeSpec>;

pub struct TestPipelineTypes;

impl crate::PipelineTypes for TestPipelineTypes {
    type Spec = FakeSpec;

    type IntermediateValue = TestIntermediateValue;

    type SystemError = TestSystemError;
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum TestSystemError {
    #[error("system error")]
    System,
    #[error("no system for {0:?}")]
    MissingSystem(FakeSpecDiscriminants),
    #[error(transparent)]
    Intermediate(#[from] intermediates::IntermediateError),
}

pub type TestProcessor = processing::GenericProcessor<TestPipelineTypes>;

/// Fake system that handles every [FakeSpec] type, recording what it was asked to process.
#[derive(Default)]
pub struct FakeSystem {
    pub preflighted: RefCell<Vec<node::NodeId>>,
    pub process_sets: RefCell<Vec<HashSet<node::NodeId>>>,
}

impl FakeSystem {
    fn do_process(
        &self,
        node: &FakeNode,
        intermediates: &TestIntermediateSet,
    ) -> Result<TestIntermediateValue, TestSystemError> {
        match &node.spec {
            FakeSpec::Value(value_spec) => Ok(TestIntermediateValue(value_spec.value.clone())),
            FakeSpec::Concat(concat_spec) => {
                let parts = concat_spec
                    .deps
                    .iter()
                    .map(|dep| intermediates.require(dep).map(|value| value.0.as_str()))
                    .collect::<Result<Vec<&str>, _>>()?;
                Ok(TestIntermediateValue(parts.join(",")))
            }
            FakeSpec::Error(_) => Err(TestSystemError::System),
        }
    }
}

impl systems::GenericSystem<TestPipelineTypes> for FakeSystem {
    fn inputs<'a>(
        &self,
        node: &FakeNode,
        reg: &'a mut plinputs::NodeInputsRegistrator<'a>,
    ) -> Result<(), TestSystemError> {
        match &node.spec {
            FakeSpec::Value(_) => {}
            FakeSpec::Concat(concat_spec) => {
                for dep in &concat_spec.deps {
                    reg.add_input(dep);
                }
            }
            FakeSpec::Error(error_spec) => {
                if error_spec.when == ErrorWhen::Inputs {
                    return Err(TestSystemError::System);
                }
                for dep in &error_spec.deps {
                    reg.add_input(dep);
                }
            }
        }
        Ok(())
    }

    fn preflight(&self, node: &FakeNode) -> Result<(), TestSystemError> {
        self.preflighted.borrow_mut().push(node.id.clone());
        match &node.spec {
            FakeSpec::Error(ErrorSpec {
                when: ErrorWhen::Preflight,
                ..
            }) => Err(TestSystemError::System),
            _ => Ok(()),
        }
    }

    fn process(
        &self,
        node: &FakeNode,
        intermediates: &TestIntermediateSet,
    ) -> Result<TestIntermediateValue, TestSystemError> {
        let mut process_set = HashSet::new();
        process_set.insert(node.id.clone());
        self.process_sets.borrow_mut().push(process_set);
        self.do_process(node, intermediates)
    }

    fn process_multiple<'a>(
        &self,
        nodes: &'a [&'a FakeNode],
        intermediates: &TestIntermediateSet,
    ) -> Vec<systems::NodeResult<TestPipelineTypes>> {
        self.process_sets
            .borrow_mut()
            .push(nodes.iter().map(|node| node.id.clone()).collect());

        nodes
            .iter()
            .map(|node| systems::NodeResult {
                id: node.id.clone(),
                value: self.do_process(node, intermediates),
            })
            .collect()
    }
}

mock! {
    pub System {}

    impl systems::GenericSystem<TestPipelineTypes> for System {
        fn inputs<'a>(
            &self,
            node: &FakeNode,
            reg: &'a mut plinputs::NodeInputsRegistrator<'a>,
        ) -> Result<(), TestSystemError>;

        fn preflight(&self, node: &FakeNode) -> Result<(), TestSystemError>;

        fn process(
            &self,
            node: &FakeNode,
            intermediates: &TestIntermediateSet,
        ) -> Result<TestIntermediateValue, TestSystemError>;

        fn process_multiple<'a>(
            &self,
            nodes: &'a [&'a FakeNode],
            intermediates: &TestIntermediateSet,
        ) -> Vec<systems::NodeResult<TestPipelineTypes>>;
    }
}
