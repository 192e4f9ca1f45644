//! Loading and validation of recipes: the declared nodes of a build, and the tools they use.


use std::path::{Component, Path, PathBuf};

use generic_pipeline::node::Tag;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{Node, NodeId, Pipeline, tools::ToolsConfig};

const BUILTIN: &str = include_str!("../../recipes/esp8266.yaml");

#[derive(Debug, thiserror::Error)]
pub enum RecipeError {
    #[error("parsing recipe: {0}")]
    Parse(#[from] serde_yaml_ng::Error),
    #[error("reading recipe {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("node IDs declared more than once: {}", join(.0))]
    DuplicateIds(Vec<NodeId>),
    #[error("nodes {first} and {second} both write to {path:?}")]
    DuplicateOutput {
        path: PathBuf,
        first: NodeId,
        second: NodeId,
    },
    #[error("no node with ID {0}")]
    UnknownTarget(NodeId),
    #[error("no nodes are tagged with any of: {}", join(.0))]
    UnmatchedTags(Vec<Tag>),
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A complete build description.
#[derive(Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
    #[serde(default)]
    pub tools: ToolsConfig,
    pub nodes: Vec<Node>,
}

impl Recipe {
    /// Parses and validates a recipe from YAML.
    pub fn load(yaml: &str) -> Result<Self, RecipeError> {
        let recipe: Self = serde_yaml_ng::from_str(yaml)?;
        recipe.validate()?;
        Ok(recipe)
    }

    pub fn load_path(path: &Path) -> Result<Self, RecipeError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| RecipeError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::load(&yaml)
    }

    /// The recipe built into the program.
    pub fn builtin() -> Result<Self, RecipeError> {
        Self::load(BUILTIN)
    }

    /// Checks for repeated IDs, and for files that more than one node would provide.
    pub fn validate(&self) -> Result<(), RecipeError> {
        let duplicates = Pipeline::duplicate_ids(&self.nodes);
        if !duplicates.is_empty() {
            return Err(RecipeError::DuplicateIds(duplicates));
        }

        let mut path_to_id: HashMap<PathBuf, &NodeId> = HashMap::new();
        for node in &self.nodes {
            let path = normalise(node.spec.artifact_path());
            if let Some(first) = path_to_id.insert(path.clone(), &node.id) {
                return Err(RecipeError::DuplicateOutput {
                    path,
                    first: first.clone(),
                    second: node.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Consumes the recipe into its tools configuration and executable pipeline.
    pub fn into_parts(self) -> (ToolsConfig, Pipeline) {
        (self.tools, Pipeline::new(self.nodes))
    }
}

fn normalise(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}
