use super::PathExpression;
use crate::error::{ConfigError, ResolveError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::warn;

const INPUTS_KEY: &str = "inputs";
const META_KEY: &str = "_meta";
const TITLE_KEY: &str = "title";
const PROMPT_TEXT_KEY: &str = "text";

/// How a path's title is compared against node titles. Both sides are trimmed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleMatch {
    Exact,
    IgnoreCase,
}

impl TitleMatch {
    fn matches(self, wanted: &str, candidate: &str) -> bool {
        let (wanted, candidate) = (wanted.trim(), candidate.trim());
        match self {
            TitleMatch::Exact => wanted == candidate,
            TitleMatch::IgnoreCase => wanted.to_lowercase() == candidate.to_lowercase(),
        }
    }
}

/// A resolved, writable location inside the graph.
///
/// `keys` is relative to the node record and always starts with `inputs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub node_id: String,
    pub title: String,
    pub keys: Vec<String>,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}].{}", self.title, self.node_id, self.keys.join("."))
    }
}

/// A workflow in API format: node id -> `{ inputs: {...}, _meta: { title } }`.
///
/// Key order of the loaded document is preserved so untouched fields are
/// serialized back exactly as they were read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowGraph {
    nodes: Map<String, Value>,
}

impl WorkflowGraph {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ConfigError::WorkflowParse(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(nodes) => Ok(Self { nodes }),
            _ => Err(ConfigError::WorkflowNotAnObject),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            kind: "workflow",
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn nodes(&self) -> &Map<String, Value> {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Title of a node record, if it carries `_meta.title`.
    pub fn node_title(node: &Value) -> Option<&str> {
        node.get(META_KEY)?.get(TITLE_KEY)?.as_str()
    }

    /// Ids of all nodes whose title matches, in document order.
    pub fn find_nodes_by_title(&self, title: &str, mode: TitleMatch) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|(_, node)| Self::node_title(node).is_some_and(|t| mode.matches(title, t)))
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Resolves a path against the graph.
    ///
    /// The first node in document order whose title matches wins. Every key
    /// except the terminal one must already exist and be a mapping.
    pub fn resolve(
        &self,
        path: &PathExpression,
        mode: TitleMatch,
    ) -> Result<Location, ResolveError> {
        if !path.has_keys() {
            return Err(ResolveError::EmptyKeyChain(path.to_string()));
        }
        self.resolve_keys(path, mode, &path.keys)
    }

    /// Resolves the prompt binding, where a bare title addresses `inputs.text`.
    pub fn resolve_prompt(
        &self,
        path: &PathExpression,
        mode: TitleMatch,
    ) -> Result<Location, ResolveError> {
        if path.has_keys() {
            self.resolve_keys(path, mode, &path.keys)
        } else {
            self.resolve_keys(path, mode, &[PROMPT_TEXT_KEY.to_string()])
        }
    }

    fn resolve_keys(
        &self,
        path: &PathExpression,
        mode: TitleMatch,
        keys: &[String],
    ) -> Result<Location, ResolveError> {
        let matches = self.find_nodes_by_title(&path.title, mode);
        let node_id = *matches.first().ok_or_else(|| ResolveError::NodeNotFound {
            title: path.title.clone(),
        })?;
        if matches.len() > 1 {
            warn!(
                "Title '{}' is shared by {} nodes; using the first one ({})",
                path.title,
                matches.len(),
                node_id
            );
        }

        let mut full_keys = Vec::with_capacity(keys.len() + 1);
        full_keys.push(INPUTS_KEY.to_string());
        full_keys.extend(keys.iter().cloned());

        let (_, intermediate) = full_keys
            .split_last()
            .ok_or_else(|| ResolveError::EmptyKeyChain(path.to_string()))?;

        let mut current = &self.nodes[node_id];
        for key in intermediate {
            let map = current.as_object().ok_or_else(|| ResolveError::NotAMapping {
                title: path.title.clone(),
                key: key.clone(),
            })?;
            current = map.get(key).ok_or_else(|| ResolveError::MissingKey {
                title: path.title.clone(),
                key: key.clone(),
            })?;
        }
        if !current.is_object() {
            return Err(ResolveError::NotAMapping {
                title: path.title.clone(),
                key: intermediate.last().cloned().unwrap_or_default(),
            });
        }

        Ok(Location {
            node_id: node_id.to_string(),
            title: path.title.clone(),
            keys: full_keys,
        })
    }

    /// Reads the value currently stored at a location.
    pub fn get(&self, location: &Location) -> Option<&Value> {
        let mut current = self.nodes.get(&location.node_id)?;
        for key in &location.keys {
            current = current.get(key)?;
        }
        Some(current)
    }

    /// Writes `value` at a location, creating missing keys one level at a time.
    ///
    /// Returns `false` when the node is gone or a non-mapping value sits on the
    /// way to the terminal key.
    pub fn set_nested_value(&mut self, location: &Location, value: Value) -> bool {
        let Some((last, intermediate)) = location.keys.split_last() else {
            return false;
        };
        let Some(mut current) = self.nodes.get_mut(&location.node_id) else {
            return false;
        };
        for key in intermediate {
            let Some(map) = current.as_object_mut() else {
                return false;
            };
            current = map
                .entry(key.clone())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        match current.as_object_mut() {
            Some(map) => {
                map.insert(last.clone(), value);
                true
            }
            None => false,
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.nodes.clone())
    }
}
