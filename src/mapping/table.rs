use crate::error::ConfigError;
use crate::prompt::strip_comment;
use ahash::AHashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// The reserved argument name that binds the prompt text.
pub const PROMPT_KEY: &str = "prompt";

/// Multi-valued table of `argument name -> [path expression, ...]`.
///
/// Keys are lower-cased. Both key order and the order of paths under a key
/// follow the mapping file.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: Vec<(String, Vec<String>)>,
    index: AHashMap<String, usize>,
}

impl MappingTable {
    /// Parses mapping file content of the form `name == path[, path...]`.
    ///
    /// Repeated keys append to the existing path list. Lines without `==` are
    /// skipped with a warning. A table without a `prompt` entry is rejected.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut table = Self::default();

        for (line_no, raw) in content.lines().enumerate() {
            let Some(line) = strip_comment(raw) else {
                continue;
            };
            let Some((key, values)) = line.split_once("==") else {
                warn!(line = line_no + 1, "Ignoring mapping line without '==': {}", line);
                continue;
            };

            let key = key.trim().to_lowercase();
            if key.is_empty() {
                warn!(line = line_no + 1, "Ignoring mapping line with an empty name");
                continue;
            }

            let paths: Vec<String> = values
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            if paths.is_empty() {
                warn!(line = line_no + 1, "Mapping for '{}' lists no paths", key);
            }
            table.insert(key, paths);
        }

        if !table.contains(PROMPT_KEY) {
            return Err(ConfigError::MissingPromptMapping);
        }
        Ok(table)
    }

    /// Loads and parses a mapping file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            kind: "mapping",
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// The conventional mapping file location for a workflow: same path, `.map` extension.
    pub fn default_path_for(workflow_file: impl AsRef<Path>) -> PathBuf {
        workflow_file.as_ref().with_extension("map")
    }

    fn insert(&mut self, key: String, paths: Vec<String>) {
        match self.index.get(&key) {
            Some(&idx) => self.entries[idx].1.extend(paths),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, paths));
            }
        }
    }

    /// Paths bound to `name` (case-insensitive), in file order.
    pub fn paths(&self, name: &str) -> Option<&[String]> {
        self.index
            .get(&name.to_lowercase())
            .map(|&idx| self.entries[idx].1.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&name.to_lowercase())
    }

    /// Mapped argument names in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
