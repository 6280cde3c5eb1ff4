//! Bindings between user-facing argument names and locations in the workflow graph.
//!
//! A `BindingSet` is built once at startup from the mapping table, the user's
//! arguments and the loaded graph. Failed resolutions stay in the set so they
//! can be reported, but they are never written.

mod builder;

pub use builder::BindingSetBuilder;

use crate::error::ResolveError;
use crate::graph::Location;
use crate::mapping::PROMPT_KEY;
use ahash::AHashSet;
use itertools::Itertools;
use serde_json::Value;

/// The argument name that carries the per-prompt seed.
pub const SEED_KEY: &str = "seed";

/// Decides how a binding's value is resolved before being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// The reserved `prompt` binding; receives the effective prompt text.
    Prompt,
    /// The `seed` binding; sentinel values are replaced by the iteration seed.
    Seed,
    /// Filename or path arguments; placeholders are expanded and the result slugified.
    /// `keep_separators` is set for path-like names so `/` and `\` survive.
    FileName { keep_separators: bool },
    /// Everything else is written verbatim.
    Plain,
}

impl BindingKind {
    pub fn classify(name: &str) -> Self {
        let name = name.to_lowercase();
        if name == PROMPT_KEY {
            BindingKind::Prompt
        } else if name == SEED_KEY {
            BindingKind::Seed
        } else if name.contains("file") && (name.contains("name") || name.contains("path")) {
            BindingKind::FileName {
                keep_separators: name.contains("path"),
            }
        } else {
            BindingKind::Plain
        }
    }
}

/// One (argument, graph location) pair.
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub path: String,
    pub kind: BindingKind,
    /// The value supplied at startup. `None` for the prompt binding.
    pub default_value: Option<String>,
    pub target: Result<Location, ResolveError>,
    /// The value found at the target when the graph was loaded. Written values
    /// keep its JSON type.
    pub template_value: Option<Value>,
}

impl Binding {
    pub fn is_resolved(&self) -> bool {
        self.target.is_ok()
    }

    pub fn location(&self) -> Option<&Location> {
        self.target.as_ref().ok()
    }
}

/// The materialized bindings, in construction order.
#[derive(Debug, Clone, Default)]
pub struct BindingSet {
    bindings: Vec<Binding>,
    mapped: AHashSet<String>,
}

impl BindingSet {
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub fn resolved(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter().filter(|b| b.is_resolved())
    }

    pub fn failed(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter().filter(|b| !b.is_resolved())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Whether the mapping table had an entry for `name`.
    pub fn is_mapped(&self, name: &str) -> bool {
        self.mapped.contains(&name.to_lowercase())
    }

    /// Whether at least one binding for `name` resolved successfully.
    pub fn has_resolved(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.resolved().any(|b| b.name == name)
    }

    /// The startup value of the first binding named `name` (case-insensitive).
    pub fn default_value(&self, name: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
            .and_then(|b| b.default_value.as_deref())
    }

    /// Distinct argument names in construction order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.name.as_str()).unique()
    }

    /// Summary of which bindings resolved.
    pub fn report(&self) -> ResolutionReport {
        ResolutionReport {
            resolved: self
                .resolved()
                .map(|b| b.name.clone())
                .unique()
                .collect(),
            resolved_count: self.resolved().count(),
            failures: self
                .failed()
                .filter_map(|b| {
                    b.target
                        .as_ref()
                        .err()
                        .map(|e| (b.name.clone(), b.path.clone(), e.clone()))
                })
                .collect(),
        }
    }
}

/// Human-readable summary of binding resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Distinct names with at least one resolved binding.
    pub resolved: Vec<String>,
    /// Number of resolved bindings, counting each path separately.
    pub resolved_count: usize,
    /// `(name, path, error)` for each binding that failed.
    pub failures: Vec<(String, String, ResolveError)>,
}

impl ResolutionReport {
    pub fn summary(&self) -> String {
        format!(
            "{} binding(s) resolved: {}",
            self.resolved_count,
            self.resolved.iter().join(", ")
        )
    }
}
