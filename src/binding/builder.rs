use super::{Binding, BindingKind, BindingSet};
use crate::config::UserArgs;
use crate::error::{ConfigError, ResolveError};
use crate::graph::{Location, PathExpression, TitleMatch, WorkflowGraph};
use crate::mapping::{MappingTable, PROMPT_KEY};
use tracing::{info, warn};

/// Builds a `BindingSet` from a mapping table and the user's arguments.
pub struct BindingSetBuilder<'a> {
    mapping: &'a MappingTable,
    args: UserArgs,
    defaults: UserArgs,
}

impl<'a> BindingSetBuilder<'a> {
    pub fn new(mapping: &'a MappingTable) -> Self {
        Self {
            mapping,
            args: UserArgs::new(),
            defaults: UserArgs::new(),
        }
    }

    /// User-supplied arguments. Names without a mapping entry are dropped with a warning.
    pub fn with_args(mut self, args: UserArgs) -> Self {
        self.args.merge(args);
        self
    }

    /// A fallback used only when the user did not supply `name` and the mapping names it.
    pub fn with_default(mut self, name: &str, value: &str) -> Self {
        self.defaults.insert(name, value);
        self
    }

    /// Resolves every binding against `graph`.
    ///
    /// Fails when the mapping binds no prompt path or a `prompt` path cannot be
    /// resolved. Other failures are kept in the set and reported.
    pub fn build(self, graph: &WorkflowGraph) -> Result<BindingSet, ConfigError> {
        let mut set = BindingSet {
            bindings: Vec::new(),
            mapped: self.mapping.names().map(str::to_string).collect(),
        };

        let prompt_paths = self
            .mapping
            .paths(PROMPT_KEY)
            .filter(|paths| !paths.is_empty())
            .ok_or(ConfigError::MissingPromptMapping)?;

        for path in prompt_paths {
            let target = PathExpression::parse(path)
                .and_then(|p| graph.resolve_prompt(&p, TitleMatch::IgnoreCase));
            match target {
                Ok(location) => set.bindings.push(Binding {
                    name: PROMPT_KEY.to_string(),
                    path: path.clone(),
                    kind: BindingKind::Prompt,
                    default_value: None,
                    target: Ok(location),
                    template_value: None,
                }),
                Err(source) => {
                    return Err(ConfigError::PromptUnresolved {
                        path: path.clone(),
                        source,
                    });
                }
            }
        }

        for (name, value) in self.args.iter() {
            if name == PROMPT_KEY {
                warn!("'{}' is reserved for the prompt file and cannot be set as an argument", name);
                continue;
            }
            match self.mapping.paths(name) {
                Some(paths) => Self::push_bindings(&mut set, graph, name, value, paths),
                None => warn!("No mapping found for argument '{}'; ignoring it", name),
            }
        }

        for (name, value) in self.defaults.iter() {
            if name == PROMPT_KEY || self.args.contains(name) {
                continue;
            }
            if let Some(paths) = self.mapping.paths(name) {
                Self::push_bindings(&mut set, graph, name, value, paths);
            }
        }

        let report = set.report();
        for (name, path, error) in &report.failures {
            warn!("Could not resolve '{}' -> '{}': {}", name, path, error);
        }
        info!("{}", report.summary());

        Ok(set)
    }

    fn push_bindings(
        set: &mut BindingSet,
        graph: &WorkflowGraph,
        name: &str,
        value: &str,
        paths: &[String],
    ) {
        for path in paths {
            let target = Self::resolve(graph, path);
            let template_value = target
                .as_ref()
                .ok()
                .and_then(|location| graph.get(location))
                .cloned();
            set.bindings.push(Binding {
                name: name.to_string(),
                path: path.clone(),
                kind: BindingKind::classify(name),
                default_value: Some(value.to_string()),
                target,
                template_value,
            });
        }
    }

    fn resolve(graph: &WorkflowGraph, path: &str) -> Result<Location, ResolveError> {
        let path = PathExpression::parse(path)?;
        graph.resolve(&path, TitleMatch::Exact)
    }
}
