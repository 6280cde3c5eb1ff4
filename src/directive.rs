//! In-stream directives and prompt text decoration.

use crate::binding::BindingSet;
use crate::config::PromptOptions;
use crate::error::DirectiveRejection;
use crate::mapping::PROMPT_KEY;
use crate::placeholder::truncate_chars;
use crate::prompt::Directive;
use ahash::AHashMap;

/// Runtime overrides set by `!name=value` lines.
///
/// An override persists for every later prompt until another directive for
/// the same name replaces it.
#[derive(Debug, Clone, Default)]
pub struct DirectiveOverrides {
    values: AHashMap<String, String>,
}

impl DirectiveOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a directive against the binding set and records it.
    ///
    /// Only names with a mapping entry and at least one resolved binding may
    /// be overridden, and `prompt` never may. A rejected directive leaves the
    /// table untouched.
    pub fn apply(
        &mut self,
        directive: &Directive,
        bindings: &BindingSet,
    ) -> Result<(), DirectiveRejection> {
        let name = directive.name.to_lowercase();
        if name == PROMPT_KEY {
            return Err(DirectiveRejection::Reserved(name));
        }
        if !bindings.is_mapped(&name) {
            return Err(DirectiveRejection::Unmapped(name));
        }
        if !bindings.has_resolved(&name) {
            return Err(DirectiveRejection::Unresolved(name));
        }
        self.values.insert(name, directive.value.clone());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Applies prepend/append text and the length cap to raw prompt lines.
#[derive(Debug, Clone, Default)]
pub struct PromptDecorator {
    options: PromptOptions,
}

impl PromptDecorator {
    pub fn new(options: PromptOptions) -> Self {
        Self { options }
    }

    /// Joins `prepend`, the prompt and `append` with single spaces, skipping
    /// empty parts, then truncates to `truncate` characters when set.
    pub fn decorate(&self, prompt: &str) -> String {
        let parts = [
            self.options.prepend.as_deref(),
            Some(prompt),
            self.options.append.as_deref(),
        ];
        let joined = parts
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if self.options.truncate > 0 {
            truncate_chars(&joined, self.options.truncate)
                .trim_end()
                .to_string()
        } else {
            joined
        }
    }
}
