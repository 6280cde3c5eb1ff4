use super::strip_comment;
use crate::error::ConfigError;
use std::collections::VecDeque;
use std::fmt;
use std::fs;
use std::path::Path;

/// An in-stream instruction of the form `!name=value`.
///
/// The name is lower-cased and trimmed; the value is trimmed but otherwise kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    pub value: String,
}

impl Directive {
    /// Parses a directive line. Classification is purely syntactic: a leading `!`
    /// and at least one `=`. Everything else is `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let body = line.strip_prefix('!')?;
        let (name, value) = body.split_once('=')?;
        Some(Self {
            name: name.trim().to_lowercase(),
            value: value.trim().to_string(),
        })
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!{}={}", self.name, self.value)
    }
}

/// A single logical line of the prompt file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Directive(Directive),
    Prompt(String),
}

impl Entry {
    fn classify(line: &str) -> Self {
        match Directive::parse(line) {
            Some(directive) => Entry::Directive(directive),
            None => Entry::Prompt(line.to_string()),
        }
    }
}

/// Ordered, single-pass queue of prompt file entries.
///
/// Comments and blank lines are dropped on load. Entries are consumed
/// destructively through the `Iterator` implementation.
#[derive(Debug, Clone, Default)]
pub struct PromptStream {
    entries: VecDeque<Entry>,
}

impl PromptStream {
    /// Parses prompt file content.
    pub fn parse(content: &str) -> Self {
        let entries = content
            .lines()
            .filter_map(strip_comment)
            .map(Entry::classify)
            .collect();
        Self { entries }
    }

    /// Loads and parses a prompt file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            kind: "prompt",
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::parse(&content))
    }

    /// Number of entries not yet consumed, directives included.
    pub fn remaining(&self) -> usize {
        self.entries.len()
    }

    /// Number of prompt entries not yet consumed.
    pub fn prompts_remaining(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, Entry::Prompt(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Iterator for PromptStream {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        self.entries.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.entries.len(), Some(self.entries.len()))
    }
}
