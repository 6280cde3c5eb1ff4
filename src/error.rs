use thiserror::Error;

/// Errors raised while parsing a path expression or resolving it against a workflow graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Path expression is empty")]
    EmptyPath,

    #[error("Path '{0}' contains an empty key segment")]
    EmptySegment(String),

    #[error("Path '{0}' has no key chain; only the 'prompt' binding may address a bare node title")]
    EmptyKeyChain(String),

    #[error("No node titled '{title}' exists in the workflow")]
    NodeNotFound { title: String },

    #[error("Node '{title}' has no key '{key}' along the requested path")]
    MissingKey { title: String, key: String },

    #[error("Key '{key}' in node '{title}' is not a mapping and cannot be descended into")]
    NotAMapping { title: String, key: String },
}

/// Fatal startup errors. Any of these aborts the run before a single prompt is submitted.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Failed to read {kind} file '{path}': {message}")]
    Io {
        kind: &'static str,
        path: String,
        message: String,
    },

    #[error("Failed to parse workflow JSON: {0}")]
    WorkflowParse(String),

    #[error("Workflow root must be a JSON object mapping node ids to nodes")]
    WorkflowNotAnObject,

    #[error("Mapping file has no 'prompt' entry; at least one prompt node must be mapped")]
    MissingPromptMapping,

    #[error("The 'prompt' binding '{path}' could not be resolved: {source}")]
    PromptUnresolved {
        path: String,
        #[source]
        source: ResolveError,
    },
}

/// Errors reported for a single submission. These never abort the batch.
#[derive(Error, Debug, Clone)]
pub enum SubmitError {
    #[error("Failed to encode workflow: {0}")]
    Encode(String),

    #[error("Request to '{url}' failed: {message}")]
    Transport { url: String, message: String },

    #[error("Server at '{url}' answered with status {status}")]
    Status { url: String, status: u16 },
}

/// Reasons a directive line is ignored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectiveRejection {
    #[error("Directive targets '{0}', which is reserved for prompt file lines")]
    Reserved(String),

    #[error("Directive targets '{0}', which has no mapping entry")]
    Unmapped(String),

    #[error("Directive targets '{0}', which has no successfully resolved binding")]
    Unresolved(String),
}

/// Problems found while collecting free-form argument flags.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserArgError {
    #[error("Argument '{0}' is missing a value")]
    MissingValue(String),

    #[error("Expected an argument flag starting with '--', found '{0}'")]
    NotAFlag(String),

    #[error("Argument name is empty in '{0}'")]
    EmptyName(String),
}
