//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the promptbatch crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use promptbatch::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let graph = WorkflowGraph::from_file("path/to/workflow_api.json")?;
//! let mapping = MappingTable::from_file("path/to/workflow_api.map")?;
//! let bindings = BindingSetBuilder::new(&mapping).build(&graph)?;
//!
//! println!("{}", bindings.report().summary());
//! # Ok(())
//! # }
//! ```

// Loading
pub use crate::graph::{Location, PathExpression, TitleMatch, WorkflowGraph};
pub use crate::mapping::MappingTable;
pub use crate::prompt::{Directive, Entry, PromptStream};

// Binding and rendering
pub use crate::binding::{Binding, BindingKind, BindingSet, BindingSetBuilder, ResolutionReport};
pub use crate::directive::{DirectiveOverrides, PromptDecorator};
pub use crate::placeholder::{RenderContext, SlugOptions, ValueSnapshot, slugify};

// Dispatch
pub use crate::dispatch::{
    DispatchSummary, Dispatcher, DryRunSubmitter, HttpSubmitter, PreparedPrompt, Submitter,
};

// Configuration
pub use crate::config::{PromptOptions, ServerConfig, UserArgs};

// Error types
pub use crate::error::{ConfigError, DirectiveRejection, ResolveError, SubmitError, UserArgError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
