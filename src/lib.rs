//! # promptbatch - Batch Prompt Submission for Node Workflows
//!
//! **promptbatch** takes a workflow exported in API format from a node-based image
//! generation server, a mapping file that binds argument names to locations inside
//! that workflow, and a file of prompts. For every prompt it rewrites the workflow in
//! place and submits it to the server.
//!
//! ## Core Workflow
//!
//! 1.  **Load Your Inputs**: Read the workflow with [`WorkflowGraph::from_file`], the
//!     mapping with [`MappingTable::from_file`] and the prompts with [`PromptStream::from_file`].
//! 2.  **Bind Arguments**: Use [`BindingSetBuilder`] to resolve every `title/key/...` path in the
//!     mapping against the graph. Node ids are never used; titles are.
//! 3.  **Dispatch**: Hand the bindings and a [`Submitter`] to a [`Dispatcher`] and run it over the
//!     prompt stream. Directive lines (`!steps=30`) change argument values for every later prompt.
//!
//! ## Mapping Files
//!
//! ```text
//! # argument == node title/input key[, more paths]
//! prompt          == CLIP Text Encode (Prompt)
//! steps           == BasicScheduler/steps
//! seed            == RandomNoise/noise_seed, KSampler/seed
//! filename_prefix == Save Image/filename_prefix
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use promptbatch::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut graph = WorkflowGraph::from_file("flux_workflow_api.json")?;
//!     let mapping = MappingTable::from_file("flux_workflow_api.map")?;
//!     let prompts = PromptStream::from_file("prompts.txt")?;
//!
//!     let mut args = UserArgs::new();
//!     args.insert("steps", "20");
//!     args.insert("filename_prefix", "<date>-<prompt>-<seed>");
//!
//!     let bindings = BindingSetBuilder::new(&mapping)
//!         .with_args(args)
//!         .with_default("seed", "random")
//!         .build(&graph)?;
//!
//!     let submitter = HttpSubmitter::new(ServerConfig::default());
//!     let mut dispatcher = Dispatcher::new(bindings, submitter);
//!     let summary = dispatcher.run(&mut graph, prompts);
//!
//!     println!("Queued {} of {} prompts", summary.queued, summary.prompts);
//!     Ok(())
//! }
//! ```

pub mod binding;
pub mod config;
pub mod directive;
pub mod dispatch;
pub mod error;
pub mod graph;
pub mod mapping;
pub mod placeholder;
pub mod prelude;
pub mod prompt;

pub use binding::{Binding, BindingKind, BindingSet, BindingSetBuilder};
pub use config::{PromptOptions, ServerConfig, UserArgs};
pub use dispatch::{Dispatcher, DispatchSummary, DryRunSubmitter, HttpSubmitter, Submitter};
pub use graph::{PathExpression, WorkflowGraph};
pub use mapping::MappingTable;
pub use prompt::PromptStream;
