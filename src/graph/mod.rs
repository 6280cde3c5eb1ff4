//! The workflow graph and title-addressed path resolution.
//!
//! Nodes in an exported workflow are keyed by opaque ids that change between
//! exports, so bindings address them by their human-facing `_meta.title`
//! instead. Resolution is strict (every key but the last must already exist);
//! writing is lenient and creates missing keys.

mod path;
mod value;
mod workflow;

pub use path::*;
pub use value::*;
pub use workflow::*;
