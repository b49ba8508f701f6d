//! YAML document schema for analysis configuration.
//!
//! - `ConfigEnvelope`: lightweight first-pass header (apiVersion, kind, metadata)
//! - `ConfigDocument`: enum dispatching to kind-specific documents
//! - `Document<S>`: header plus a typed `spec` section

mod document;
mod envelope;
mod kind;
mod metadata;

pub use document::*;
pub use envelope::*;
pub use kind::*;
pub use metadata::*;
