//! Filesystem loader for analysis config documents.
//!
//! Scans a directory for YAML files and deserializes every supported kind
//! via two-pass deserialization (ConfigEnvelope -> ConfigDocument).

mod core;
mod error;


pub use self::core::{parse_document, ConfigLoader};
pub use self::error::{ConfigError, LoadResult, LoadStatus, Result};
