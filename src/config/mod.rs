//! Configuration loading and merging.
//!
//! - Location resolution and merging in [`handler`]
//! - Format readers (XML, JSON, YAML, PHP literal) in [`readers`]
//! - The typed [`Config`] view in [`schema`]
//! - The recursive merge shared with the report in [`merger`]
//!
//! # Example
//!
//! ```
//! use environaut::config::ConfigHandler;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("environaut.json"), r#"{"name": "test"}"#).unwrap();
//!
//! let mut handler = ConfigHandler::new();
//! handler.add_location(temp.path()).unwrap();
//! let config = handler.get_config().unwrap();
//! assert_eq!(config.name(), Some("test"));
//! ```

pub mod handler;
pub mod merger;
pub mod readers;
pub mod schema;

pub use handler::{ConfigHandler, DEFAULT_FILENAMES};
pub use merger::{deep_merge, merge_all, merge_into};
pub use readers::ConfigReader;
pub use schema::{CheckDefinition, Config, FormatterDefinition, DEFAULT_CHECK_CLASS};
