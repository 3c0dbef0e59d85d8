//! Environaut - Environment checks and settings export for deployments.
//!
//! Environaut reads a declarative configuration describing a set of checks,
//! runs them in sequence, collects messages and key/value settings, caches
//! the settings for later runs and exports them as JSON, XML, shell, plain
//! text or PHP files.
//!
//! # Modules
//!
//! - [`cache`] - Persistent settings cache with criteria lookup
//! - [`checks`] - Built-in checks behind the [`checks::Check`] trait
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Config readers, location handling and recursive merging
//! - [`error`] - Error types and result aliases
//! - [`export`] - Settings formatters and the export batch
//! - [`parameters`] - Ordered key/value parameters
//! - [`registry`] - Named factories for checks and formatters
//! - [`report`] - Settings, messages and run aggregation
//! - [`runner`] - Sequential check execution
//! - [`template`] - Named-placeholder `printf` formatting
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use environaut::config::Config;
//! use environaut::registry::check_registry;
//! use environaut::report::GroupFilter;
//! use environaut::runner::{RunOptions, Runner};
//! use serde_json::json;
//!
//! let config = Config::new(json!({
//!     "checks": [{"name": "mode", "group": "app", "value": "production"}]
//! }));
//! let registry = check_registry();
//! let options = RunOptions { use_cache: false, ..Default::default() };
//! let outcome = Runner::new(&config, &registry).run(&options).unwrap();
//!
//! assert_eq!(
//!     outcome.report.settings_value(&GroupFilter::Any),
//!     json!({"app": {"mode": "production"}})
//! );
//! ```

pub mod cache;
pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod parameters;
pub mod registry;
pub mod report;
pub mod runner;
pub mod template;
pub mod ui;

pub use error::{EnvironautError, Result};
