//! Settings export formatters.
//!
//! Each formatter serializes the settings of a [`Report`] into one artifact
//! (JSON, PHP literal, plain text, shell, XML) and writes it to its
//! configured `location`. Every formatter renders through the named
//! placeholder engine in [`crate::template`].
//!
//! Writing never creates parent directories. A failed write is reported in
//! the returned status line (`... FAILED`) so that the remaining formatters
//! of a batch still run; configuration mistakes such as a missing template
//! are returned as errors.

pub mod json;
pub mod php;
pub mod plain_text;
pub mod shell;
pub mod xml;

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Config, FormatterDefinition};
use crate::error::Result;
use crate::parameters::Parameters;
use crate::registry::FormatterRegistry;
use crate::report::{GroupFilter, Report};

pub use json::JsonFormatter;
pub use php::PhpFormatter;
pub use plain_text::PlainTextFormatter;
pub use shell::ShellFormatter;
pub use xml::XmlFormatter;

/// Status suffix of a successful write.
pub const STATUS_OK: &str = "ok";
/// Status suffix of a failed write.
pub const STATUS_FAILED: &str = "FAILED";

/// Serializes report settings into one artifact.
pub trait SettingsFormatter {
    /// Registered formatter name.
    fn name(&self) -> &'static str;

    /// Output file used when no `location` parameter is set.
    fn default_location(&self) -> &'static str;

    fn parameters(&self) -> &Parameters;

    /// Produce the artifact content.
    fn render(&self, report: &Report) -> Result<String>;

    /// Output file path.
    fn location(&self) -> PathBuf {
        self.parameters()
            .get_str("location")
            .filter(|location| !location.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(self.default_location()))
    }

    /// Groups to export, from the `groups` parameter.
    fn groups(&self) -> Result<GroupFilter> {
        GroupFilter::from_value(self.parameters().get("groups").unwrap_or(&Value::Null))
    }

    /// Render the artifact, write it and return a status line.
    ///
    /// # Errors
    ///
    /// Returns rendering errors (missing template, invalid identifier,
    /// invalid group criteria). Write failures are reported in the status.
    fn format(&self, report: &Report) -> Result<String> {
        let content = self.render(report)?;
        Ok(write_artifact(self.name(), &self.location(), &content))
    }
}

/// Write `content` to `location` and describe the outcome.
pub fn write_artifact(name: &str, location: &Path, content: &str) -> String {
    let status = match fs::write(location, content) {
        Ok(()) => {
            tracing::debug!("Wrote {} bytes to {}", content.len(), location.display());
            STATUS_OK
        }
        Err(e) => {
            tracing::warn!("Failed to write {}: {}", location.display(), e);
            STATUS_FAILED
        }
    };
    format!(
        "Writing {} settings to {}... {}",
        name,
        location.display(),
        status
    )
}

/// An ordered batch of formatters run over one report.
#[derive(Default)]
pub struct Export {
    formatters: Vec<Box<dyn SettingsFormatter>>,
}

impl Export {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the formatters configured under `export.formatters`.
    ///
    /// Without configured formatters a single JSON formatter with default
    /// parameters is used.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for malformed definitions and
    /// `UnknownImplementor` for unregistered formatter names.
    pub fn from_config(config: &Config, registry: &FormatterRegistry) -> Result<Self> {
        let mut definitions = config.formatters()?;
        if definitions.is_empty() {
            definitions.push(FormatterDefinition {
                kind: JsonFormatter::NAME.to_string(),
                parameters: Parameters::new(),
            });
        }

        let mut export = Self::new();
        for definition in &definitions {
            export.add_formatter(registry.create(&definition.kind, definition)?);
        }
        Ok(export)
    }

    pub fn add_formatter(&mut self, formatter: Box<dyn SettingsFormatter>) {
        self.formatters.push(formatter);
    }

    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }

    /// Run every formatter in order and collect their status lines.
    ///
    /// # Errors
    ///
    /// Stops at the first formatter that fails to render.
    pub fn run(&self, report: &Report) -> Result<Vec<String>> {
        self.formatters
            .iter()
            .map(|formatter| formatter.format(report))
            .collect()
    }
}

/// Iterate the `{group: {name: value}}` view as `(group, name, value)`.
pub(crate) fn grouped_settings(view: &Value) -> impl Iterator<Item = (&str, &str, &Value)> {
    view.as_object()
        .into_iter()
        .flat_map(|groups| groups.iter())
        .filter_map(|(group, settings)| Some((group.as_str(), settings.as_object()?)))
        .flat_map(|(group, settings)| {
            settings
                .iter()
                .map(move |(name, value)| (group, name.as_str(), value))
        })
}
