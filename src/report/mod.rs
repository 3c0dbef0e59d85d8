//! Result aggregation.
//!
//! Checks produce [`CheckResult`]s made of [`Setting`]s and [`Message`]s; a
//! [`Report`] collects the results of one run and exposes grouped,
//! filterable views of everything the checks produced.

pub mod message;
pub mod result;
pub mod setting;

pub use message::{Message, Severity, SeverityMask};
pub use result::CheckResult;
pub use setting::{GroupFilter, Setting, SettingFlag, DEFAULT_GROUP};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::config::merger::merge_into;
use crate::parameters::Parameters;

/// Ordered aggregation of all results from one run.
#[derive(Debug, Clone)]
pub struct Report {
    results: Vec<CheckResult>,
    parameters: Parameters,
    started_at: DateTime<Utc>,
}

impl Default for Report {
    fn default() -> Self {
        Self::new(Parameters::default())
    }
}

impl Report {
    /// Create an empty report.
    pub fn new(parameters: Parameters) -> Self {
        Self {
            results: Vec::new(),
            parameters,
            started_at: Utc::now(),
        }
    }

    pub fn add_result(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// When the report was created.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// All settings merged into `{group: {name: value}}`, restricted to
    /// `groups`.
    ///
    /// Results are merged in the order they were added using the same
    /// recursive merge as config loading: scalars from later results win,
    /// arrays under the same group/name are concatenated.
    pub fn settings_value(&self, groups: &GroupFilter) -> Value {
        let mut merged = Value::Object(Default::default());
        for result in &self.results {
            merge_into(&mut merged, &result.settings_value(groups));
        }
        merged
    }

    /// Flat list of settings matching the criteria, in production order.
    pub fn settings(&self, groups: &GroupFilter, flag: Option<SettingFlag>) -> Vec<&Setting> {
        self.results
            .iter()
            .flat_map(|r| r.settings())
            .filter(|s| s.matches_group(groups) && s.matches_flag(flag))
            .collect()
    }

    /// Messages whose severity is in `mask`.
    pub fn messages(&self, mask: SeverityMask) -> Vec<&Message> {
        self.results
            .iter()
            .flat_map(|r| r.messages())
            .filter(|m| mask.contains(m.severity()))
            .collect()
    }

    /// True if any result reported an error or fatal message.
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(CheckResult::has_errors)
    }
}
