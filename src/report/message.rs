//! Diagnostic messages produced by checks.

use super::setting::DEFAULT_GROUP;

/// Severity of a message. Each severity is an independent bit so that
/// messages can be filtered with a [`SeverityMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Fatal,
    Error,
    Warn,
    Notice,
    Info,
    Debug,
}

impl Severity {
    /// Every severity, most severe first.
    pub const ALL: [Severity; 6] = [
        Severity::Fatal,
        Severity::Error,
        Severity::Warn,
        Severity::Notice,
        Severity::Info,
        Severity::Debug,
    ];

    /// The bit for this severity.
    pub fn bit(self) -> u8 {
        match self {
            Severity::Fatal => 1,
            Severity::Error => 2,
            Severity::Warn => 4,
            Severity::Notice => 8,
            Severity::Info => 16,
            Severity::Debug => 32,
        }
    }

    /// Lower-case label.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Fatal => "fatal",
            Severity::Error => "error",
            Severity::Warn => "warn",
            Severity::Notice => "notice",
            Severity::Info => "info",
            Severity::Debug => "debug",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of severities used to filter messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityMask(u8);

impl SeverityMask {
    /// Every severity.
    pub const ALL: Self = Self(0b11_1111);
    /// No severity.
    pub const NONE: Self = Self(0);

    /// Every severity at least as severe as `threshold`.
    pub fn at_least(threshold: Severity) -> Self {
        Severity::ALL
            .iter()
            .filter(|s| **s <= threshold)
            .fold(Self::NONE, |mask, s| mask.with(*s))
    }

    /// Add a severity to the mask.
    pub fn with(self, severity: Severity) -> Self {
        Self(self.0 | severity.bit())
    }

    pub fn contains(self, severity: Severity) -> bool {
        self.0 & severity.bit() != 0
    }
}

impl From<Severity> for SeverityMask {
    fn from(severity: Severity) -> Self {
        Self(severity.bit())
    }
}

/// A human-readable diagnostic attached to a check result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    name: String,
    text: String,
    group: String,
    severity: Severity,
}

impl Message {
    /// Create a message in the default group.
    pub fn new(name: impl Into<String>, text: impl Into<String>, severity: Severity) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            group: DEFAULT_GROUP.to_string(),
            severity,
        }
    }

    /// Place the message in a group. An empty group means the default one.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        let group = group.into();
        if !group.is_empty() {
            self.group = group;
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}
