//! Exported settings.
//!
//! A [`Setting`] is one key/value pair produced by a check. Settings carry a
//! group (a namespace used for filtering and export partitioning) and a
//! [`SettingFlag`] bitmask classifying them.

use serde_json::{Map, Value};

use crate::error::{EnvironautError, Result};

/// Group used when a setting or message does not name one.
pub const DEFAULT_GROUP: &str = "default";

/// Bitmask classifying a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SettingFlag(u32);

impl SettingFlag {
    /// A regular exported setting.
    pub const NORMAL: Self = Self(1);
    /// A setting holding secret data.
    pub const SENSITIVE: Self = Self(2);
    /// A setting that is only meant to be cached.
    pub const CACHE_ONLY: Self = Self(4);
    /// Every bit set; matches any flag.
    pub const ALL: Self = Self(u32::MAX);

    /// Create a flag from raw bits.
    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// True when this flag shares at least one bit with `mask`.
    pub fn matches(self, mask: SettingFlag) -> bool {
        self.0 & mask.0 != 0
    }

    /// Combine two flags.
    pub fn union(self, other: SettingFlag) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for SettingFlag {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Criterion selecting settings by group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GroupFilter {
    /// Every group.
    #[default]
    Any,
    /// Exactly this group.
    One(String),
    /// Any of these groups; an empty list selects every group.
    Many(Vec<String>),
}

impl GroupFilter {
    /// Build a filter from an untyped value (e.g. a formatter's `groups`
    /// parameter).
    ///
    /// # Errors
    ///
    /// Returns `InvalidCriteria` unless the value is null, a string or an
    /// array of strings.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::Any),
            Value::String(group) => Ok(Self::One(group.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| EnvironautError::InvalidCriteria {
                            found: value.to_string(),
                        })
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Many),
            other => Err(EnvironautError::InvalidCriteria {
                found: other.to_string(),
            }),
        }
    }

    /// Build a filter from an optional list of group names.
    pub fn from_names(names: &[String]) -> Self {
        if names.is_empty() {
            Self::Any
        } else {
            Self::Many(names.to_vec())
        }
    }

    /// True when `group` is selected.
    pub fn matches(&self, group: &str) -> bool {
        match self {
            Self::Any => true,
            Self::One(name) => name == group,
            Self::Many(names) => names.is_empty() || names.iter().any(|n| n == group),
        }
    }
}

impl From<&str> for GroupFilter {
    fn from(group: &str) -> Self {
        Self::One(group.to_string())
    }
}

impl From<Vec<String>> for GroupFilter {
    fn from(groups: Vec<String>) -> Self {
        Self::Many(groups)
    }
}

/// One exported key/value pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
    name: String,
    value: Value,
    group: String,
    flag: SettingFlag,
}

impl Setting {
    /// Create a setting in the default group with the normal flag.
    ///
    /// # Errors
    ///
    /// Returns `EmptySettingName` if `name` is empty.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(EnvironautError::EmptySettingName);
        }
        Ok(Self {
            name,
            value: value.into(),
            group: DEFAULT_GROUP.to_string(),
            flag: SettingFlag::NORMAL,
        })
    }

    /// Place the setting in a group. An empty group means the default one.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        let group = group.into();
        self.group = if group.is_empty() {
            DEFAULT_GROUP.to_string()
        } else {
            group
        };
        self
    }

    /// Set the setting's flag.
    pub fn with_flag(mut self, flag: SettingFlag) -> Self {
        self.flag = flag;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn flag(&self) -> SettingFlag {
        self.flag
    }

    /// True when the group criterion selects this setting.
    pub fn matches_group(&self, groups: &GroupFilter) -> bool {
        groups.matches(&self.group)
    }

    /// True when `flag` is `None` or overlaps this setting's flag.
    pub fn matches_flag(&self, flag: Option<SettingFlag>) -> bool {
        flag.is_none_or(|mask| self.flag.matches(mask))
    }

    /// The `{group: {name: value}}` fragment for this setting.
    pub fn to_value(&self) -> Value {
        let mut inner = Map::new();
        inner.insert(self.name.clone(), self.value.clone());
        let mut outer = Map::new();
        outer.insert(self.group.clone(), Value::Object(inner));
        Value::Object(outer)
    }
}
