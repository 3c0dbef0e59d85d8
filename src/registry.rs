//! Named factories for configurable implementors.
//!
//! Config refers to checks by `class` and to formatters by `type`. The
//! registries map those names to constructors; built-ins are registered by
//! [`check_registry`] and [`formatter_registry`].

use std::collections::BTreeMap;

use crate::checks::{Check, EnvironmentCheck, ExecutableCheck, ValueCheck};
use crate::config::{CheckDefinition, FormatterDefinition};
use crate::error::{EnvironautError, Result};
use crate::export::{
    JsonFormatter, PhpFormatter, PlainTextFormatter, SettingsFormatter, ShellFormatter,
    XmlFormatter,
};

/// Builds an implementor from its config definition.
pub type Factory<D, T> = fn(&D) -> Result<Box<T>>;

/// Registry of named factories.
pub struct Registry<D, T: ?Sized> {
    kind: &'static str,
    factories: BTreeMap<String, Factory<D, T>>,
}

/// Registry of check classes.
pub type CheckRegistry = Registry<CheckDefinition, dyn Check>;

/// Registry of export formatters.
pub type FormatterRegistry = Registry<FormatterDefinition, dyn SettingsFormatter>;

impl<D, T: ?Sized> Registry<D, T> {
    /// Create an empty registry; `kind` names the implementors in errors.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            factories: BTreeMap::new(),
        }
    }

    /// Register (or replace) a factory.
    pub fn register(&mut self, name: &str, factory: Factory<D, T>) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Build the implementor registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownImplementor` if nothing is registered under `name`,
    /// and the factory's own errors.
    pub fn create(&self, name: &str, definition: &D) -> Result<Box<T>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| EnvironautError::UnknownImplementor {
                kind: self.kind.to_string(),
                name: name.to_string(),
                available: self.names().join(", "),
            })?;
        factory(definition)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// Registry with the built-in checks.
pub fn check_registry() -> CheckRegistry {
    let mut registry = CheckRegistry::new("check");
    registry.register(ValueCheck::CLASS, |d| Ok(Box::new(ValueCheck::new(d))));
    registry.register(EnvironmentCheck::CLASS, |d| {
        Ok(Box::new(EnvironmentCheck::new(d)))
    });
    registry.register(ExecutableCheck::CLASS, |d| {
        Ok(Box::new(ExecutableCheck::new(d)))
    });
    registry
}

/// Registry with the built-in formatters.
pub fn formatter_registry() -> FormatterRegistry {
    let mut registry = FormatterRegistry::new("formatter");
    registry.register(JsonFormatter::NAME, |d| {
        Ok(Box::new(JsonFormatter::new(d.parameters.clone())))
    });
    registry.register(PhpFormatter::NAME, |d| {
        Ok(Box::new(PhpFormatter::new(d.parameters.clone())))
    });
    registry.register(PlainTextFormatter::NAME, |d| {
        Ok(Box::new(PlainTextFormatter::new(d.parameters.clone())))
    });
    registry.register(ShellFormatter::NAME, |d| {
        Ok(Box::new(ShellFormatter::new(d.parameters.clone())))
    });
    registry.register(XmlFormatter::NAME, |d| {
        Ok(Box::new(XmlFormatter::new(d.parameters.clone())))
    });
    registry
}
