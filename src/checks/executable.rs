//! Executable lookup check.

use std::path::{Path, PathBuf};

use super::{Check, CheckBase, CheckContext};
use crate::config::CheckDefinition;
use crate::error::Result;
use crate::report::{CheckResult, Severity};

/// Check whether a path is an executable file.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Check whether a path is an executable file.
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// First executable named `command` in `dirs`.
pub fn find_executable(command: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    let command = Path::new(command);
    if command.components().count() > 1 {
        return is_executable(command).then(|| command.to_path_buf());
    }
    dirs.iter()
        .map(|dir| dir.join(command))
        .find(|candidate| is_executable(candidate))
}

/// Directories of the `PATH` environment variable.
pub fn system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Locates an executable and exports its absolute path.
///
/// Parameters:
/// - `command` - executable name or path (defaults to the check name)
/// - `paths` - directories to search instead of `PATH`
/// - `required` - report an error when not found (default `true`)
#[derive(Debug, Clone)]
pub struct ExecutableCheck {
    base: CheckBase,
}

impl ExecutableCheck {
    pub const CLASS: &'static str = "executable";

    pub fn new(definition: &CheckDefinition) -> Self {
        Self {
            base: CheckBase::new(definition),
        }
    }

    fn command(&self) -> &str {
        self.base
            .parameters()
            .get_str("command")
            .filter(|c| !c.is_empty())
            .unwrap_or(self.base.name())
    }

    fn search_path(&self) -> Vec<PathBuf> {
        match self.base.parameters().get("paths") {
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str())
                .map(PathBuf::from)
                .collect(),
            Some(serde_json::Value::String(path)) => std::env::split_paths(path).collect(),
            _ => system_path(),
        }
    }
}

impl Check for ExecutableCheck {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn group(&self) -> &str {
        self.base.group()
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Result<CheckResult> {
        // A cached path is only reused while it still points at an executable.
        let cached_still_valid = self
            .base
            .cached(ctx)
            .and_then(|s| s.value().as_str())
            .is_some_and(|path| is_executable(Path::new(path)));
        if cached_still_valid {
            if let Some(result) = self.base.cached_result(ctx) {
                return Ok(result);
            }
        }

        let command = self.command();
        let mut result = CheckResult::new(self.name());
        match find_executable(command, &self.search_path()) {
            Some(path) => {
                let path = path.to_string_lossy().into_owned();
                result.add_message(
                    self.base
                        .message(format!("Found {} at {}", command, path), Severity::Info),
                );
                result.add_setting(self.base.setting(path)?);
            }
            None => {
                let severity = if self.base.parameters().get_bool("required", true) {
                    Severity::Error
                } else {
                    Severity::Warn
                };
                tracing::debug!("Executable '{}' not found", command);
                result.add_message(
                    self.base
                        .message(format!("Executable {} not found", command), severity),
                );
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Cache;
    use crate::parameters::Parameters;
    use crate::report::Setting;
    use serde_json::{json, Value};
    use std::fs;
    use tempfile::TempDir;

    fn create_fake_binary(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "#!/bin/sh\nexit 0\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    fn check(params: Value) -> ExecutableCheck {
        ExecutableCheck::new(&CheckDefinition {
            name: "tool".to_string(),
            class: ExecutableCheck::CLASS.to_string(),
            group: "tools".to_string(),
            parameters: Parameters::from_value(&params),
        })
    }

    #[test]
    fn find_executable_returns_first_match() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("a");
        let second = temp.path().join("b");
        create_fake_binary(&first.join("tool"));
        create_fake_binary(&second.join("tool"));

        assert_eq!(
            find_executable("tool", &[first.clone(), second]),
            Some(first.join("tool"))
        );
        assert_eq!(find_executable("other", &[first]), None);
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_files_are_skipped() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("tool"), "data").unwrap();
        assert!(!is_executable(&temp.path().join("tool")));
        assert_eq!(find_executable("tool", &[temp.path().to_path_buf()]), None);
    }

    #[test]
    fn exports_found_path() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        create_fake_binary(&bin.join("tool"));

        let result = check(json!({"paths": [bin.to_str().unwrap()]}))
            .run(&CheckContext::default())
            .unwrap();
        assert_eq!(
            result.settings()[0].value(),
            &json!(bin.join("tool").to_str().unwrap())
        );
        assert_eq!(result.settings()[0].group(), "tools");
        assert!(!result.has_errors());
    }

    #[test]
    fn missing_executable_is_an_error_unless_optional() {
        let temp = TempDir::new().unwrap();
        let dirs = json!([temp.path().to_str().unwrap()]);

        let result = check(json!({"paths": dirs.clone()}))
            .run(&CheckContext::default())
            .unwrap();
        assert!(result.has_errors());
        assert!(result.settings().is_empty());

        let result = check(json!({"paths": dirs, "required": false}))
            .run(&CheckContext::default())
            .unwrap();
        assert!(!result.has_errors());
    }

    #[test]
    fn stale_cached_path_is_rechecked() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        create_fake_binary(&bin.join("tool"));

        let mut cache = Cache::default();
        cache.add(
            Setting::new("tool", "/nonexistent/tool")
                .unwrap()
                .with_group("tools"),
        );
        let ctx = CheckContext::new(Some(&cache));

        let result = check(json!({"paths": [bin.to_str().unwrap()]}))
            .run(&ctx)
            .unwrap();
        assert_eq!(
            result.settings()[0].value(),
            &json!(bin.join("tool").to_str().unwrap())
        );
    }

    #[test]
    fn valid_cached_path_is_reused() {
        let temp = TempDir::new().unwrap();
        let cached = temp.path().join("cached").join("tool");
        create_fake_binary(&cached);

        let mut cache = Cache::default();
        cache.add(
            Setting::new("tool", cached.to_str().unwrap())
                .unwrap()
                .with_group("tools"),
        );
        let ctx = CheckContext::new(Some(&cache));

        let result = check(json!({"paths": []})).run(&ctx).unwrap();
        assert_eq!(result.settings()[0].value(), &json!(cached.to_str().unwrap()));
    }
}
