//! Cache command implementation.
//!
//! Provides `environaut cache list`.

use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use crate::cache::{CacheEntry, ReadOnlyCache, SettingsCache};
use crate::error::{EnvironautError, Result};
use crate::parameters::Parameters;
use crate::report::{GroupFilter, SettingFlag};
use crate::template::value_to_string;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Shown instead of sensitive values in text output.
const MASK: &str = "********";

/// Arguments for the cache command.
#[derive(Debug, Clone, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheSubcommand,
}

/// Cache subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum CacheSubcommand {
    /// List cached settings.
    List {
        /// Cache file to read (defaults to .environaut.cache in the working directory).
        #[arg(long, value_name = "PATH")]
        location: Option<PathBuf>,
        /// Only list settings in these groups (may be repeated).
        #[arg(short, long = "group", value_name = "GROUP")]
        groups: Vec<String>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// The cache command implementation.
pub struct CacheCommand {
    working_dir: PathBuf,
    args: CacheArgs,
}

impl CacheCommand {
    /// Create a new cache command.
    pub fn new(working_dir: &Path, args: CacheArgs) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
            args,
        }
    }

    fn open(&self, location: Option<&Path>) -> Result<ReadOnlyCache> {
        let mut params = Parameters::new();
        params.set("working_dir", self.working_dir.to_string_lossy().into_owned());
        let mut cache = ReadOnlyCache::new(params);
        if let Some(location) = location {
            cache.set_location(self.working_dir.join(location))?;
        }
        Ok(cache)
    }
}

impl Command for CacheCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &self.args.command {
            CacheSubcommand::List {
                location,
                groups,
                json,
            } => {
                let cache = self.open(location.as_deref())?;
                list_cache(cache, &GroupFilter::from_names(groups), *json, ui)?;
            }
        }
        Ok(CommandResult::success())
    }
}

fn list_cache(
    mut cache: ReadOnlyCache,
    groups: &GroupFilter,
    json: bool,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    let loaded = cache.load()?;
    let settings = cache.get_all(groups, None);

    if json {
        let entries: Vec<CacheEntry> = settings.into_iter().map(CacheEntry::from).collect();
        let output =
            serde_json::to_string_pretty(&entries).map_err(|e| EnvironautError::Other(e.into()))?;
        ui.data(&output);
        return Ok(());
    }

    if !loaded {
        ui.message(&format!(
            "No cache found at {}",
            cache.read_location().display()
        ));
        return Ok(());
    }
    if settings.is_empty() {
        ui.message("Cache is empty");
        return Ok(());
    }

    ui.message(&format!(
        "{} cached settings in {}:\n",
        settings.len(),
        cache.read_location().display()
    ));
    for setting in settings {
        let value = if setting.flag().matches(SettingFlag::SENSITIVE) {
            MASK.to_string()
        } else {
            value_to_string(setting.value())
        };
        ui.message(&format!(
            "  {}.{} = {}",
            setting.group(),
            setting.name(),
            value
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Cache;
    use crate::report::Setting;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn seed_cache(temp: &TempDir) {
        let mut params = Parameters::new();
        params.set("working_dir", temp.path().to_string_lossy().into_owned());
        let mut cache = Cache::new(params);
        cache.add(Setting::new("host", "db.local").unwrap().with_group("database"));
        cache.add(
            Setting::new("token", "s3cret")
                .unwrap()
                .with_group("api")
                .with_flag(SettingFlag::SENSITIVE),
        );
        cache.save().unwrap();
    }

    fn list(location: Option<PathBuf>, groups: Vec<String>, json: bool) -> CacheArgs {
        CacheArgs {
            command: CacheSubcommand::List {
                location,
                groups,
                json,
            },
        }
    }

    #[test]
    fn lists_settings_and_masks_sensitive_values() {
        let temp = TempDir::new().unwrap();
        seed_cache(&temp);

        let mut ui = MockUI::new();
        let result = CacheCommand::new(temp.path(), list(None, Vec::new(), false))
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert!(ui.has_output("database.host = db.local"));
        assert!(ui.has_output("api.token = ********"));
        assert!(!ui.has_output("s3cret"));
    }

    #[test]
    fn filters_by_group_as_json() {
        let temp = TempDir::new().unwrap();
        seed_cache(&temp);

        let mut ui = MockUI::new();
        CacheCommand::new(temp.path(), list(None, vec!["database".into()], true))
            .execute(&mut ui)
            .unwrap();

        let entries: serde_json::Value = serde_json::from_str(&ui.data_output()[0]).unwrap();
        assert_eq!(entries.as_array().unwrap().len(), 1);
        assert_eq!(entries[0]["name"], "host");
    }

    #[test]
    fn missing_cache_is_reported() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        CacheCommand::new(temp.path(), list(None, Vec::new(), false))
            .execute(&mut ui)
            .unwrap();
        assert!(ui.has_output("No cache found"));
    }

    #[test]
    fn unreadable_explicit_location_fails() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        let result = CacheCommand::new(
            temp.path(),
            list(Some(PathBuf::from("missing.cache")), Vec::new(), false),
        )
        .execute(&mut ui);
        assert!(matches!(
            result,
            Err(EnvironautError::InvalidLocation { .. })
        ));
    }
}
