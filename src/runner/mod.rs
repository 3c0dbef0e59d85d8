//! Sequential check execution.
//!
//! [`Runner`] turns the check definitions of a [`Config`] into a [`Report`]:
//! every check is constructed before the first one runs, so configuration
//! mistakes abort the run without side effects. Checks then run one at a
//! time and may consult settings cached by an earlier run. Fresh settings
//! are written back to the cache afterwards.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::cache::{Cache, ReadOnlyCache, SettingsCache};
use crate::checks::{Check, CheckContext};
use crate::config::Config;
use crate::error::{EnvironautError, Result};
use crate::registry::CheckRegistry;
use crate::report::{GroupFilter, Report};

/// Implementor name of the built-in report, runner, cache and export.
pub const DEFAULT_IMPLEMENTOR: &str = "default";

/// Config sections whose `class` must name a built-in implementor.
const IMPLEMENTOR_SECTIONS: &[&str] = &["report", "runner", "cache", "export"];

/// Options for a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Read cached settings and save fresh ones.
    pub use_cache: bool,
    /// Cache file for both reading and writing.
    pub cache_location: Option<PathBuf>,
    /// Cache file to read from.
    pub read_cache_location: Option<PathBuf>,
    /// Cache file to write to.
    pub write_cache_location: Option<PathBuf>,
    /// Directory holding the default cache file.
    pub working_dir: Option<PathBuf>,
    /// Only run checks in these groups.
    pub groups: GroupFilter,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            cache_location: None,
            read_cache_location: None,
            write_cache_location: None,
            working_dir: None,
            groups: GroupFilter::Any,
        }
    }
}

/// Result of a run.
#[derive(Debug)]
pub struct RunOutcome {
    pub report: Report,
    /// Where fresh settings were cached, if caching was enabled.
    pub cache_path: Option<PathBuf>,
    pub duration: Duration,
}

/// Reject implementor names other than the built-in ones.
///
/// # Errors
///
/// Returns `UnknownImplementor` naming the section and the configured class.
pub fn ensure_default_implementors(config: &Config) -> Result<()> {
    for section in IMPLEMENTOR_SECTIONS {
        match config.implementor(section) {
            None | Some(DEFAULT_IMPLEMENTOR) => {}
            Some(name) => {
                return Err(EnvironautError::UnknownImplementor {
                    kind: (*section).to_string(),
                    name: name.to_string(),
                    available: DEFAULT_IMPLEMENTOR.to_string(),
                })
            }
        }
    }
    Ok(())
}

/// Runs the configured checks.
pub struct Runner<'a> {
    config: &'a Config,
    registry: &'a CheckRegistry,
}

impl<'a> Runner<'a> {
    pub fn new(config: &'a Config, registry: &'a CheckRegistry) -> Self {
        Self { config, registry }
    }

    /// Construct every configured check in the selected groups.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error: malformed definitions or an
    /// unknown check class.
    pub fn build_checks(&self, groups: &GroupFilter) -> Result<Vec<Box<dyn Check>>> {
        self.config
            .checks()?
            .iter()
            .filter(|definition| groups.matches(&definition.group))
            .map(|definition| self.registry.create(&definition.class, definition))
            .collect()
    }

    /// Run the checks and aggregate their results.
    ///
    /// # Errors
    ///
    /// Returns configuration errors before any check runs, cache errors for
    /// a corrupt or unwritable cache and errors raised by checks.
    pub fn run(&self, options: &RunOptions) -> Result<RunOutcome> {
        let start = Instant::now();
        ensure_default_implementors(self.config)?;
        let checks = self.build_checks(&options.groups)?;

        let cached = if options.use_cache {
            Some(self.load_cache(options)?)
        } else {
            None
        };
        let ctx = CheckContext::new(cached.as_ref().map(|c| c as &dyn SettingsCache));

        let mut report = Report::new(self.config.section_parameters("report"));
        for check in &checks {
            tracing::debug!("Running check '{}'", check.name());
            let result = check.run(&ctx)?;
            tracing::info!(
                "Check '{}' finished with {} settings, {} messages",
                check.name(),
                result.settings().len(),
                result.messages().len()
            );
            report.add_result(result);
        }

        let cache_path = match &cached {
            Some(previous) => Some(self.save_cache(options, previous, &report)?),
            None => None,
        };

        Ok(RunOutcome {
            report,
            cache_path,
            duration: start.elapsed(),
        })
    }

    fn cache_parameters(&self, options: &RunOptions) -> crate::parameters::Parameters {
        let mut params = self.config.cache_parameters();
        let overrides = [
            ("location", &options.cache_location),
            ("read_location", &options.read_cache_location),
            ("write_location", &options.write_cache_location),
            ("working_dir", &options.working_dir),
        ];
        for (key, value) in overrides {
            if let Some(path) = value {
                params.set(key, path.to_string_lossy().into_owned());
            }
        }
        params
    }

    fn load_cache(&self, options: &RunOptions) -> Result<ReadOnlyCache> {
        let mut cache = ReadOnlyCache::new(self.cache_parameters(options));
        if cache.load()? {
            tracing::info!(
                "Loaded {} cached settings from {}",
                cache.all_settings().len(),
                cache.read_location().display()
            );
        }
        Ok(cache)
    }

    /// Settings of groups that did not run are carried over from `previous`;
    /// the selected groups are replaced by this run's settings.
    fn save_cache(
        &self,
        options: &RunOptions,
        previous: &ReadOnlyCache,
        report: &Report,
    ) -> Result<PathBuf> {
        let mut cache = Cache::new(self.cache_parameters(options));
        cache.add_all(
            previous
                .all_settings()
                .iter()
                .filter(|setting| !options.groups.matches(setting.group()))
                .cloned(),
        );
        cache.add_all(
            report
                .settings(&GroupFilter::Any, None)
                .into_iter()
                .cloned(),
        );
        cache.save()
    }
}
