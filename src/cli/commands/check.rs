//! Check command implementation.
//!
//! The `environaut check` command runs the configured checks, prints their
//! messages, caches fresh settings and exports them.

use std::path::{Path, PathBuf};

use crate::cli::args::CheckArgs;
use crate::config::Config;
use crate::error::Result;
use crate::export::{Export, STATUS_FAILED};
use crate::registry::{check_registry, formatter_registry};
use crate::report::{GroupFilter, Report};
use crate::runner::{ensure_default_implementors, RunOptions, Runner};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::load_config;

/// The check command implementation.
pub struct CheckCommand {
    working_dir: PathBuf,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(working_dir: &Path, args: CheckArgs) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
            args,
        }
    }

    fn run_options(&self) -> RunOptions {
        let resolve = |path: &Option<PathBuf>| path.as_ref().map(|p| self.working_dir.join(p));
        RunOptions {
            use_cache: !self.args.no_cache,
            cache_location: resolve(&self.args.cache_location),
            read_cache_location: resolve(&self.args.read_cache_location),
            write_cache_location: resolve(&self.args.write_cache_location),
            working_dir: Some(self.working_dir.clone()),
            groups: GroupFilter::from_names(&self.args.groups),
        }
    }

    fn show_intro(&self, config: &Config, ui: &mut dyn UserInterface) {
        ui.show_header(config.name().unwrap_or("Environaut"));
        if let Some(intro) = config.introduction() {
            ui.message(intro);
        }
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_config(&self.working_dir, &self.args.config)?;
        let checks = check_registry();
        let formatters = formatter_registry();

        let options = self.run_options();
        let runner = Runner::new(&config, &checks);

        // Configuration mistakes abort before anything is printed or written.
        ensure_default_implementors(&config)?;
        runner.build_checks(&options.groups)?;
        let export = Export::from_config(&config, &formatters)?;

        self.show_intro(&config, ui);
        let outcome = runner.run(&options)?;
        show_messages(&outcome.report, ui);

        if let Some(path) = &outcome.cache_path {
            ui.message(&format!("Cached settings in {}", path.display()));
        }

        let mut failed_exports = 0;
        for status in export.run(&outcome.report)? {
            if status.ends_with(STATUS_FAILED) {
                failed_exports += 1;
                ui.error(&status);
            } else {
                ui.success(&status);
            }
        }

        tracing::debug!("Run finished in {:?}", outcome.duration);

        if outcome.report.has_errors() {
            ui.error("Some checks failed");
            Ok(CommandResult::failure(1))
        } else if failed_exports > 0 {
            Ok(CommandResult::failure(1))
        } else {
            ui.success(&format!(
                "{} checks passed",
                outcome.report.results().len()
            ));
            Ok(CommandResult::success())
        }
    }
}

fn show_messages(report: &Report, ui: &mut dyn UserInterface) {
    for result in report.results() {
        for message in result.messages() {
            ui.check_message(message);
        }
    }
}
