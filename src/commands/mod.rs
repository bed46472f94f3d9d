//! Subcommand implementations.
//!
//! Every command starts from [`setup`], which applies configuration in
//! precedence order (main file, local file, `--dest`, suite flags) and
//! builds the [`Dotplate`].  Command output is written to a caller-supplied
//! writer so it can be captured in tests.
pub mod diff;
pub mod install;
pub mod list;
pub mod render;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::toml_loader::expand_path;
use crate::config::{Config, LocalConfig};
use crate::dotplate::Dotplate;
use crate::logging::Logger;

/// Load the configuration named by `global`, with every override applied.
///
/// # Errors
///
/// Returns an error if the config file or an explicitly named local config
/// cannot be loaded.
pub fn load_config(global: &GlobalOpts) -> Result<Config> {
    let mut config = Config::from_file(&global.config)
        .with_context(|| format!("loading {}", global.config.display()))?;

    match &global.local_config {
        Some(path) => config.merge_local_config(LocalConfig::from_file(path)?),
        None => config.load_local_config()?,
    }
    if let Some(dest) = &global.dest {
        config.core.dest = expand_path(dest);
    }
    config.apply_suite_directives(
        global
            .suite_directives
            .iter()
            .map(|(name, enable)| (name.as_str(), *enable)),
    );
    Ok(config)
}

/// Load configuration and build the orchestrator.
///
/// # Errors
///
/// Returns an error if configuration loading fails or the template engine
/// rejects the `[jinja]` options.
pub fn setup(global: &GlobalOpts, log: &Logger) -> Result<Dotplate> {
    let config = load_config(global)?;
    log.debug(&format!("src: {}", config.core.src.display()));
    log.debug(&format!("dest: {}", config.core.dest.display()));
    let dotplate = Dotplate::from_config(config)?;
    log.debug(&format!(
        "enabled suites: {}",
        dotplate
            .enabled_suites()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    ));
    Ok(dotplate)
}

/// Turn a possibly empty list of template arguments into a selection.
fn selection(templates: &[String]) -> Option<&[String]> {
    (!templates.is_empty()).then_some(templates)
}
