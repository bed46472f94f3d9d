//! Host-specific configuration layered over the main config file.
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::toml_loader;
use crate::error::ConfigError;

/// Contents of a local config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LocalConfig {
    /// The `[local]` table.
    pub local: LocalTable,
    /// Variables merged over the main config's `[vars]`.
    #[serde(default)]
    pub vars: Map<String, Value>,
}

/// The `[local]` table of a local config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LocalTable {
    /// Replacement destination directory.
    pub dest: Option<PathBuf>,
    /// Suite enablement overrides.
    pub enabled_suites: Option<EnabledSuites>,
}

/// The two accepted shapes of `local.enabled-suites`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnabledSuites {
    /// Exactly these suites are enabled; every other suite is disabled.
    List(Vec<String>),
    /// Per-suite overrides; unlisted suites keep their setting.
    Table(BTreeMap<String, bool>),
}

impl LocalConfig {
    /// Load a local config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut cfg: Self = toml_loader::load_config(path)?;
        cfg.expand_paths();
        Ok(cfg)
    }

    /// Load a local config file, returning `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_optional_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        let cfg: Option<Self> = toml_loader::load_optional_config(path)?;
        Ok(cfg.map(|mut cfg| {
            cfg.expand_paths();
            cfg
        }))
    }

    fn expand_paths(&mut self) {
        if let Some(dest) = &self.local.dest {
            self.local.dest = Some(toml_loader::expand_path(dest));
        }
    }
}
