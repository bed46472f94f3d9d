//! Configuration: the main `dotplate.toml` and an optional host-local file.
//!
//! ```toml
//! [core]
//! src = "templates"        # default: the config file's directory
//! dest = "~"
//! local-config = "~/.config/dotplate/local.toml"
//! backup-ext = ".dotplate.bak"
//!
//! [jinja]
//! variable-start-string = "<<"
//! variable-end-string = ">>"
//!
//! [suites.vim]
//! files = [".vimrc", ".vim/colors/mine.vim"]
//! enabled = true
//!
//! [vars]
//! email = "me@example.com"
//! ```
pub mod jinja;
pub mod local;
pub mod toml_loader;

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::suites::SuiteSet;

pub use jinja::JinjaConfig;
pub use local::{EnabledSuites, LocalConfig};

/// Name of the config file looked up in the current directory.
pub const DEFAULT_CONFIG_PATH: &str = "dotplate.toml";

/// Default suffix appended to a destination file's name for its backup.
pub const DEFAULT_BACKUP_EXT: &str = ".dotplate.bak";

/// The fully loaded main configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// The `[core]` table.
    pub core: CoreConfig,
    /// The `[jinja]` table.
    #[serde(default)]
    pub jinja: JinjaConfig,
    /// The `[suites.*]` tables, keyed by suite name.
    #[serde(default)]
    pub suites: BTreeMap<String, SuiteConfig>,
    /// User variables exposed to templates.
    #[serde(default)]
    pub vars: Map<String, Value>,
    /// Path of the config file relative to `core.src`, when it lives there.
    #[serde(skip)]
    pub exclude_path: Option<String>,
}

/// The `[core]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CoreConfig {
    /// Root of the template tree.
    #[serde(default = "default_src")]
    pub src: PathBuf,
    /// Root of the destination tree.
    pub dest: PathBuf,
    /// Host-local config file loaded when present.
    pub local_config: Option<PathBuf>,
    /// Suffix for backup copies of overwritten files.
    #[serde(default = "default_backup_ext")]
    pub backup_ext: String,
}

fn default_src() -> PathBuf {
    PathBuf::from(".")
}

fn default_backup_ext() -> String {
    DEFAULT_BACKUP_EXT.to_string()
}

/// A `[suites.<name>]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SuiteConfig {
    /// Template identifiers belonging to the suite.
    pub files: Vec<String>,
    /// Whether the suite is enabled by default.
    #[serde(default)]
    pub enabled: bool,
}

impl Config {
    /// Load the main config file.
    ///
    /// Paths are `~`-expanded and then resolved relative to the directory
    /// containing the file.  If the file itself lives inside the source
    /// tree, its relative path is recorded in
    /// [`exclude_path`](Self::exclude_path) so it is never treated as a
    /// template.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if
    /// `core.backup-ext` is empty.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut cfg: Self = toml_loader::load_config(path)?;
        if cfg.core.backup_ext.is_empty() {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                message: "core.backup-ext must not be empty".to_string(),
            });
        }
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        cfg.core.resolve_paths_relative_to(base);
        cfg.exclude_path = relative_to_src(path, &cfg.core.src);
        Ok(cfg)
    }

    /// Layer a local config over this one.
    ///
    /// A list of enabled suites replaces every suite's setting; a table only
    /// touches the suites it names.  Unknown suite names are ignored.
    pub fn merge_local_config(&mut self, local: LocalConfig) {
        if let Some(dest) = local.local.dest {
            self.core.dest = dest;
        }
        match local.local.enabled_suites {
            Some(EnabledSuites::List(names)) => {
                let names: BTreeSet<String> = names.into_iter().collect();
                for (name, suite) in &mut self.suites {
                    suite.enabled = names.contains(name);
                }
            }
            Some(EnabledSuites::Table(table)) => {
                self.apply_suite_directives(table);
            }
            None => {}
        }
        self.vars.extend(local.vars);
    }

    /// Load and merge the file named by `core.local-config`, if it is set
    /// and exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_local_config(&mut self) -> Result<(), ConfigError> {
        let Some(path) = self.core.local_config.clone() else {
            return Ok(());
        };
        match LocalConfig::from_optional_file(&path)? {
            Some(local) => {
                tracing::debug!("merging local config {}", path.display());
                self.merge_local_config(local);
            }
            None => tracing::debug!("local config {} does not exist", path.display()),
        }
        Ok(())
    }

    /// Enable or disable suites in order; a later directive for the same
    /// suite wins.  Unknown suite names are ignored.
    pub fn apply_suite_directives<I, S>(&mut self, directives: I)
    where
        I: IntoIterator<Item = (S, bool)>,
        S: AsRef<str>,
    {
        for (name, enable) in directives {
            match self.suites.get_mut(name.as_ref()) {
                Some(suite) => suite.enabled = enable,
                None => tracing::debug!("ignoring unknown suite {:?}", name.as_ref()),
            }
        }
    }

    /// Names of the suites currently enabled.
    #[must_use]
    pub fn default_suites(&self) -> BTreeSet<String> {
        self.suites
            .iter()
            .filter(|(_, suite)| suite.enabled)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Invert `suite -> files` into `file -> suites`.
    #[must_use]
    pub fn paths_to_suites(&self) -> BTreeMap<String, SuiteSet> {
        let mut mapping: BTreeMap<String, SuiteSet> = BTreeMap::new();
        for (name, suite) in &self.suites {
            for file in &suite.files {
                mapping.entry(file.clone()).or_default().insert(name.clone());
            }
        }
        mapping
    }
}

impl CoreConfig {
    /// Expand `~` and resolve relative paths against `base`.
    pub fn resolve_paths_relative_to(&mut self, base: &Path) {
        self.src = base.join(toml_loader::expand_path(&self.src));
        self.dest = base.join(toml_loader::expand_path(&self.dest));
        if let Some(local) = &self.local_config {
            self.local_config = Some(base.join(toml_loader::expand_path(local)));
        }
    }
}

/// Forward-slash path of `file` relative to `src`, if it lies inside it.
fn relative_to_src(file: &Path, src: &Path) -> Option<String> {
    let file = dunce::canonicalize(file).ok()?;
    let src = dunce::canonicalize(src).ok()?;
    let rel = file.strip_prefix(&src).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}
