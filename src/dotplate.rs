//! The orchestrator: discovery, suite filtering, rendering and installation.
use anyhow::{Context as _, Result};
use serde_json::{Map, Value, json};
use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::discovery;
use crate::error::{DotplateError, TemplateError};
use crate::rendered::RenderedFile;
use crate::resources::{ResourceChange, permissions};
use crate::suites::SuiteSet;
use crate::template::{JinjaEngine, TemplateEngine};

/// Renders the templates of a source tree into a destination tree.
///
/// Templates are discovered once, on first use, and the result is kept for
/// the lifetime of the instance.  Create a new instance to pick up changes
/// to the source tree.
pub struct Dotplate {
    src: PathBuf,
    dest: PathBuf,
    enabled_suites: BTreeSet<String>,
    suite_files: BTreeMap<String, Vec<String>>,
    suite_map: BTreeMap<String, SuiteSet>,
    vars: Map<String, Value>,
    backup_ext: String,
    exclude: Option<String>,
    engine: Box<dyn TemplateEngine>,
    discovered: OnceCell<Vec<(String, SuiteSet)>>,
}

impl fmt::Debug for Dotplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dotplate")
            .field("src", &self.src)
            .field("dest", &self.dest)
            .field("enabled_suites", &self.enabled_suites)
            .field("backup_ext", &self.backup_ext)
            .field("exclude", &self.exclude)
            .finish_non_exhaustive()
    }
}

impl Dotplate {
    /// Build an instance from a loaded config, rendering with Jinja.
    ///
    /// # Errors
    ///
    /// Returns [`DotplateError::Render`] if the `[jinja]` options are
    /// rejected by the engine.
    pub fn from_config(config: Config) -> Result<Self, DotplateError> {
        let engine = JinjaEngine::new(&config.core.src, &config.jinja)?;
        Ok(Self::with_engine(config, Box::new(engine)))
    }

    /// Load `path` (and its local config, if any) and build an instance.
    ///
    /// # Errors
    ///
    /// Returns [`DotplateError::Config`] if either config file cannot be
    /// loaded, or [`DotplateError::Render`] if the engine cannot be built.
    pub fn from_config_file(path: &Path) -> Result<Self, DotplateError> {
        let mut config = Config::from_file(path)?;
        config.load_local_config()?;
        Self::from_config(config)
    }

    /// Build an instance rendering with `engine`.
    #[must_use]
    pub fn with_engine(config: Config, engine: Box<dyn TemplateEngine>) -> Self {
        let enabled_suites = config.default_suites();
        let suite_map = config.paths_to_suites();
        let suite_files = config
            .suites
            .into_iter()
            .map(|(name, suite)| (name, suite.files))
            .collect();
        Self {
            src: config.core.src,
            dest: config.core.dest,
            enabled_suites,
            suite_files,
            suite_map,
            vars: config.vars,
            backup_ext: config.core.backup_ext,
            exclude: config.exclude_path,
            engine,
            discovered: OnceCell::new(),
        }
    }

    /// Root of the template tree.
    #[must_use]
    pub fn src(&self) -> &Path {
        &self.src
    }

    /// Root of the destination tree.
    #[must_use]
    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Names of the enabled suites.
    #[must_use]
    pub const fn enabled_suites(&self) -> &BTreeSet<String> {
        &self.enabled_suites
    }

    /// Every template under the source root with its suites, sorted.
    fn discover(&self) -> Result<&[(String, SuiteSet)]> {
        if let Some(found) = self.discovered.get() {
            return Ok(found);
        }
        let files = discovery::list_files(&self.src)
            .with_context(|| format!("listing templates in {}", self.src.display()))?;
        let found: Vec<_> = files
            .into_iter()
            .filter(|file| self.exclude.as_deref() != Some(file.as_str()))
            .map(|file| {
                let suites = self.suite_map.get(&file).cloned().unwrap_or_default();
                (file, suites)
            })
            .collect();
        tracing::debug!("discovered {} templates in {}", found.len(), self.src.display());
        Ok(self.discovered.get_or_init(|| found))
    }

    /// Identifiers of the active templates, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the source tree cannot be listed.
    pub fn templates(&self) -> Result<Vec<String>> {
        Ok(self
            .discover()?
            .iter()
            .filter(|(_, suites)| suites.is_file_active(&self.enabled_suites))
            .map(|(file, _)| file.clone())
            .collect())
    }

    /// Return whether `template` is active.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NotFound`] if no such template exists.
    pub fn is_active(&self, template: &str) -> Result<bool> {
        let found = self.discover()?;
        let index = found
            .binary_search_by(|(file, _)| file.as_str().cmp(template))
            .map_err(|_| TemplateError::NotFound(template.to_string()))?;
        Ok(found
            .get(index)
            .is_some_and(|(_, suites)| suites.is_file_active(&self.enabled_suites)))
    }

    /// Render `template`, destined for `dest_path` or `dest/<template>`.
    ///
    /// The rendered text always ends in exactly one trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NotFound`] or [`TemplateError::Inactive`]
    /// for a template that cannot be rendered, or the engine's error.
    pub fn render(&self, template: &str, dest_path: Option<&Path>) -> Result<RenderedFile> {
        if !self.is_active(template)? {
            return Err(TemplateError::Inactive(template.to_string()).into());
        }
        let dest_path = dest_path.map_or_else(|| self.dest.join(template), Path::to_path_buf);
        let context = self.context(template, &dest_path);
        let mut content = self.engine.render(template, &context)?;
        if !content.ends_with('\n') {
            content.push('\n');
        }
        let executable = permissions::is_executable(&self.src.join(template))?;
        Ok(RenderedFile::new(
            content,
            template,
            dest_path,
            executable,
            self.backup_ext.clone(),
        ))
    }

    /// Render and install a single template.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or installation fails.
    pub fn install_template(&self, template: &str, dest_path: Option<&Path>) -> Result<ResourceChange> {
        self.render(template, dest_path)?.install()
    }

    /// Render `templates`, or every active template when `None`.
    ///
    /// # Errors
    ///
    /// Returns the first rendering error.
    pub fn render_all(&self, templates: Option<&[String]>) -> Result<Vec<RenderedFile>> {
        let templates = templates.map_or_else(|| self.templates(), |t| Ok(t.to_vec()))?;
        templates.iter().map(|t| self.render(t, None)).collect()
    }

    /// Render and install `templates`, or every active template when `None`.
    ///
    /// Everything is rendered before anything is written.  The first failure
    /// aborts the run; files installed before it stay installed.
    ///
    /// # Errors
    ///
    /// Returns the first rendering or installation error.
    pub fn install(&self, templates: Option<&[String]>) -> Result<Vec<(String, ResourceChange)>> {
        let rendered = self.render_all(templates)?;
        rendered
            .iter()
            .map(|rf| -> Result<(String, ResourceChange)> {
                let change = rf
                    .install()
                    .with_context(|| format!("installing {}", rf.template()))?;
                Ok((rf.template().to_string(), change))
            })
            .collect()
    }

    /// Context passed to the engine when rendering `template`.
    ///
    /// A fresh copy of the user variables is made for every call.
    #[must_use]
    pub fn context(&self, template: &str, dest_path: &Path) -> Value {
        json!({
            "dotplate": {
                "suites": {
                    "enabled": self.enabled_suites,
                    "files": self.suite_files,
                },
                "template": template,
                "dest_path": dest_path.to_string_lossy(),
                "vars": self.vars.clone(),
            }
        })
    }
}
