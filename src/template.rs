//! Template engine abstraction and its Jinja implementation.
//!
//! The orchestrator only sees [`TemplateEngine`], which renders a template
//! identifier against a JSON context.  [`JinjaEngine`] is the production
//! implementation, backed by `minijinja` and configured from the `[jinja]`
//! table.
use minijinja::syntax::SyntaxConfig;
use minijinja::value::{Rest, Value};
use minijinja::{AutoEscape, Environment, ErrorKind};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::JinjaConfig;
use crate::error::RenderError;

/// Renders templates by identifier.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateEngine {
    /// Render `template` against `context`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NotFound`] if the engine cannot locate the
    /// template, or [`RenderError::Failed`] if it cannot be rendered.
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, RenderError>;
}

/// A [`TemplateEngine`] loading templates from a source directory.
pub struct JinjaEngine {
    env: Environment<'static>,
    src: PathBuf,
}

impl fmt::Debug for JinjaEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JinjaEngine")
            .field("src", &self.src)
            .finish_non_exhaustive()
    }
}

impl JinjaEngine {
    /// Build an engine for the templates under `src`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Environment`] if the configured delimiters are
    /// rejected by the engine (e.g. empty or ambiguous).
    pub fn new(src: &Path, config: &JinjaConfig) -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_syntax(syntax_from(config)?);
        env.set_trim_blocks(config.trim_blocks);
        env.set_lstrip_blocks(config.lstrip_blocks);
        env.set_keep_trailing_newline(config.keep_trailing_newline);

        let escape = config.clone();
        env.set_auto_escape_callback(move |name| {
            if escape.autoescape_for(name) {
                AutoEscape::Html
            } else {
                AutoEscape::None
            }
        });

        let root = src.to_path_buf();
        let newline = config.newline_sequence;
        env.set_loader(move |name| {
            Ok(load_source(&root, name)?.map(|source| newline.apply(source)))
        });
        env.add_function("which", which);

        Ok(Self {
            env,
            src: src.to_path_buf(),
        })
    }

    /// Root directory templates are loaded from.
    #[must_use]
    pub fn src(&self) -> &Path {
        &self.src
    }
}

impl TemplateEngine for JinjaEngine {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, RenderError> {
        let failed = |e: minijinja::Error| RenderError::Failed {
            template: template.to_string(),
            message: e.to_string(),
        };
        let tmpl = self.env.get_template(template).map_err(|e| {
            if e.kind() == ErrorKind::TemplateNotFound {
                RenderError::NotFound {
                    template: template.to_string(),
                }
            } else {
                failed(e)
            }
        })?;
        let text = tmpl.render(context).map_err(failed)?;
        tracing::debug!("rendered {template} ({} bytes)", text.len());
        Ok(text)
    }
}

fn syntax_from(config: &JinjaConfig) -> Result<SyntaxConfig, RenderError> {
    let mut builder = SyntaxConfig::builder();
    builder
        .block_delimiters(
            config.block_start_string.clone(),
            config.block_end_string.clone(),
        )
        .variable_delimiters(
            config.variable_start_string.clone(),
            config.variable_end_string.clone(),
        )
        .comment_delimiters(
            config.comment_start_string.clone(),
            config.comment_end_string.clone(),
        );
    if let Some(prefix) = &config.line_statement_prefix {
        builder.line_statement_prefix(prefix.clone());
    }
    if let Some(prefix) = &config.line_comment_prefix {
        builder.line_comment_prefix(prefix.clone());
    }
    builder
        .build()
        .map_err(|e| RenderError::Environment(e.to_string()))
}

/// Read the template `name` below `root`; `None` if it does not exist.
///
/// Dot-prefixed path segments are allowed;
/// parent-directory segments are not.
fn load_source(root: &Path, name: &str) -> Result<Option<String>, minijinja::Error> {
    if name.split('/').any(|segment| segment == ".." || segment.contains('\\')) {
        return Ok(None);
    }
    let path = root.join(name);
    match std::fs::read_to_string(&path) {
        Ok(source) => Ok(Some(source)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("could not read template {}", path.display()),
        )
        .with_source(e)),
    }
}

/// `which(*cmds)`: path of the first command found on `PATH`.
fn which(cmds: Rest<String>) -> Value {
    cmds.iter()
        .find_map(|cmd| ::which::which(cmd).ok())
        .map_or(Value::UNDEFINED, |path| {
            Value::from(path.to_string_lossy().into_owned())
        })
}
