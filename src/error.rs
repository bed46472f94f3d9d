//! Domain-specific error types for the dotplate engine.
//!
//! Internal modules return typed errors (e.g., [`TemplateError`],
//! [`ConfigError`]) while command handlers at the CLI boundary convert them
//! to [`anyhow::Error`] via the standard `?` operator.  The typed errors stay
//! reachable through [`anyhow::Error::downcast_ref`].
//!
//! Building a [`Dotplate`](crate::dotplate::Dotplate) can fail while loading
//! configuration or while setting up the engine, so those constructors
//! return [`DotplateError`].
//!
//! # Error hierarchy
//!
//! ```text
//! DotplateError
//! ├── Template(TemplateError)  unknown or inactive template identifiers
//! ├── Render(RenderError)      template engine failures
//! └── Config(ConfigError)      TOML parsing and validation
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the dotplate engine.
#[derive(Error, Debug)]
pub enum DotplateError {
    /// A template lookup failed.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The template engine failed to render a template.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// A configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised when a template identifier is looked up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The identifier is not one of the discovered templates.
    #[error("No such template: {0}")]
    NotFound(String),

    /// The template exists but none of its suites are enabled.
    #[error("Template is not active: {0}")]
    Inactive(String),
}

/// Errors raised by a [`TemplateEngine`](crate::template::TemplateEngine).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The engine has no template by this name.
    #[error("template not found by engine: {template}")]
    NotFound {
        /// Identifier that was requested.
        template: String,
    },

    /// The template failed to parse or evaluate.
    #[error("failed to render {template}: {message}")]
    Failed {
        /// Identifier of the failing template.
        template: String,
        /// Engine-provided description of the failure.
        message: String,
    },

    /// The engine could not be built from the configured options.
    #[error("invalid template environment: {0}")]
    Environment(String),
}

/// Errors that arise from loading configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("IO error reading config file {}: {source}", .path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the expected schema.
    #[error("Invalid TOML in {}: {message}", .path.display())]
    Parse {
        /// Path to the offending file.
        path: PathBuf,
        /// Parser-provided description of the problem.
        message: String,
    },

    /// The file parsed but a value is unacceptable.
    #[error("Invalid configuration in {}: {message}", .path.display())]
    Invalid {
        /// Path to the offending file.
        path: PathBuf,
        /// Human-readable explanation.
        message: String,
    },
}
