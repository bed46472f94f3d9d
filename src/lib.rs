//! Dotfile templating and installation engine.
//!
//! Renders a tree of Jinja-style templates into a destination directory
//! (usually `$HOME`), diffing each rendered file against what is installed
//! before writing it.  Templates can be grouped into *suites* that are
//! enabled or disabled together.
//!
//! The public API is organised into these layers:
//!
//! - **[`config`]**: parse the main and host-local TOML config files
//! - **[`discovery`]**: list the template files in the source tree (Git-aware)
//! - **[`template`]**: the template engine seam and its `minijinja` implementation
//! - **[`dotplate`]**: the orchestrator that ties discovery to rendering
//! - **[`rendered`]**: rendered files, their diffs, and installation
//! - **[`commands`]**: top-level subcommand handlers (`install`, `diff`, `list`, `render`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod discovery;
pub mod dotplate;
pub mod error;
pub mod git;
pub mod logging;
pub mod prompt;
pub mod rendered;
pub mod resources;
pub mod suites;
pub mod template;

pub use dotplate::Dotplate;
pub use error::{DotplateError, TemplateError};
pub use rendered::{Diff, DiffState, RenderedFile, XBitDiff};
pub use suites::SuiteSet;
