// Shared helpers for integration tests.
//
// Provides a temporary source tree and destination directory plus a fluent
// builder so each integration test can describe its templates and config
// without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use dotplate::cli::GlobalOpts;
use dotplate::logging::Logger;

/// An isolated source tree and destination backed by [`tempfile::TempDir`]s.
///
/// The config file lives at `<src>/dotplate.toml`, so it is part of the
/// source tree like in a typical dotfiles repository.
pub struct IntegrationTestContext {
    /// Template tree.
    pub src: tempfile::TempDir,
    /// Installation target.
    pub dest: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.src.path().join("dotplate.toml")
    }

    /// Global options pointing at this context's config, with `args` as
    /// suite directives (`+name` enables, `-name` disables).
    pub fn global(&self, directives: &[&str]) -> GlobalOpts {
        GlobalOpts {
            config: self.config_path(),
            dest: None,
            local_config: None,
            enable_suite: Vec::new(),
            disable_suite: Vec::new(),
            suite_directives: directives
                .iter()
                .map(|d| {
                    let (sign, name) = d.split_at(1);
                    (name.to_string(), sign == "+")
                })
                .collect(),
        }
    }

    /// A logger for command handlers.
    pub fn logger(&self) -> Logger {
        Logger::new("test")
    }

    /// Path of `rel` inside the destination.
    pub fn dest_path(&self, rel: &str) -> PathBuf {
        self.dest.path().join(rel)
    }

    /// Read `rel` from the destination.
    pub fn read_dest(&self, rel: &str) -> String {
        std::fs::read_to_string(self.dest_path(rel)).expect("read destination file")
    }

    /// Every file under the destination, relative and sorted.
    pub fn dest_files(&self) -> BTreeSet<String> {
        walkdir::WalkDir::new(self.dest.path())
            .min_depth(1)
            .into_iter()
            .map(|e| e.expect("walk destination"))
            .filter(|e| !e.file_type().is_dir())
            .map(|e| {
                e.path()
                    .strip_prefix(self.dest.path())
                    .expect("inside destination")
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
    config: String,
}

impl TestContextBuilder {
    /// Begin building a context whose `core.dest` is the temporary
    /// destination.
    pub fn new() -> Self {
        let ctx = IntegrationTestContext {
            src: tempfile::tempdir().expect("create src dir"),
            dest: tempfile::tempdir().expect("create dest dir"),
        };
        let config = format!("[core]\ndest = '{}'\n", ctx.dest.path().display());
        Self { ctx, config }
    }

    /// Write a template into the source tree.
    pub fn with_template(self, name: &str, content: &str) -> Self {
        write(&self.ctx.src.path().join(name), content);
        self
    }

    /// Write a template with all execute bits set.
    #[cfg(unix)]
    pub fn with_executable_template(self, name: &str, content: &str) -> Self {
        use std::os::unix::fs::PermissionsExt;
        let path = self.ctx.src.path().join(name);
        write(&path, content);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod template");
        self
    }

    /// Declare a suite.
    pub fn with_suite(mut self, name: &str, files: &[&str], enabled: bool) -> Self {
        let files: Vec<String> = files.iter().map(|f| format!("'{f}'")).collect();
        self.config.push_str(&format!(
            "\n[suites.{name}]\nfiles = [{}]\nenabled = {enabled}\n",
            files.join(", ")
        ));
        self
    }

    /// Append raw TOML to the config file.
    pub fn with_config(mut self, toml: &str) -> Self {
        self.config.push('\n');
        self.config.push_str(toml);
        self
    }

    /// Write a file directly into the destination.
    pub fn with_dest_file(self, name: &str, content: &str) -> Self {
        write(&self.ctx.dest.path().join(name), content);
        self
    }

    /// Finish building: write the config file and return the context.
    pub fn build(self) -> IntegrationTestContext {
        write(&self.ctx.config_path(), &self.config);
        self.ctx
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}
