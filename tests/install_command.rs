#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing
)]
//! Integration tests for the `install` command.
//!
//! These tests drive [`commands::install::run`] against real temporary
//! source and destination trees: suite selection from config and command
//! line flags, executable bits, backups, and the interactive prompt.

mod common;

use std::collections::BTreeSet;
use std::io::Cursor;

use common::{IntegrationTestContext, TestContextBuilder};
use dotplate::cli::InstallOpts;
use dotplate::commands;

fn install_yes(ctx: &IntegrationTestContext, directives: &[&str]) {
    let opts = InstallOpts {
        yes: true,
        templates: Vec::new(),
    };
    commands::install::run(
        &ctx.global(directives),
        &opts,
        &ctx.logger(),
        &mut std::io::empty(),
        &mut Vec::new(),
    )
    .expect("install should succeed");
}

fn install_interactive(ctx: &IntegrationTestContext, answers: &str) -> String {
    let opts = InstallOpts {
        yes: false,
        templates: Vec::new(),
    };
    let mut input = Cursor::new(answers.as_bytes().to_vec());
    let mut output = Vec::new();
    commands::install::run(&ctx.global(&[]), &opts, &ctx.logger(), &mut input, &mut output)
        .expect("install should succeed");
    String::from_utf8(output).unwrap()
}

fn files(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(ToString::to_string).collect()
}

// ---------------------------------------------------------------------------
// Basic installation
// ---------------------------------------------------------------------------

#[test]
fn installs_rendered_templates() {
    let ctx = TestContextBuilder::new()
        .with_template(".profile", "export EDITOR={{ dotplate.vars.editor }}\n")
        .with_template(".config/git/config", "[user]\n\tname = {{ dotplate.vars.name }}")
        .with_config("[vars]\neditor = 'vim'\nname = 'Alice'\n")
        .build();

    install_yes(&ctx, &[]);

    assert_eq!(ctx.dest_files(), files(&[".config/git/config", ".profile"]));
    assert_eq!(ctx.read_dest(".profile"), "export EDITOR=vim\n");
    assert_eq!(ctx.read_dest(".config/git/config"), "[user]\n\tname = Alice\n");
}

#[test]
fn config_file_in_source_tree_is_not_installed() {
    let ctx = TestContextBuilder::new()
        .with_template(".profile", "x\n")
        .build();
    install_yes(&ctx, &[]);
    assert!(!ctx.dest_path("dotplate.toml").exists());
}

#[test]
fn template_sees_its_own_identity() {
    let ctx = TestContextBuilder::new()
        .with_template("a/b.txt", "{{ dotplate.template }}")
        .build();
    install_yes(&ctx, &[]);
    assert_eq!(ctx.read_dest("a/b.txt"), "a/b.txt\n");
}

#[test]
fn existing_file_is_backed_up() {
    let ctx = TestContextBuilder::new()
        .with_template(".profile", "new\n")
        .with_dest_file(".profile", "old\n")
        .build();

    install_yes(&ctx, &[]);

    assert_eq!(ctx.read_dest(".profile"), "new\n");
    assert_eq!(ctx.read_dest(".profile.dotplate.bak"), "old\n");
}

#[test]
fn custom_backup_extension() {
    let ctx = TestContextBuilder::new()
        .with_template(".profile", "new\n")
        .with_dest_file(".profile", "old\n")
        .build();
    let config = std::fs::read_to_string(ctx.config_path()).unwrap();
    std::fs::write(
        ctx.config_path(),
        config.replace("[core]\n", "[core]\nbackup-ext = '.orig'\n"),
    )
    .unwrap();

    install_yes(&ctx, &[]);

    assert_eq!(ctx.read_dest(".profile.orig"), "old\n");
    assert!(!ctx.dest_path(".profile.dotplate.bak").exists());
}

#[test]
fn unchanged_file_is_not_backed_up() {
    let ctx = TestContextBuilder::new()
        .with_template(".profile", "same\n")
        .with_dest_file(".profile", "same\n")
        .build();
    install_yes(&ctx, &[]);
    assert_eq!(ctx.dest_files(), files(&[".profile"]));
}

#[cfg(unix)]
#[test]
fn executable_bit_follows_template() {
    use std::os::unix::fs::PermissionsExt;

    let ctx = TestContextBuilder::new()
        .with_executable_template("bin/hello", "#!/bin/sh\necho hello\n")
        .with_template(".profile", "x\n")
        .build();

    install_yes(&ctx, &[]);

    let mode = |rel: &str| {
        std::fs::metadata(ctx.dest_path(rel))
            .unwrap()
            .permissions()
            .mode()
    };
    assert_ne!(mode("bin/hello") & 0o111, 0);
    assert_eq!(mode(".profile") & 0o111, 0);
}

#[cfg(unix)]
#[test]
fn link_to_directory_in_source_is_not_a_template() {
    let ctx = TestContextBuilder::new()
        .with_template(".profile", "x\n")
        .build();
    let elsewhere = tempfile::tempdir().unwrap();
    std::fs::write(elsewhere.path().join("inner"), "inner\n").unwrap();
    std::os::unix::fs::symlink(elsewhere.path(), ctx.src.path().join("linked")).unwrap();

    install_yes(&ctx, &[]);

    assert_eq!(ctx.dest_files(), files(&[".profile"]));
}

// ---------------------------------------------------------------------------
// Suites
// ---------------------------------------------------------------------------

fn suited() -> IntegrationTestContext {
    TestContextBuilder::new()
        .with_template(".profile", "profile\n")
        .with_template(".vimrc", "set nocompatible\n")
        .with_suite("vim", &[".vimrc"], false)
        .build()
}

#[test]
fn disabled_suite_is_skipped() {
    let ctx = suited();
    install_yes(&ctx, &[]);
    assert_eq!(ctx.dest_files(), files(&[".profile"]));
}

#[test]
fn enable_suite_flag_installs_suite() {
    let ctx = suited();
    install_yes(&ctx, &["+vim"]);
    assert_eq!(ctx.dest_files(), files(&[".profile", ".vimrc"]));
}

#[test]
fn disable_suite_flag_overrides_config() {
    let ctx = TestContextBuilder::new()
        .with_template(".profile", "profile\n")
        .with_template(".vimrc", "set nocompatible\n")
        .with_suite("vim", &[".vimrc"], true)
        .build();

    install_yes(&ctx, &[]);
    assert_eq!(ctx.dest_files(), files(&[".profile", ".vimrc"]));

    let ctx = TestContextBuilder::new()
        .with_template(".profile", "profile\n")
        .with_template(".vimrc", "set nocompatible\n")
        .with_suite("vim", &[".vimrc"], true)
        .build();
    install_yes(&ctx, &["-vim"]);
    assert_eq!(ctx.dest_files(), files(&[".profile"]));
}

#[test]
fn unknown_suite_flag_is_ignored() {
    let ctx = suited();
    install_yes(&ctx, &["+emacs"]);
    assert_eq!(ctx.dest_files(), files(&[".profile"]));
}

#[test]
fn file_in_several_suites_needs_only_one_enabled() {
    let ctx = TestContextBuilder::new()
        .with_template(".shared", "shared\n")
        .with_suite("one", &[".shared"], false)
        .with_suite("two", &[".shared"], false)
        .build();
    install_yes(&ctx, &["+two"]);
    assert_eq!(ctx.dest_files(), files(&[".shared"]));
}

/// `foo` is enabled by default and `bar` is not; `base` belongs to no suite.
fn multisuite() -> IntegrationTestContext {
    TestContextBuilder::new()
        .with_template("base", "base\n")
        .with_template("foo", "foo\n")
        .with_template("bar", "bar\n")
        .with_suite("foo", &["foo"], true)
        .with_suite("bar", &["bar"], false)
        .build()
}

#[test]
fn suite_flags_apply_in_command_line_order() {
    let cases: &[(&[&str], &[&str])] = &[
        (&["+bar"], &["bar", "base", "foo"]),
        (&["+bar", "+foo"], &["bar", "base", "foo"]),
        (&["+bar", "-bar"], &["base", "foo"]),
        (&["+bar", "-bar", "+bar"], &["bar", "base", "foo"]),
        (&["-foo"], &["base"]),
        (&["-foo", "-bar"], &["base"]),
        (&["-foo", "+foo"], &["base", "foo"]),
        (&["-foo", "+foo", "-foo"], &["base"]),
        (&["+bar", "-foo"], &["bar", "base"]),
        (&["+bar", "-foo", "+foo"], &["bar", "base", "foo"]),
        (&["-foo", "+bar", "-bar"], &["base"]),
    ];
    for (directives, expected) in cases {
        let ctx = multisuite();
        install_yes(&ctx, directives);
        assert_eq!(ctx.dest_files(), files(expected), "directives {directives:?}");
    }
}

#[test]
fn local_config_enables_suites() {
    let ctx = TestContextBuilder::new()
        .with_template(".vimrc", "vim\n")
        .with_suite("vim", &[".vimrc"], false)
        .build();
    let local = tempfile::tempdir().unwrap();
    let local_path = local.path().join("local.toml");
    std::fs::write(&local_path, "[local]\nenabled-suites = ['vim']\n").unwrap();
    let config = std::fs::read_to_string(ctx.config_path()).unwrap();
    std::fs::write(
        ctx.config_path(),
        config.replace(
            "[core]\n",
            &format!("[core]\nlocal-config = '{}'\n", local_path.display()),
        ),
    )
    .unwrap();

    install_yes(&ctx, &[]);

    assert!(ctx.dest_path(".vimrc").exists());
}

// ---------------------------------------------------------------------------
// Interactive prompts
// ---------------------------------------------------------------------------

fn three_files() -> IntegrationTestContext {
    TestContextBuilder::new()
        .with_template("a", "a\n")
        .with_template("b", "b\n")
        .with_template("c", "c\n")
        .build()
}

#[test]
fn prompt_yes_and_no_per_file() {
    let ctx = three_files();
    let output = install_interactive(&ctx, "y\nn\ny\n");
    assert_eq!(ctx.dest_files(), files(&["a", "c"]));
    assert_eq!(output.matches("Install ").count(), 3);
}

#[test]
fn prompt_all_installs_remaining_without_asking() {
    let ctx = three_files();
    let output = install_interactive(&ctx, "n\na\n");
    assert_eq!(ctx.dest_files(), files(&["b", "c"]));
    assert_eq!(output.matches("Install ").count(), 2);
}

#[test]
fn prompt_quit_keeps_earlier_installs() {
    let ctx = three_files();
    install_interactive(&ctx, "y\nq\n");
    assert_eq!(ctx.dest_files(), files(&["a"]));
}

#[test]
fn prompt_end_of_input_stops() {
    let ctx = three_files();
    install_interactive(&ctx, "");
    assert!(ctx.dest_files().is_empty());
}

#[test]
fn prompt_skips_unchanged_files() {
    let ctx = TestContextBuilder::new()
        .with_template("a", "a\n")
        .with_template("b", "b\n")
        .with_dest_file("a", "a\n")
        .build();
    let output = install_interactive(&ctx, "y\n");
    assert_eq!(output.matches("Install ").count(), 1);
    assert!(output.contains(&ctx.dest_path("b").display().to_string()));
    assert_eq!(ctx.read_dest("b"), "b\n");
}

#[test]
fn prompt_diff_shows_delta() {
    let ctx = TestContextBuilder::new()
        .with_template("a", "new\n")
        .with_dest_file("a", "old\n")
        .build();
    let output = install_interactive(&ctx, "d\nn\n");
    assert!(output.contains("-old\n+new\n"), "got {output}");
    assert_eq!(ctx.read_dest("a"), "old\n");
}

// ---------------------------------------------------------------------------
// Selection and failures
// ---------------------------------------------------------------------------

#[test]
fn explicit_templates_limit_installation() {
    let ctx = three_files();
    let opts = InstallOpts {
        yes: true,
        templates: vec!["b".to_string()],
    };
    commands::install::run(
        &ctx.global(&[]),
        &opts,
        &ctx.logger(),
        &mut std::io::empty(),
        &mut Vec::new(),
    )
    .unwrap();
    assert_eq!(ctx.dest_files(), files(&["b"]));
}

#[test]
fn inactive_template_argument_fails_before_writing() {
    let ctx = suited();
    let opts = InstallOpts {
        yes: true,
        templates: vec![".profile".to_string(), ".vimrc".to_string()],
    };
    let err = commands::install::run(
        &ctx.global(&[]),
        &opts,
        &ctx.logger(),
        &mut std::io::empty(),
        &mut Vec::new(),
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains(".vimrc"));
    assert!(ctx.dest_files().is_empty());
}

#[test]
fn render_error_fails_before_writing() {
    let ctx = TestContextBuilder::new()
        .with_template("a", "fine\n")
        .with_template("b", "{{ unclosed\n")
        .build();
    let opts = InstallOpts {
        yes: true,
        templates: Vec::new(),
    };
    assert!(
        commands::install::run(
            &ctx.global(&[]),
            &opts,
            &ctx.logger(),
            &mut std::io::empty(),
            &mut Vec::new(),
        )
        .is_err()
    );
    assert!(ctx.dest_files().is_empty());
}
