//! Command-line interface definition.
use clap::{ArgMatches, CommandFactory as _, FromArgMatches as _, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

/// Version reported by `--version`: the build's `git describe` when known.
pub const VERSION: &str = match option_env!("DOTPLATE_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

/// Top-level CLI entry point for the dotfile templating engine.
#[derive(Parser, Debug)]
#[command(
    name = "dotplate",
    about = "Render dotfile templates into your home directory",
    version = VERSION
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Path to the config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Override the destination directory
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// Path to a host-local config file
    #[arg(short, long)]
    pub local_config: Option<PathBuf>,

    /// Enable a suite (repeatable)
    #[arg(short = 's', long = "enable-suite", value_name = "SUITE")]
    pub enable_suite: Vec<String>,

    /// Disable a suite (repeatable)
    #[arg(short = 'S', long = "disable-suite", value_name = "SUITE")]
    pub disable_suite: Vec<String>,

    /// Enable (`true`) and disable (`false`) directives in command-line order.
    #[arg(skip)]
    pub suite_directives: Vec<(String, bool)>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install rendered templates into the destination
    Install(InstallOpts),
    /// Show what installing would change
    Diff {
        /// Templates to compare (default: all active)
        templates: Vec<String>,
    },
    /// List active templates
    List,
    /// Print a rendered template
    Render {
        /// Template to render
        template: String,
    },
}

impl Command {
    /// Name used for the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::Diff { .. } => "diff",
            Self::List => "list",
            Self::Render { .. } => "render",
        }
    }
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct InstallOpts {
    /// Install without prompting
    #[arg(short, long)]
    pub yes: bool,

    /// Templates to install (default: all active)
    pub templates: Vec<String>,
}

impl Cli {
    /// Parse `std::env::args_os`, exiting on error.
    #[must_use]
    pub fn parse_ordered() -> Self {
        match Self::try_parse_ordered_from(std::env::args_os()) {
            Ok(cli) => cli,
            Err(e) => e.exit(),
        }
    }

    /// Parse `args`, recording suite directives in the order given.
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments (including `--help` and
    /// `--version`).
    pub fn try_parse_ordered_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(args)?;
        let mut cli = Self::from_arg_matches(&matches)?;
        cli.global.suite_directives = suite_directives(&matches);
        Ok(cli)
    }
}

/// Merge `--enable-suite` and `--disable-suite` by position.
fn suite_directives(matches: &ArgMatches) -> Vec<(String, bool)> {
    let mut indexed: Vec<(usize, String, bool)> = Vec::new();
    for (id, enable) in [("enable_suite", true), ("disable_suite", false)] {
        if let (Some(indices), Some(values)) =
            (matches.indices_of(id), matches.get_many::<String>(id))
        {
            indexed.extend(
                indices
                    .zip(values)
                    .map(|(index, name)| (index, name.clone(), enable)),
            );
        }
    }
    indexed.sort_by_key(|(index, _, _)| *index);
    indexed
        .into_iter()
        .map(|(_, name, enable)| (name, enable))
        .collect()
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::unreachable
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_ordered_from(args).unwrap()
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_defaults() {
        let cli = parse(&["dotplate", "list"]);
        assert_eq!(cli.global.config, PathBuf::from("dotplate.toml"));
        assert_eq!(cli.global.dest, None);
        assert_eq!(cli.global.local_config, None);
        assert!(cli.global.suite_directives.is_empty());
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Command::List));
    }

    #[test]
    fn parse_global_paths() {
        let cli = parse(&[
            "dotplate", "-c", "conf.toml", "-d", "/tmp/home", "-l", "local.toml", "list",
        ]);
        assert_eq!(cli.global.config, PathBuf::from("conf.toml"));
        assert_eq!(cli.global.dest, Some(PathBuf::from("/tmp/home")));
        assert_eq!(cli.global.local_config, Some(PathBuf::from("local.toml")));
    }

    #[test]
    fn parse_install_yes_with_templates() {
        let cli = parse(&["dotplate", "install", "--yes", ".profile", ".bashrc"]);
        let Command::Install(opts) = cli.command else {
            unreachable!("expected install");
        };
        assert!(opts.yes);
        assert_eq!(opts.templates, vec![".profile", ".bashrc"]);
    }

    #[test]
    fn parse_install_defaults_to_prompting() {
        let cli = parse(&["dotplate", "install"]);
        assert!(matches!(cli.command, Command::Install(InstallOpts { yes: false, .. })));
    }

    #[test]
    fn parse_diff_templates() {
        let cli = parse(&["dotplate", "diff", ".vimrc"]);
        let Command::Diff { templates } = cli.command else {
            unreachable!("expected diff");
        };
        assert_eq!(templates, vec![".vimrc"]);
    }

    #[test]
    fn parse_render_requires_template() {
        assert!(Cli::try_parse_ordered_from(["dotplate", "render"]).is_err());
        let cli = parse(&["dotplate", "render", ".profile"]);
        assert!(matches!(cli.command, Command::Render { template } if template == ".profile"));
    }

    #[test]
    fn suite_directives_keep_command_line_order() {
        let cli = parse(&["dotplate", "-s", "bar", "-S", "bar", "-s", "bar", "list"]);
        assert_eq!(
            cli.global.suite_directives,
            vec![
                ("bar".to_string(), true),
                ("bar".to_string(), false),
                ("bar".to_string(), true),
            ]
        );
    }

    #[test]
    fn suite_directives_interleave_long_flags() {
        let cli = parse(&[
            "dotplate",
            "--disable-suite",
            "vim",
            "--enable-suite",
            "tmux",
            "--disable-suite",
            "tmux",
            "list",
        ]);
        assert_eq!(
            cli.global.suite_directives,
            vec![
                ("vim".to_string(), false),
                ("tmux".to_string(), true),
                ("tmux".to_string(), false),
            ]
        );
    }

    #[test]
    fn parse_verbose_after_subcommand() {
        let cli = parse(&["dotplate", "list", "-v"]);
        assert!(cli.verbose);
    }

    #[test]
    fn command_names() {
        assert_eq!(parse(&["dotplate", "install"]).command.name(), "install");
        assert_eq!(parse(&["dotplate", "diff"]).command.name(), "diff");
        assert_eq!(parse(&["dotplate", "list"]).command.name(), "list");
        assert_eq!(parse(&["dotplate", "render", "x"]).command.name(), "render");
    }

    #[test]
    fn version_flag_is_reported() {
        let err = Cli::try_parse_ordered_from(["dotplate", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
