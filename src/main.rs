//! Command-line entry point for `dotplate`.
use anyhow::Result;
use dotplate::cli::{Cli, Command};
use dotplate::{commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse_ordered();
    logging::init_subscriber(args.verbose, args.command.name());
    let log = logging::Logger::new(args.command.name());

    let mut out = std::io::stdout().lock();
    match &args.command {
        Command::Install(opts) => commands::install::run(
            &args.global,
            opts,
            &log,
            &mut std::io::stdin().lock(),
            &mut out,
        ),
        Command::Diff { templates } => commands::diff::run(&args.global, templates, &log, &mut out),
        Command::List => commands::list::run(&args.global, &log, &mut out),
        Command::Render { template } => {
            commands::render::run(&args.global, template, &log, &mut out)
        }
    }
}
