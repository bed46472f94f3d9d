//! `install` subcommand.
use anyhow::Result;
use std::io::{BufRead, Write};

use crate::cli::{GlobalOpts, InstallOpts};
use crate::logging::{FileStatus, Logger};
use crate::prompt::{self, PromptAction};
use crate::resources::ResourceChange;

/// Run the install command.
///
/// Everything is rendered before anything is written.  With `--yes` every
/// changed file is installed without asking; otherwise each one is
/// confirmed through `input` and `output`.  The first failure stops the
/// run; files installed before it stay installed.
///
/// # Errors
///
/// Returns an error if setup, rendering, prompting, or installation fails.
pub fn run<R: BufRead, W: Write>(
    global: &GlobalOpts,
    opts: &InstallOpts,
    log: &Logger,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    let dotplate = super::setup(global, log)?;
    let templates = super::selection(&opts.templates);

    log.stage(&format!("Installing into {}", dotplate.dest().display()));
    let mut install_all = opts.yes;
    for rendered in dotplate.render_all(templates)? {
        let template = rendered.template();
        if !rendered.diff()?.has_changes() {
            log.record_file(template, FileStatus::Unchanged, None);
            continue;
        }
        if !install_all {
            match prompt::install_prompt(&rendered, input, output)? {
                PromptAction::Yes => {}
                PromptAction::All => install_all = true,
                PromptAction::No => {
                    log.record_file(template, FileStatus::Skipped, Some("declined"));
                    continue;
                }
                PromptAction::Quit => {
                    log.warn("stopped at user request, remaining files not installed");
                    break;
                }
            }
        }
        match rendered.install() {
            Ok(change) => log.record_file(template, status_of(change), None),
            Err(e) => {
                log.error(&format!("{template}: {e:#}"));
                log.record_file(template, FileStatus::Failed, Some(&format!("{e:#}")));
                log.print_summary();
                return Err(e.context(format!("installing {template}")));
            }
        }
    }

    log.print_summary();
    Ok(())
}

const fn status_of(change: ResourceChange) -> FileStatus {
    match change {
        ResourceChange::Applied => FileStatus::Installed,
        ResourceChange::AlreadyCorrect => FileStatus::Unchanged,
    }
}
