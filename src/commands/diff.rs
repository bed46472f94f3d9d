//! `diff` subcommand.
use anyhow::Result;
use std::io::Write;

use crate::cli::GlobalOpts;
use crate::logging::Logger;

/// Run the diff command: print the delta of every template that would
/// change on install.
///
/// # Errors
///
/// Returns an error if a template cannot be rendered or its destination
/// cannot be read.
pub fn run(global: &GlobalOpts, templates: &[String], log: &Logger, out: &mut impl Write) -> Result<()> {
    let dotplate = super::setup(global, log)?;
    for rendered in dotplate.render_all(super::selection(templates))? {
        let diff = rendered.diff()?;
        if diff.has_changes() {
            log.debug(&format!("{}: {:?}, {:?}", rendered.template(), diff.state, diff.xbit_diff));
            write!(out, "{}", diff.delta)?;
        }
    }
    Ok(())
}
