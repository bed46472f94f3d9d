//! `list` subcommand.
use anyhow::Result;
use std::io::Write;

use crate::cli::GlobalOpts;
use crate::logging::Logger;

/// Run the list command: print every active template, one per line.
///
/// # Errors
///
/// Returns an error if setup or discovery fails.
pub fn run(global: &GlobalOpts, log: &Logger, out: &mut impl Write) -> Result<()> {
    let dotplate = super::setup(global, log)?;
    for template in dotplate.templates()? {
        writeln!(out, "{template}")?;
    }
    Ok(())
}
