//! `render` subcommand.
use anyhow::Result;
use std::io::Write;

use crate::cli::GlobalOpts;
use crate::logging::Logger;

/// Run the render command: print the rendered text of one template.
///
/// # Errors
///
/// Returns an error if the template is unknown, inactive, or fails to render.
pub fn run(global: &GlobalOpts, template: &str, log: &Logger, out: &mut impl Write) -> Result<()> {
    let dotplate = super::setup(global, log)?;
    let rendered = dotplate.render(template, None)?;
    write!(out, "{}", rendered.content())?;
    Ok(())
}
