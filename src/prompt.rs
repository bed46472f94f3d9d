//! Interactive confirmation before installing a changed file.
use anyhow::{Context as _, Result};
use std::io::{BufRead, Write};

use crate::rendered::RenderedFile;

/// The user's answer to an install prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    /// Install this file.
    Yes,
    /// Leave this file alone.
    No,
    /// Install this file and every remaining one without asking.
    All,
    /// Stop processing; files already installed stay installed.
    Quit,
}

const CHOICES: &str = "[y]es, [n]o, [a]ll, [d]iff, [q]uit";

/// Ask whether to install `rf`, reading answers from `input`.
///
/// `d` prints the delta and asks again.  Unrecognised answers repeat the
/// question; end of input counts as quit.
///
/// # Errors
///
/// Returns an error if reading or writing the terminal fails, or if the
/// diff cannot be computed.
pub fn install_prompt<R: BufRead, W: Write>(
    rf: &RenderedFile,
    input: &mut R,
    output: &mut W,
) -> Result<PromptAction> {
    let mut line = String::new();
    loop {
        write!(output, "Install {}? {CHOICES} ", rf.dest_path().display())
            .context("write prompt")?;
        output.flush().context("flush prompt")?;

        line.clear();
        if input.read_line(&mut line).context("read answer")? == 0 {
            writeln!(output).context("write prompt")?;
            return Ok(PromptAction::Quit);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(PromptAction::Yes),
            "n" | "no" => return Ok(PromptAction::No),
            "a" | "all" => return Ok(PromptAction::All),
            "q" | "quit" => return Ok(PromptAction::Quit),
            "d" | "diff" => {
                write!(output, "{}", rf.diff()?.delta).context("write diff")?;
            }
            other => {
                writeln!(output, "Unrecognised answer {other:?}").context("write prompt")?;
            }
        }
    }
}
