//! Read-eval loop over an input stream.

use std::io::{self, BufRead, Write};

use crate::commands::{self, Command, Flow};

pub const PROMPT: &str = "keywhiz> ";

/// Run commands from `input` until `exit` or end of input.
pub fn run<R: BufRead, W: Write>(input: R, out: &mut W) -> io::Result<()> {
    tracing::info!(method = "run", "Command loop started");

    write!(out, "{}", PROMPT)?;
    out.flush()?;
    for line in input.lines() {
        let line = line?;
        let command = Command::parse(&line);
        if command != Command::Empty {
            tracing::info!(method = "run", "Executing command: {}", line.trim());
        }

        if commands::execute(&command, out)? == Flow::Exit {
            return Ok(());
        }
        write!(out, "{}", PROMPT)?;
        out.flush()?;
    }

    tracing::info!(method = "run", "End of input");
    writeln!(out)
}
