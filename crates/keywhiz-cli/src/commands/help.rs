//! Help command

use std::io::{self, Write};

const COMMANDS: [(&str, &str); 4] = [
    ("help, ?", "Show this help"),
    ("domains", "List auth domains and their identifiers"),
    ("domain <NAME>", "Resolve an auth domain name to its identifier"),
    ("exit", "Leave the CLI"),
];

/// Print the command summary
pub fn execute<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Commands:")?;
    for (usage, description) in COMMANDS {
        writeln!(out, "  {:<16}{}", usage, description)?;
    }
    Ok(())
}
