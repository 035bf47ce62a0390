//! Interactive commands
//!
//! One command per input line: `help`, `?`, `domains`, `domain <NAME>`, `exit`.

use std::io::{self, Write};

pub mod domain;
pub mod help;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Domains,
    Domain(Option<String>),
    Exit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Command::Empty;
        };

        match head.to_ascii_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "domains" => Command::Domains,
            "domain" => Command::Domain(words.next().map(str::to_string)),
            "exit" | "quit" => Command::Exit,
            _ => Command::Unknown(head.to_string()),
        }
    }
}

/// Whether the loop keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Execute one command, writing user-facing output to `out`.
pub fn execute<W: Write>(command: &Command, out: &mut W) -> io::Result<Flow> {
    match command {
        Command::Help => help::execute(out)?,
        Command::Domains => domain::execute_list(out)?,
        Command::Domain(name) => domain::execute_resolve(name.as_deref(), out)?,
        Command::Exit => {
            tracing::info!(method = "execute", "Exit requested");
            return Ok(Flow::Exit);
        }
        Command::Empty => {}
        Command::Unknown(name) => {
            tracing::warn!(method = "execute", "Unknown command: {}", name);
            writeln!(out, "Unknown command: {}. Type help or ? for help.", name)?;
        }
    }
    Ok(Flow::Continue)
}
