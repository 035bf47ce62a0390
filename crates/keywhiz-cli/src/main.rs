//! Keywhiz CLI
//!
//! Interactive command-line client. All diagnostics go to a size-rotated log
//! file under the user's home; the terminal only shows command output.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use keywhiz_core_types::SystemPlatform;
use keywhiz_logging::LoggingConfig;

mod banner;
mod commands;
mod repl;

#[derive(Debug, Parser)]
#[command(name = "keywhiz-cli")]
#[command(about = "OneOps Keywhiz CLI", long_about = None)]
struct Cli {
    /// Directory for log files (default: ~/keywhiz-cli/log)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Do not print the welcome banner
    #[arg(long)]
    no_banner: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match cli.log_dir {
        Some(dir) => LoggingConfig::new(dir),
        None => LoggingConfig::for_platform(&SystemPlatform)?,
    }
    .with_install_global(true);

    let logging =
        keywhiz_logging::init_with_config(config).context("Failed to initialize logging")?;

    if !cli.no_banner {
        println!("{}", banner::banner(&banner::PackageMetadata::current()));
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    repl::run(stdin.lock(), &mut stdout).context("Command loop failed")?;

    tracing::info!(method = "run", "Keywhiz CLI stopped");
    logging.flush();
    Ok(())
}
