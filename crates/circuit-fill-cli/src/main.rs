//! circuit-fill - CLI for circuit trace pattern generation
//!
//! Usage:
//!   circuit-fill fill <region.svg|region.png> [OPTIONS]   Fill a region with traces
//!   circuit-fill defaults                                  Print default options as YAML
//!
//! Logs go to stderr (`RUST_LOG` filters them); stdout only ever carries the
//! generated document, so it can be piped.

mod cli;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use cli::{FillArgs, cmd_defaults, cmd_fill};

#[derive(Parser)]
#[command(
    name = "circuit-fill",
    author,
    version,
    about = "Fill regions with circuit-board trace patterns",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a trace pattern inside a region
    Fill(FillArgs),
    /// Print the default generation options as YAML
    Defaults,
}

fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("warning: logging disabled: {e}");
    }

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Fill(args) => cmd_fill(args),
        Command::Defaults => cmd_defaults(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Install the tracing subscriber: `RUST_LOG` if set, `info` otherwise,
/// written to stderr.
fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
