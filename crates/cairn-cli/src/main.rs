//! `cairn`: allocate from a fixed-size arena, interactively.

use std::io;

use anyhow::{Context, Result};
use cairn::prelude::*;
use cairn_cli::logging::init_tracing;
use cairn_cli::{ExitReason, Session, SessionConfig};
use clap::Parser;

/// Carve aligned regions out of a fixed-size arena from the terminal.
#[derive(Parser)]
#[command(name = "cairn")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Arena capacity in bytes
    #[arg(short, long, default_value_t = ArenaConfig::DEFAULT_CAPACITY)]
    capacity: usize,

    /// Alignment applied to every allocation (power of two)
    #[arg(short, long, default_value_t = ArenaConfig::DEFAULT_ALIGN)]
    alignment: usize,

    /// Consecutive out-of-memory failures before offering a reset
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    reset_after: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let mut arena = Arena::new(cli.capacity).context("failed to create memory arena")?;

    let config = SessionConfig {
        alignment: cli.alignment,
        reset_after: cli.reset_after,
    };
    let summary = {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut session = Session::new(stdin.lock(), stdout.lock(), config)?;
        session.run(&mut arena)?
    };

    let stats = arena.destroy();
    if summary.exit == ExitReason::InputClosed {
        println!();
    }
    println!(
        "{} allocations, {} failures, {} resets; high water {} of {} bytes.",
        summary.allocations, summary.failures, summary.resets, stats.high_water, stats.capacity
    );
    Ok(())
}
