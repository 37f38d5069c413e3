#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays World of Bits in a terminal.

mod input;
mod render;
mod session;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use world_of_bits_core::WELCOME_BANNER;
use world_of_bits_persistence::{FileStore, MemoryStore, Store};
use world_of_bits_world::query;

use crate::{
    input::{parse_line, Input, HELP},
    session::Session,
};

/// Walk a grid of bits, merge equal tokens and cash them in.
#[derive(Debug, Parser)]
#[command(name = "world-of-bits", version)]
struct CliArgs {
    /// Directory holding the saved session.
    #[arg(long, value_name = "DIR", default_value = ".world-of-bits")]
    save_dir: PathBuf,

    /// Keep the session in memory only; nothing is read or written on disk.
    #[arg(long)]
    memory: bool,

    /// Discard any saved session and start from a fresh world.
    #[arg(long)]
    fresh: bool,

    /// Number of cells drawn on each side of the player.
    #[arg(
        long,
        value_name = "CELLS",
        default_value_t = 3,
        value_parser = clap::value_parser!(u32).range(0..=20)
    )]
    view_radius: u32,

    /// Log filter directives; overrides `RUST_LOG`.
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,
}

/// Entry point for the World of Bits command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log.as_deref())?;

    let store = open_store(&args);
    let session = if args.fresh {
        Session::start_fresh(store)
    } else {
        Session::resume(store)
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(session, stdin.lock(), stdout.lock(), args.view_radius)
}

fn init_tracing(directives: Option<&str>) -> Result<()> {
    let filter = match directives {
        Some(directives) => {
            EnvFilter::try_new(directives).with_context(|| format!("invalid log filter '{directives}'"))?
        }
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn open_store(args: &CliArgs) -> Box<dyn Store> {
    if args.memory {
        return Box::new(MemoryStore::new());
    }
    match FileStore::new(&args.save_dir) {
        Ok(store) => {
            info!(dir = %store.base_dir().display(), "using file store");
            Box::new(store)
        }
        Err(error) => {
            warn!(%error, "save directory unavailable; session will not be persisted");
            Box::new(MemoryStore::new())
        }
    }
}

fn run(mut session: Session, input: impl BufRead, mut output: impl Write, radius: u32) -> Result<()> {
    writeln!(output, "{WELCOME_BANNER}")?;
    writeln!(output, "type 'help' for commands")?;
    draw(&session, &mut output, radius)?;

    for line in input.lines() {
        let line = line.context("failed to read input")?;
        match parse_line(&line, query::player_cell(session.world())) {
            Input::Command(command) => {
                let events = session.handle(command);
                if events.is_empty() {
                    writeln!(output, "nothing happened")?;
                    continue;
                }
                for event in &events {
                    writeln!(output, "{}", render::describe(event))?;
                }
                draw(&session, &mut output, radius)?;
            }
            Input::Look => draw(&session, &mut output, radius)?,
            Input::Help => writeln!(output, "{HELP}")?,
            Input::Quit => break,
            Input::Empty => {}
            Input::Unknown(reason) => writeln!(output, "{reason}; type 'help' for commands")?,
        }
    }
    output.flush().context("failed to flush output")?;
    Ok(())
}

fn draw(session: &Session, output: &mut impl Write, radius: u32) -> Result<()> {
    write!(output, "{}", render::map(session.world(), radius))?;
    writeln!(output, "{}", render::hud(session.world()))?;
    Ok(())
}
