use anyhow::Result;
use clap::Parser;
use minefield_core as game;
use std::io;
use std::path::PathBuf;

mod command;
mod session;
mod settings;

/// Play minesweeper in the terminal.
///
/// Commands are read from stdin, one per line: `r ROW COL` reveals a cell,
/// `f ROW COL` toggles a flag and `q` quits.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Number of board rows
    #[arg(long)]
    rows: Option<game::Coord>,

    /// Number of board columns
    #[arg(long)]
    cols: Option<game::Coord>,

    /// Number of mines
    #[arg(short, long)]
    mines: Option<game::CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// TOML file with `size = [rows, cols]` and `mines = n`
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(io::stderr)
        .init();

    let base = args.config.as_deref().map(settings::load).transpose()?;
    let config = settings::resolve(base, args.rows, args.cols, args.mines)?;

    let generator = match args.seed {
        Some(seed) => game::RandomMinefieldGenerator::new(seed),
        None => game::RandomMinefieldGenerator::from_entropy(),
    };
    log::info!(
        "Starting {}x{} game with {} mines, seed {}",
        config.rows(),
        config.cols(),
        config.mines(),
        generator.seed()
    );

    let engine = game::BoardEngine::from_config(config, generator);
    let outcome = session::run(engine, io::stdin().lock(), io::stdout().lock())?;
    log::debug!("Session finished: {outcome:?}");

    Ok(())
}
