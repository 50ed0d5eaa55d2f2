//! DucaPowr - xboard chess engine
//!
//! Usage:
//!     ducapowr [--depth N] [--quotes FILE] [--debug]
//!
//! Reads xboard commands from stdin and writes replies to stdout. Logs go to
//! stderr.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, info};

use ducapowr::config::EngineConfig;
use ducapowr::engine::Engine;
use ducapowr::xboard::{XBoard, ENGINE_NAME};

#[derive(Parser, Debug)]
#[command(name = "ducapowr", version, about = "xboard chess engine")]
struct Args {
    /// Search depth in plies (overrides DUCAPOWR_DEPTH)
    #[arg(short, long)]
    depth: Option<u32>,

    /// File of resignation quotes, one per line (overrides DUCAPOWR_QUOTES)
    #[arg(short, long)]
    quotes: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level))
        .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    let mut config = EngineConfig::from_env();
    if let Some(depth) = args.depth {
        config.set_depth(depth);
    }
    if let Some(path) = args.quotes {
        config.quotes_path = Some(path);
    }
    info!("{} {} starting, depth {}", ENGINE_NAME, env!("CARGO_PKG_VERSION"), config.depth);

    let stdout = io::stdout();
    let mut xboard = XBoard::new(Engine::new(config), stdout.lock());
    if let Err(err) = xboard.run(io::stdin().lock()) {
        error!("xboard i/o failed: {}", err);
        process::exit(1);
    }
}
