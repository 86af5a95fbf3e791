mod input;
mod term_panel;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lightcycles_core::config::GameConfig;
use lightcycles_core::player::Body;
use lightcycles_core::round::RoundController;

use crate::input::{KeyboardInput, RawModeGuard};
use crate::term_panel::TerminalPanel;

/// Two-player light cycle game on a simulated LED matrix.
#[derive(Parser, Debug)]
#[command(name = "lightcycles", version)]
struct Args {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the 5x5 sprite body instead of the single-point marker.
    #[arg(long)]
    sprite: bool,

    /// Milliseconds between movement steps.
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Rows on a single matrix panel.
    #[arg(long)]
    panel_rows: Option<i32>,

    /// Columns on a single matrix panel.
    #[arg(long)]
    panel_cols: Option<i32>,
}

fn main() -> Result<()> {
    // Logs go to stderr so they can be redirected away from the game screen.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = GameConfig::load(args.config.as_deref());
    if args.sprite {
        config.body = Body::Sprite;
    }
    if let Some(ms) = args.tick_ms {
        config.tick_interval_ms = ms;
    }
    if let Some(rows) = args.panel_rows {
        config.panel_rows = rows;
    }
    if let Some(cols) = args.panel_cols {
        config.panel_cols = cols;
    }

    tracing::info!(
        width = config.width(),
        height = config.height(),
        body = ?config.body,
        tick_ms = config.tick_interval_ms,
        "starting lightcycles"
    );

    let _raw = RawModeGuard::acquire()?;
    let mut panel = TerminalPanel::new(config.width(), config.height())?;
    let mut input = KeyboardInput::new();
    RoundController::new(config).run(&mut input, &mut panel);
    Ok(())
}
