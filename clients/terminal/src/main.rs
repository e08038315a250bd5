//! Terminal frontend: play rebound against the computer in a terminal window.

mod app;
mod audio;
mod event;
mod input;
mod ui;

use app::{App, AppOptions};
use clap::Parser;
use color_eyre::eyre::WrapErr;
use ratatui::style::Color;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use ui::{parse_hex_color, Palette};

/// Play rebound in the terminal
#[derive(Parser, Debug)]
#[command(name = "terminal-client", version, about)]
struct Cli {
    /// Seed for the serve directions; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Start with sound muted
    #[arg(long)]
    mute: bool,

    /// Foreground colour as RRGGBB hex
    #[arg(short = 'c', long, value_parser = parse_hex_color)]
    fg: Option<Color>,

    /// Background colour as RRGGBB hex
    #[arg(short = 'C', long, value_parser = parse_hex_color)]
    bg: Option<Color>,

    /// Where to write logs; the terminal itself is taken by the game
    #[arg(long, default_value = "rebound.log")]
    log_file: PathBuf,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let log_file = std::fs::File::create(&cli.log_file)
        .wrap_err_with(|| format!("failed to create log file {}", cli.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let options = AppOptions {
        seed: cli.seed,
        muted: cli.mute,
        palette: Palette {
            fg: cli.fg,
            bg: cli.bg,
        },
    };

    let terminal = ratatui::init();
    let result = App::new(terminal, options).map(App::run);
    ratatui::restore();

    let stats = result?;
    if let Some(summary) = stats.play_time_summary() {
        println!("\nYou {summary}\n");
    }
    Ok(())
}
