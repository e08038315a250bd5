use crate::audio::BellAudio;
use crate::event::EventHandler;
use crate::input::TerminalInput;
use crate::ui::{Palette, TerminalRenderer};
use rebound_core::{Config, Driver, SessionStats, SystemClock};
use ratatui::DefaultTerminal;
use std::io::{stdout, Stdout};
use tracing::info;

/// Options picked on the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct AppOptions {
    pub seed: Option<u64>,
    pub muted: bool,
    pub palette: Palette,
}

/// Main application
pub struct App {
    driver: Driver<TerminalRenderer, TerminalInput, BellAudio<Stdout>, SystemClock>,
}

impl App {
    /// Constructs a new instance of App on an initialized terminal
    pub fn new(terminal: DefaultTerminal, options: AppOptions) -> color_eyre::Result<Self> {
        let events = EventHandler::new()?;
        let input = TerminalInput::new(events);
        info!(mode = input.mode().description(), "input mode detected");

        let config = Config {
            seed: options.seed,
            ..Config::default()
        };

        let driver = Driver::new(
            config,
            TerminalRenderer::new(terminal, options.palette),
            input,
            BellAudio::new(stdout(), options.muted),
            SystemClock::new(),
        );

        Ok(Self { driver })
    }

    /// Run the game loop until the player quits
    pub fn run(mut self) -> SessionStats {
        self.driver.run()
    }
}
