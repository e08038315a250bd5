use crate::event::{Event, EventHandler};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rebound_core::{Controls, InputSource, ServiceError};
use tracing::warn;

/// Ticks a movement key stays held after a press without release reporting
const LATCH_TICKS: u8 = 8;

/// Game key mapping for cleaner input handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameKey {
    Up,
    Down,
    Restart,
    Pause,
    Mute,
    VolumeDown,
    VolumeUp,
    Quit,
}

fn map_key_event(event: &KeyEvent) -> Option<GameKey> {
    match event.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(GameKey::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(GameKey::Down),
        KeyCode::F(2) | KeyCode::Char('r') | KeyCode::Char('R') => Some(GameKey::Restart),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(GameKey::Pause),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(GameKey::Mute),
        KeyCode::Char('9') => Some(GameKey::VolumeDown),
        KeyCode::Char('0') => Some(GameKey::VolumeUp),
        KeyCode::Char('c') | KeyCode::Char('C')
            if event.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            Some(GameKey::Quit)
        }
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(GameKey::Quit),
        _ => None,
    }
}

/// How held movement keys are tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    /// Terminal reports press and release
    Enhanced,
    /// Presses only; each press or repeat holds the key for a few ticks
    Latched,
}

impl KeyMode {
    pub fn description(&self) -> &'static str {
        match self {
            KeyMode::Enhanced => "Enhanced (hold keys)",
            KeyMode::Latched => "Latched (tap or hold keys)",
        }
    }
}

/// Turns raw key events into per-tick [`Controls`]
#[derive(Debug)]
pub struct KeyState {
    mode: KeyMode,
    up: u8,
    down: u8,
    edges: Controls,
}

impl KeyState {
    pub fn new(mode: KeyMode) -> Self {
        Self {
            mode,
            up: 0,
            down: 0,
            edges: Controls::default(),
        }
    }

    pub fn handle_key_event(&mut self, event: KeyEvent) {
        let Some(key) = map_key_event(&event) else {
            return;
        };

        let pressed = matches!(event.kind, KeyEventKind::Press | KeyEventKind::Repeat);
        let released = event.kind == KeyEventKind::Release;

        match key {
            GameKey::Up | GameKey::Down => {
                let hold = match self.mode {
                    KeyMode::Enhanced => u8::from(pressed),
                    KeyMode::Latched if pressed => LATCH_TICKS,
                    KeyMode::Latched => return,
                };
                let (this, other) = if key == GameKey::Up {
                    (&mut self.up, &mut self.down)
                } else {
                    (&mut self.down, &mut self.up)
                };
                if released || pressed {
                    *this = hold;
                }
                // A fresh press in one direction cancels a stale latch in the other
                if self.mode == KeyMode::Latched {
                    *other = 0;
                }
            }
            _ if event.kind != KeyEventKind::Press => {}
            GameKey::Restart => self.edges.restart = true,
            GameKey::Pause => self.edges.pause = true,
            GameKey::Mute => self.edges.mute = true,
            GameKey::VolumeDown => self.edges.volume_down = true,
            GameKey::VolumeUp => self.edges.volume_up = true,
            GameKey::Quit => self.edges.quit = true,
        }
    }

    /// Controls for this tick; clears edges and ages latches
    pub fn take_controls(&mut self) -> Controls {
        let controls = Controls {
            up: self.up > 0,
            down: self.down > 0,
            ..std::mem::take(&mut self.edges)
        };

        if self.mode == KeyMode::Latched {
            self.up = self.up.saturating_sub(1);
            self.down = self.down.saturating_sub(1);
        }

        controls
    }
}

/// Keyboard input read from the terminal
pub struct TerminalInput {
    events: EventHandler,
    keys: KeyState,
}

impl TerminalInput {
    pub fn new(events: EventHandler) -> Self {
        let mode = if events.keyboard_enhanced() {
            KeyMode::Enhanced
        } else {
            KeyMode::Latched
        };

        Self {
            events,
            keys: KeyState::new(mode),
        }
    }

    pub fn mode(&self) -> KeyMode {
        self.keys.mode
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> Result<Controls, ServiceError> {
        for event in self.events.drain() {
            match event {
                Event::Key(key) => self.keys.handle_key_event(key),
                Event::Closed => {
                    warn!("terminal event stream closed, quitting");
                    return Ok(Controls {
                        quit: true,
                        ..Controls::default()
                    });
                }
            }
        }

        Ok(self.keys.take_controls())
    }
}
