use color_eyre::eyre::WrapErr;
use ratatui::crossterm::{
    event::{
        self, Event as CrosstermEvent, KeyEvent, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
};
use std::{
    io::stdout,
    sync::mpsc::{self, TryRecvError},
    thread,
    time::Duration,
};
use tracing::{debug, warn};

/// How long the reader thread blocks in one poll
const POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Terminal events the game cares about
#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    /// The reader thread stopped; no more events will arrive
    Closed,
}

/// Reads terminal events on a helper thread and hands them over a channel
pub struct EventHandler {
    receiver: mpsc::Receiver<Event>,
    /// Whether the terminal reports key releases
    keyboard_enhanced: bool,
}

impl EventHandler {
    /// Starts the reader thread; the terminal must already be in raw mode
    pub fn new() -> color_eyre::Result<Self> {
        let (sender, receiver) = mpsc::channel();

        let keyboard_enhanced = matches!(
            crossterm::terminal::supports_keyboard_enhancement(),
            Ok(true)
        );
        if keyboard_enhanced {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )?;
        }
        debug!(keyboard_enhanced, "terminal input ready");

        let actor = EventThread::new(sender);
        thread::Builder::new()
            .name("terminal-events".to_string())
            .spawn(move || {
                if let Err(e) = actor.run() {
                    warn!(error = %e, "event thread stopped");
                }
            })
            .wrap_err("failed to spawn event thread")?;

        Ok(Self {
            receiver,
            keyboard_enhanced,
        })
    }

    pub fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhanced
    }

    /// Everything received since the last call, without blocking
    pub fn drain(&self) -> Vec<Event> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    events.push(Event::Closed);
                    break;
                }
            }
        }
        events
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
    }
}

/// A thread that forwards key events until the receiving side goes away
struct EventThread {
    sender: mpsc::Sender<Event>,
}

impl EventThread {
    fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    fn run(self) -> color_eyre::Result<()> {
        loop {
            if !event::poll(POLL_TIMEOUT).wrap_err("failed to poll for crossterm events")? {
                continue;
            }

            let event = event::read().wrap_err("failed to read crossterm event")?;
            if let CrosstermEvent::Key(key) = event {
                if self.sender.send(Event::Key(key)).is_err() {
                    return Ok(());
                }
            }
        }
    }
}
