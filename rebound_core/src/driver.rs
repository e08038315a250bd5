//! Fixed-tick game loop wiring the session to its services.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::hud::Hud;
use crate::services::{AudioSink, Clock, InputSource, Renderer};
use crate::session::MatchSession;
use crate::types::*;

/// Whether the loop keeps going after a tick
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Counters collected over a run
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SessionStats {
    pub ticks: u64,
    pub points: u32,
    pub bounces: u32,
    pub matches_completed: u32,
    pub wins: [u32; 2],
    pub elapsed: Duration,
}

impl SessionStats {
    fn record(&mut self, event: &Event) {
        match event {
            Event::Bounce => self.bounces += 1,
            Event::Scored { .. } => self.points += 1,
            Event::GameOver { winner, .. } => {
                self.matches_completed += 1;
                self.wins[winner.index()] += 1;
            }
            _ => {}
        }
    }

    /// "played for 2 minutes and 5 seconds"; `None` under one second
    pub fn play_time_summary(&self) -> Option<String> {
        let total = self.elapsed.as_secs();
        if total == 0 {
            return None;
        }

        let plural = |n: u64, unit: &str| {
            if n == 1 {
                format!("{n} {unit}")
            } else {
                format!("{n} {unit}s")
            }
        };

        let (minutes, seconds) = (total / 60, total % 60);
        let text = match (minutes, seconds) {
            (0, s) => plural(s, "second"),
            (m, 0) => plural(m, "minute"),
            (m, s) => format!("{} and {}", plural(m, "minute"), plural(s, "second")),
        };

        Some(format!("played for {text}"))
    }
}

/// Owns one [`MatchSession`] and the services it talks to
pub struct Driver<R, I, A, C> {
    session: MatchSession,
    hud: Hud,
    renderer: R,
    input: I,
    audio: A,
    clock: C,
    tick_interval: Duration,
    started_at: Duration,
    stats: SessionStats,
}

impl<R, I, A, C> Driver<R, I, A, C>
where
    R: Renderer,
    I: InputSource,
    A: AudioSink,
    C: Clock,
{
    pub fn new(config: Config, renderer: R, input: I, audio: A, clock: C) -> Self {
        let hud = Hud::new(&renderer);
        let started_at = clock.now();

        Driver {
            session: MatchSession::new(config),
            hud,
            renderer,
            input,
            audio,
            clock,
            tick_interval: config.tick_interval,
            started_at,
            stats: SessionStats::default(),
        }
    }

    pub fn session(&self) -> &MatchSession {
        &self.session
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Stats so far, with `elapsed` measured up to now
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            elapsed: self.clock.now().saturating_sub(self.started_at),
            ..self.stats
        }
    }

    /// Run one tick: input, simulation, audio, display, draw
    pub fn tick(&mut self) -> Flow {
        let controls = match self.input.poll() {
            Ok(controls) => controls,
            Err(err) => {
                warn!(error = %err, "input poll failed");
                Controls::default()
            }
        };

        self.apply_audio_controls(&controls);

        let now = self.clock.now();
        let events = self.session.step(now, &controls);
        self.stats.ticks += 1;

        for event in &events {
            self.stats.record(event);

            if let Some(sound) = event.sound() {
                if let Err(err) = self.audio.play(sound) {
                    debug!(error = %err, ?sound, "sound dropped");
                }
            }

            self.hud.apply(event, &self.renderer);
        }

        self.render();

        if controls.quit {
            info!(ticks = self.stats.ticks, "quit requested");
            Flow::Quit
        } else {
            Flow::Continue
        }
    }

    /// Wait one tick interval on the driver's clock
    pub fn sleep_tick(&mut self) {
        self.clock.sleep(self.tick_interval);
    }

    fn apply_audio_controls(&mut self, controls: &Controls) {
        if controls.mute {
            let muted = self.audio.toggle_mute();
            info!(muted, "audio mute toggled");
        }
        if controls.volume_up {
            let percent = self.audio.volume_up();
            debug!(percent, "volume up");
        }
        if controls.volume_down {
            let percent = self.audio.volume_down();
            debug!(percent, "volume down");
        }
    }

    /// Draws every sprite and presents the frame; failures are only logged
    fn render(&mut self) {
        let show_winner = self.session.showing_winner();
        let sprites = self
            .session
            .sprites()
            .into_iter()
            .chain(self.hud.sprites(show_winner));

        for sprite in sprites {
            if let Err(err) = self.renderer.draw(&sprite) {
                warn!(error = %err, kind = ?sprite.kind, "sprite not drawn");
            }
        }

        if let Err(err) = self.renderer.present() {
            warn!(error = %err, "frame not presented");
        }
    }

    /// Tick until quit; sleeps `tick_interval` between ticks, not after the last one
    pub fn run(&mut self) -> SessionStats {
        info!(
            tick_ms = self.tick_interval.as_millis() as u64,
            "session started"
        );

        while self.tick() == Flow::Continue {
            self.sleep_tick();
        }

        let stats = self.stats();
        info!(
            ticks = stats.ticks,
            points = stats.points,
            matches = stats.matches_completed,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "session stopped"
        );
        stats
    }

    /// Like [`Driver::run`] but also stops after `max_ticks`
    pub fn run_for(&mut self, max_ticks: u64) -> SessionStats {
        while self.stats.ticks < max_ticks {
            if self.tick() == Flow::Quit {
                break;
            }
            if self.stats.ticks < max_ticks {
                self.sleep_tick();
            }
        }

        let stats = self.stats();
        info!(ticks = stats.ticks, max_ticks, "tick budget reached or quit");
        stats
    }

    /// Hand the services back, dropping the session
    pub fn into_parts(self) -> (R, I, A, C) {
        (self.renderer, self.input, self.audio, self.clock)
    }
}
