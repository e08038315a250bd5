//! Match state and the phase machine.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::ai;
use crate::ball::Ball;
use crate::collision::{self, Contact};
use crate::entity::{Drawable, Sprite, SpriteKind, Updatable};
use crate::paddle::Paddle;
use crate::types::*;

/// Points per side, `[left, right]`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Score {
    points: [u8; 2],
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, side: Side) -> u8 {
        self.points[side.index()]
    }

    pub fn points(&self) -> [u8; 2] {
        self.points
    }

    /// Add a point for `side`; returns the new value
    pub fn award(&mut self, side: Side) -> u8 {
        let value = &mut self.points[side.index()];
        *value = value.saturating_add(1);
        *value
    }

    pub fn reset(&mut self) {
        self.points = [0, 0];
    }

    /// Whether `side` has reached `limit` with at least `margin` points of lead
    pub fn has_won(&self, side: Side, limit: u8, margin: u8) -> bool {
        let own = self.get(side);
        let other = self.get(side.opposite());
        own >= limit && own >= other.saturating_add(margin)
    }
}

impl From<[u8; 2]> for Score {
    fn from(points: [u8; 2]) -> Self {
        Score { points }
    }
}

/// Render-facing summary of the session
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct View {
    pub phase: Phase,
    pub prev_phase: Phase,
    pub score: [u8; 2],
    pub paused: bool,
    pub ball: Ball,
    pub paddle_tops: [i16; 2],
}

/// One match session: ball, paddles, score and phase machine
///
/// Created by the loop driver and dropped with it. Every mutation happens
/// inside [`MatchSession::step`].
pub struct MatchSession {
    config: Config,
    phase: Phase,
    prev_phase: Phase,
    idle_until: Option<Duration>,
    first_run: bool,
    paused: bool,
    paused_at: Option<Duration>,
    scored: Option<Side>,
    ball: Ball,
    paddles: [Paddle; 2],
    score: Score,
    rng: StdRng,
}

impl MatchSession {
    pub fn new(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        MatchSession {
            config,
            phase: Phase::Pregame,
            prev_phase: Phase::Pregame,
            idle_until: None,
            first_run: true,
            paused: false,
            paused_at: None,
            scored: None,
            ball: Ball::new(),
            paddles: [Paddle::new(Side::Left), Paddle::new(Side::Right)],
            score: Score::new(),
            rng,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn prev_phase(&self) -> Phase {
        self.prev_phase
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        &self.paddles[side.index()]
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Side that scored this tick and has not been settled yet
    pub fn pending_point(&self) -> Option<Side> {
        self.scored
    }

    /// Whether the winner banner should be on screen
    pub fn showing_winner(&self) -> bool {
        self.phase == Phase::Idle && self.prev_phase == Phase::GameOver
    }

    pub fn view(&self) -> View {
        View {
            phase: self.phase,
            prev_phase: self.prev_phase,
            score: self.score.points(),
            paused: self.paused,
            ball: self.ball,
            paddle_tops: [self.paddles[0].top(), self.paddles[1].top()],
        }
    }

    /// Advance the session by one tick.
    ///
    /// Order: phase bookkeeping, player controls, opponent, then ball and
    /// collisions (only while in game). Returns what happened, in order.
    pub fn step(&mut self, now: Duration, controls: &Controls) -> Vec<Event> {
        let mut events = Vec::new();

        self.bookkeeping(now, &mut events);
        self.apply_controls(now, controls, &mut events);

        if self.paused {
            return events;
        }

        if !self.showing_winner() {
            let [player, opponent] = &mut self.paddles;
            ai::drive(self.phase, &self.ball, player, opponent);
        }

        let active = self.phase == Phase::Ingame;
        self.simulate(active, &mut events);

        events
    }

    /// Phase-entry work: idle expiry, pregame resets, settling a scored point
    fn bookkeeping(&mut self, now: Duration, events: &mut Vec<Event>) {
        match self.phase {
            Phase::Idle => {
                let expired = self.idle_until.map_or(true, |until| now >= until);
                if expired && !self.paused {
                    self.leave_idle(events);
                }
            }
            Phase::Pregame => {
                if self.first_run {
                    self.first_run = false;
                } else {
                    self.score.reset();
                    for paddle in &mut self.paddles {
                        paddle.reset_pos();
                    }
                    events.push(Event::ScoresReset);
                }
                self.go_idle(now, self.config.pregame_delay);
            }
            Phase::Ingame | Phase::GameOver => {}
        }

        if let Some(scorer) = self.scored.take() {
            self.settle_point(now, scorer, events);
        }
    }

    fn settle_point(&mut self, now: Duration, scorer: Side, events: &mut Vec<Event>) {
        let value = self.score.get(scorer);
        events.push(Event::ScoreUpdated {
            side: scorer,
            value,
        });

        if self
            .score
            .has_won(scorer, self.config.score_limit, self.config.win_margin)
        {
            self.set_phase(Phase::GameOver);
            let [left, right] = self.score.points();
            info!(winner = ?scorer, left, right, "match won");
            events.push(Event::GameOver {
                winner: scorer,
                score: self.score.points(),
            });
            self.go_idle(now, self.config.game_over_delay);
        } else {
            self.go_idle(now, self.config.scored_delay);
        }
    }

    fn apply_controls(&mut self, now: Duration, controls: &Controls, events: &mut Vec<Event>) {
        if controls.restart {
            self.restart();
            events.push(Event::Restarted);
        }

        if controls.pause {
            self.toggle_pause(now);
            events.push(Event::Paused(self.paused));
        }

        if self.paused {
            return;
        }

        if let Some(direction) = controls.direction() {
            self.paddles[Side::Left.index()].request_move(direction);
        }
    }

    /// An idle wait resumes where it stood when the pause began
    fn toggle_pause(&mut self, now: Duration) {
        self.paused = !self.paused;
        if self.paused {
            self.paused_at = Some(now);
        } else if let Some(since) = self.paused_at.take() {
            if let Some(until) = self.idle_until.as_mut() {
                *until += now.saturating_sub(since);
            }
        }
        debug!(paused = self.paused, "pause toggled");
    }

    /// Collision and ball movement when `active`; paddle commits always
    fn simulate(&mut self, active: bool, events: &mut Vec<Event>) {
        if active {
            match collision::detect(&mut self.ball, &self.paddles) {
                Contact::Out(scorer) => {
                    self.score.award(scorer);
                    self.scored = Some(scorer);
                    debug!(scorer = ?scorer, score = ?self.score.points(), "point scored");
                    events.push(Event::Scored {
                        scorer,
                        score: self.score.points(),
                    });
                }
                contact if contact.is_bounce() => events.push(Event::Bounce),
                _ => {}
            }
        }

        for paddle in &mut self.paddles {
            paddle.update();
        }

        // A ball that just left the court stays put until the next serve
        if active && self.scored.is_none() {
            self.ball.update();
        }
    }

    /// Force a new match right away
    pub fn restart(&mut self) {
        info!("match restarted");
        self.set_phase(Phase::Pregame);
        self.idle_until = None;
        self.scored = None;
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, "phase change");
        }
        self.prev_phase = self.phase;
        self.phase = phase;
    }

    fn go_idle(&mut self, now: Duration, duration: Duration) {
        self.set_phase(Phase::Idle);
        self.idle_until = Some(now + duration);
        if self.paused {
            // Only the paused time from here on delays this wait
            self.paused_at = Some(now);
        }
    }

    fn leave_idle(&mut self, events: &mut Vec<Event>) {
        std::mem::swap(&mut self.phase, &mut self.prev_phase);
        self.idle_until = None;
        debug!(resume = ?self.phase, "idle expired");

        match self.phase {
            Phase::Pregame => {
                self.set_phase(Phase::Ingame);
                self.serve(events);
            }
            Phase::Ingame => self.serve(events),
            Phase::GameOver => self.set_phase(Phase::Pregame),
            Phase::Idle => {}
        }
    }

    fn serve(&mut self, events: &mut Vec<Event>) {
        self.ball.start(&mut self.rng);
        events.push(Event::Served);
    }

    /// Everything to draw this tick, back to front
    pub fn sprites(&self) -> Vec<Sprite> {
        let mut sprites: Vec<Sprite> = self
            .paddles
            .iter()
            .map(|paddle| paddle.sprite())
            .collect();

        if self.phase != Phase::Idle {
            sprites.push(self.ball.sprite());
        }

        if self.paused {
            sprites.push(Sprite::new(
                SpriteKind::PausePanel,
                Rect::new(0, 0, COURT_WIDTH, COURT_HEIGHT),
            ));
        }

        sprites
    }

    #[cfg(test)]
    pub(crate) fn force_state(&mut self, phase: Phase, ball: Ball, score: [u8; 2]) {
        self.phase = phase;
        self.prev_phase = Phase::Pregame;
        self.first_run = false;
        self.idle_until = None;
        self.ball = ball;
        self.score = Score::from(score);
    }
}
