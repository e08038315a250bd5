//! Core types and constants for the game engine.

use std::time::Duration;

/// Court width in court units
pub const COURT_WIDTH: i16 = 512;
/// Court height in court units
pub const COURT_HEIGHT: i16 = 400;

/// Magnitude of the ball velocity vector
pub const BALL_SPEED: i8 = 13;
/// Ball edge length (the ball is square)
pub const BALL_SIZE: i16 = 14;

pub const PADDLE_WIDTH: i16 = 12;
pub const PADDLE_HEIGHT: i16 = 64;
/// Gap between a court edge and the outer face of its paddle
pub const PADDLE_DISTANCE: i16 = 20;
/// Units a paddle travels in one committed move
pub const PADDLE_STEP: i16 = 5;

/// Dead zone around the opponent paddle center when tracking the ball
pub const AI_TOLERANCE: i16 = 5;

pub const SCORE_LIMIT: u8 = 10;
pub const WIN_MARGIN: u8 = 2;

/// Player/paddle side
///
/// The left paddle belongs to the human player, the right one to the computer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Index into per-side arrays (`[left, right]`)
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Vertical movement direction in screen space (y grows downward)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Sign of the direction along the y axis
    pub fn signum(self) -> i8 {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
        }
    }

    pub fn from_signum(value: i8) -> Option<Direction> {
        match value.signum() {
            -1 => Some(Direction::Up),
            1 => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Velocity component affected by a bounce
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Match phase
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Phase {
    /// Scores reset, waiting to serve the first ball
    Pregame,
    /// Ball in play
    Ingame,
    /// A player met the win condition
    GameOver,
    /// Timed wait; the phase to resume is remembered separately
    Idle,
}

/// Point in court units
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

impl Point {
    pub fn new(x: i16, y: i16) -> Self {
        Point { x, y }
    }
}

/// Axis-aligned rectangle, half-open on its right and bottom edges
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i16,
    pub y: i16,
    pub width: i16,
    pub height: i16,
}

impl Rect {
    pub fn new(x: i16, y: i16, width: i16, height: i16) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i16 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i16 {
        self.y + self.height
    }

    /// Whether the point `(x, y)` is owned by this rectangle
    pub fn contains(&self, x: i16, y: i16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Game configuration
///
/// Geometry and ball speed are compile-time constants; this only carries the
/// timing and scoring knobs.
#[derive(Debug, Copy, Clone)]
pub struct Config {
    /// Fixed delay between ticks
    pub tick_interval: Duration,
    /// Wait before the first serve of a match
    pub pregame_delay: Duration,
    /// Wait after a point before the next serve
    pub scored_delay: Duration,
    /// How long the winner is shown before a new match
    pub game_over_delay: Duration,
    /// Points needed to win
    pub score_limit: u8,
    /// Required lead over the other player
    pub win_margin: u8,
    /// Random seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tick_interval: Duration::from_millis(20),
            pregame_delay: Duration::from_millis(500),
            scored_delay: Duration::from_millis(800),
            game_over_delay: Duration::from_millis(3000),
            score_limit: SCORE_LIMIT,
            win_margin: WIN_MARGIN,
            seed: None,
        }
    }
}

/// Player controls for one tick
///
/// `up` and `down` are level-triggered (key held). Everything else is an
/// edge: set only on the tick the key went down.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Controls {
    pub up: bool,
    pub down: bool,
    pub restart: bool,
    pub quit: bool,
    pub pause: bool,
    pub mute: bool,
    pub volume_up: bool,
    pub volume_down: bool,
}

impl Controls {
    /// Movement requested by the held keys; up wins when both are held
    pub fn direction(&self) -> Option<Direction> {
        if self.up {
            Some(Direction::Up)
        } else if self.down {
            Some(Direction::Down)
        } else {
            None
        }
    }
}

/// Sound effects the audio service can play
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Sound {
    Bounce,
    Scored,
    GameOver,
}

/// Game events produced during a tick
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event {
    /// Ball bounced off a wall or a paddle
    Bounce,
    /// Ball left the court
    Scored {
        scorer: Side,
        score: [u8; 2], // New score after this point
    },
    /// Score display should show `value` for `side`
    ScoreUpdated { side: Side, value: u8 },
    /// Match decided
    GameOver { winner: Side, score: [u8; 2] },
    /// Scores zeroed for a new match
    ScoresReset,
    /// A new ball was served
    Served,
    /// Manual restart request honored
    Restarted,
    /// Pause toggled; carries the new state
    Paused(bool),
}

impl Event {
    /// Sound effect associated with this event, if any
    pub fn sound(&self) -> Option<Sound> {
        match self {
            Event::Bounce => Some(Sound::Bounce),
            Event::Scored { .. } => Some(Sound::Scored),
            Event::GameOver { .. } => Some(Sound::GameOver),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite(), Side::Left);
        assert_eq!(Side::Left.index(), 0);
        assert_eq!(Side::Right.index(), 1);
    }

    #[test]
    fn test_direction_signum_round_trip() {
        assert_eq!(Direction::from_signum(Direction::Up.signum()), Some(Direction::Up));
        assert_eq!(Direction::from_signum(5), Some(Direction::Down));
        assert_eq!(Direction::from_signum(0), None);
    }

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(10, 20, 4, 3);

        assert!(rect.contains(10, 20));
        assert!(rect.contains(13, 22));
        assert!(!rect.contains(14, 20));
        assert!(!rect.contains(10, 23));
        assert!(!rect.contains(9, 21));
    }

    #[test]
    fn test_controls_direction() {
        let both = Controls {
            up: true,
            down: true,
            ..Controls::default()
        };
        assert_eq!(both.direction(), Some(Direction::Up));

        let down = Controls {
            down: true,
            ..Controls::default()
        };
        assert_eq!(down.direction(), Some(Direction::Down));
        assert_eq!(Controls::default().direction(), None);
    }

    #[test]
    fn test_default_config_timing() {
        let config = Config::default();

        assert_eq!(config.tick_interval, Duration::from_millis(20));
        assert_eq!(config.pregame_delay, Duration::from_millis(500));
        assert_eq!(config.scored_delay, Duration::from_millis(800));
        assert_eq!(config.game_over_delay, Duration::from_millis(3000));
        assert_eq!(config.score_limit, 10);
        assert_eq!(config.win_margin, 2);
    }

    #[test]
    fn test_event_sounds() {
        assert_eq!(Event::Bounce.sound(), Some(Sound::Bounce));
        assert_eq!(
            Event::GameOver {
                winner: Side::Left,
                score: [10, 3]
            }
            .sound(),
            Some(Sound::GameOver)
        );
        assert_eq!(Event::Served.sound(), None);
    }
}
