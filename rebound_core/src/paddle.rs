//! Paddles: request-then-commit vertical movement.

use crate::entity::{Drawable, Positionable, SpriteKind, Updatable};
use crate::types::*;

/// Paddle state
///
/// `pos` is the offset of the paddle center from the court's vertical center.
/// Moves are requested during a tick and applied by [`Paddle::commit`], so hit
/// testing within the same tick sees the pre-commit position.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Paddle {
    side: Side,
    pos: i16,
    pending: i16,
    last_move: i8,
}

impl Paddle {
    pub fn new(side: Side) -> Self {
        Paddle {
            side,
            pos: 0,
            pending: 0,
            last_move: 0,
        }
    }

    /// Exclusive bound on `|pos|`
    pub const fn limit() -> i16 {
        COURT_HEIGHT / 2 - PADDLE_HEIGHT / 2
    }

    /// X coordinate of the paddle's left edge
    pub fn x(&self) -> i16 {
        Self::x_for(self.side)
    }

    pub const fn x_for(side: Side) -> i16 {
        match side {
            Side::Left => PADDLE_DISTANCE,
            Side::Right => COURT_WIDTH - PADDLE_DISTANCE - PADDLE_WIDTH,
        }
    }

    /// Y coordinate of the paddle's top edge
    pub fn top(&self) -> i16 {
        self.pos + COURT_HEIGHT / 2 - PADDLE_HEIGHT / 2
    }

    /// Vertical center in court units
    pub fn center_y(&self) -> i16 {
        self.pos + COURT_HEIGHT / 2
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn pos(&self) -> i16 {
        self.pos
    }

    /// Direction of the last committed move, `None` if the paddle stood still
    pub fn last_move(&self) -> Option<Direction> {
        Direction::from_signum(self.last_move)
    }

    /// Ask to move one step this tick.
    ///
    /// Returns `false`, leaving the paddle untouched, when the step would put
    /// the paddle at or past its limit.
    pub fn request_move(&mut self, direction: Direction) -> bool {
        let step = i16::from(direction.signum()) * PADDLE_STEP;

        if (self.pos + step).abs() < Self::limit() {
            self.pending = step;
            true
        } else {
            false
        }
    }

    /// Apply the pending move, if any, and remember its direction for spin
    pub fn commit(&mut self) {
        if self.pending != 0 {
            self.pos += self.pending;
            self.last_move = self.pending.signum() as i8;
            self.pending = 0;
        } else {
            self.last_move = 0;
        }
    }

    /// Re-center the paddle and drop any pending move
    pub fn reset_pos(&mut self) {
        self.pos = 0;
        self.pending = 0;
    }
}

impl Positionable for Paddle {
    fn position(&self) -> Point {
        Point::new(self.x(), self.top())
    }

    fn size(&self) -> (i16, i16) {
        (PADDLE_WIDTH, PADDLE_HEIGHT)
    }
}

impl Drawable for Paddle {
    fn kind(&self) -> SpriteKind {
        SpriteKind::Paddle(self.side)
    }
}

impl Updatable for Paddle {
    fn update(&mut self) {
        self.commit();
    }
}
