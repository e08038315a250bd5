//! Per-tick collision and scoring checks.

use crate::ball::Ball;
use crate::entity::Positionable;
use crate::paddle::Paddle;
use crate::types::*;

/// Outcome of one collision pass
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Contact {
    /// Nothing touched the ball
    Clear,
    /// Ball left the court; carries the side that scores
    Out(Side),
    /// Ball bounced off the top or bottom wall
    Wall,
    /// Ball bounced off a paddle
    Paddle(Side),
}

impl Contact {
    pub fn is_bounce(&self) -> bool {
        matches!(self, Contact::Wall | Contact::Paddle(_))
    }
}

/// Run the ordered checks against the ball; the first one that matches wins.
///
/// Paddles are hit-tested at their current (pre-commit) position and their last
/// committed move supplies the spin.
pub fn detect(ball: &mut Ball, paddles: &[Paddle; 2]) -> Contact {
    if let Some(scorer) = out_of_bounds(ball) {
        return Contact::Out(scorer);
    }

    if ball.y <= 0 || ball.y + BALL_SIZE >= COURT_HEIGHT {
        ball.bounce(Axis::Vertical, None);
        ball.y = ball.y.clamp(0, COURT_HEIGHT - BALL_SIZE);
        return Contact::Wall;
    }

    let Some(side) = approaching_paddle(ball) else {
        return Contact::Clear;
    };

    let paddle = &paddles[side.index()];
    if !overlaps(ball, paddle) {
        return Contact::Clear;
    }

    // Flush against the paddle's outer face so the ball cannot sink into it
    ball.x = match side {
        Side::Left => paddle.x() + PADDLE_WIDTH,
        Side::Right => paddle.x() - BALL_SIZE,
    };
    ball.bounce(Axis::Horizontal, paddle.last_move());

    Contact::Paddle(side)
}

/// Side that scores when the ball has fully left the court
fn out_of_bounds(ball: &Ball) -> Option<Side> {
    if ball.x + BALL_SIZE < 0 {
        Some(Side::Right)
    } else if ball.x >= COURT_WIDTH {
        Some(Side::Left)
    } else {
        None
    }
}

/// Paddle whose plane the ball has reached while still heading toward it
fn approaching_paddle(ball: &Ball) -> Option<Side> {
    let side = if ball.x <= Paddle::x_for(Side::Left) + PADDLE_WIDTH {
        Side::Left
    } else if ball.x + BALL_SIZE >= Paddle::x_for(Side::Right) {
        Side::Right
    } else {
        return None;
    };

    let departing = match side {
        Side::Left => ball.vx > 0,
        Side::Right => ball.vx < 0,
    };

    (!departing).then_some(side)
}

/// Point-by-point scan of the ball's box against the paddle's region
fn overlaps(ball: &Ball, paddle: &Paddle) -> bool {
    let region = paddle.bounds();

    (0..BALL_SIZE)
        .flat_map(|i| (0..BALL_SIZE).map(move |j| (ball.x + i, ball.y + j)))
        .any(|(x, y)| region.contains(x, y))
}
