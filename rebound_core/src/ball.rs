//! The ball: position, constant-speed velocity and bounce rules.

use rand::Rng;

use crate::entity::{Drawable, Positionable, SpriteKind, Updatable};
use crate::physics::Physics;
use crate::types::*;

/// Largest vertical speed a serve can start with (exclusive)
const SERVE_VY_RANGE: i8 = 3;

/// Ball state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Ball {
    pub x: i16,
    pub y: i16,
    pub vx: i8,
    pub vy: i8,
}

impl Ball {
    /// A motionless ball at the court center
    pub fn new() -> Self {
        let origin = Self::center();
        Ball {
            x: origin.x,
            y: origin.y,
            vx: 0,
            vy: 0,
        }
    }

    /// Top-left corner that centers the ball on the court
    pub fn center() -> Point {
        Point::new(
            COURT_WIDTH / 2 - BALL_SIZE / 2,
            COURT_HEIGHT / 2 - BALL_SIZE / 2,
        )
    }

    /// Re-center the ball and serve it on a fresh random trajectory
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let origin = Self::center();
        self.x = origin.x;
        self.y = origin.y;

        self.vy = rng.gen_range(0..SERVE_VY_RANGE);
        self.vx = Physics::horizontal_speed(self.vy);

        if rng.gen_bool(0.5) {
            self.vy = -self.vy;
        }
        if rng.gen_bool(0.5) {
            self.vx = -self.vx;
        }
    }

    /// Move by one tick worth of velocity
    pub fn advance(&mut self) {
        self.x += i16::from(self.vx);
        self.y += i16::from(self.vy);
    }

    /// Reflect the ball on `axis`, optionally bending it with paddle spin.
    ///
    /// Spin nudges `vy` one unit toward the paddle's direction of travel, at
    /// most twice and only while `|vy|` stays below `BALL_SPEED`. Whenever `vy`
    /// changes, `vx` is re-derived so the speed stays constant.
    pub fn bounce(&mut self, axis: Axis, spin: Option<Direction>) {
        match axis {
            Axis::Horizontal => self.vx = -self.vx,
            Axis::Vertical => self.vy = -self.vy,
        }

        let Some(spin) = spin else {
            return;
        };

        let before = self.vy;
        for _ in 0..2 {
            let next = self.vy + spin.signum();
            if next <= -BALL_SPEED || next >= BALL_SPEED {
                break;
            }
            self.vy = next;
        }

        if self.vy != before {
            let vx = Physics::horizontal_speed(self.vy);
            self.vx = if self.vx < 0 { -vx } else { vx };
        }
    }

    pub fn velocity(&self) -> (i8, i8) {
        (self.vx, self.vy)
    }

    /// Vertical center in court units
    pub fn center_y(&self) -> i16 {
        self.y + BALL_SIZE / 2
    }

    pub fn set_position(&mut self, x: i16, y: i16) {
        self.x = x;
        self.y = y;
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self::new()
    }
}

impl Positionable for Ball {
    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn size(&self) -> (i16, i16) {
        (BALL_SIZE, BALL_SIZE)
    }
}

impl Drawable for Ball {
    fn kind(&self) -> SpriteKind {
        SpriteKind::Ball
    }
}

impl Updatable for Ball {
    fn update(&mut self) {
        self.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn moving(vx: i8, vy: i8) -> Ball {
        Ball {
            vx,
            vy,
            ..Ball::new()
        }
    }

    #[test]
    fn test_start_centers_ball() {
        let mut ball = moving(7, 7);
        ball.set_position(-40, 390);
        let mut rng = StdRng::seed_from_u64(7);

        ball.start(&mut rng);

        assert_eq!(ball.x, COURT_WIDTH / 2 - BALL_SIZE / 2);
        assert_eq!(ball.y, COURT_HEIGHT / 2 - BALL_SIZE / 2);
        assert_eq!(ball.position(), Ball::center());
    }

    #[test]
    fn test_start_trajectories_stay_on_speed_circle() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let mut ball = Ball::new();
        let mut seen_left = false;
        let mut seen_right = false;

        for _ in 0..200 {
            ball.start(&mut rng);

            assert!(ball.vy.abs() < SERVE_VY_RANGE);
            assert!(Physics::is_on_speed_circle(ball.vx, ball.vy));
            assert_ne!(ball.vx, 0);

            seen_left |= ball.vx < 0;
            seen_right |= ball.vx > 0;
        }

        assert!(seen_left && seen_right, "serve direction never varied");
    }

    #[test]
    fn test_start_is_reproducible_with_same_seed() {
        let mut a = Ball::new();
        let mut b = Ball::new();
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);

        for _ in 0..10 {
            a.start(&mut rng_a);
            b.start(&mut rng_b);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_advance_integrates_velocity() {
        let mut ball = moving(-12, 2);
        let start = ball.position();

        ball.update();
        ball.update();

        assert_eq!(ball.x, start.x - 24);
        assert_eq!(ball.y, start.y + 4);
    }

    #[test]
    fn test_vertical_bounce_without_spin() {
        let mut ball = moving(12, -2);

        ball.bounce(Axis::Vertical, None);

        assert_eq!(ball.velocity(), (12, 2));
    }

    #[test]
    fn test_horizontal_bounce_with_spin_bends_trajectory() {
        let mut ball = moving(-13, 0);

        ball.bounce(Axis::Horizontal, Some(Direction::Down));

        assert_eq!(ball.vy, 2);
        assert_eq!(ball.vx, Physics::horizontal_speed(2));
        assert!(ball.vx > 0, "horizontal bounce must send the ball back");
    }

    #[test]
    fn test_spin_up_decreases_vy() {
        let mut ball = moving(12, 1);

        ball.bounce(Axis::Horizontal, Some(Direction::Up));

        assert_eq!(ball.vy, -1);
        assert_eq!(ball.vx, -Physics::horizontal_speed(-1));
    }

    #[test]
    fn test_spin_respects_speed_bound() {
        let mut ball = moving(6, 11);

        ball.bounce(Axis::Horizontal, Some(Direction::Down));

        // 11 -> 12, then 13 would reach BALL_SPEED
        assert_eq!(ball.vy, 12);
        assert_eq!(ball.vx, -5);

        ball.bounce(Axis::Horizontal, Some(Direction::Down));

        assert_eq!(ball.vy, 12);
        assert_eq!(ball.vx, 5);
    }

    #[test]
    fn test_bounce_keeps_speed_invariant() {
        let mut ball = moving(13, 0);

        for round in 0..40 {
            let spin = if round % 3 == 0 {
                Some(Direction::Up)
            } else {
                Some(Direction::Down)
            };
            ball.bounce(Axis::Horizontal, spin);

            assert!(ball.vy.abs() < BALL_SPEED);
            assert!(
                Physics::is_on_speed_circle(ball.vx, ball.vy),
                "off the speed circle after round {round}: {:?}",
                ball.velocity()
            );
        }
    }

    #[test]
    fn test_sprite_uses_ball_bounds() {
        let ball = Ball::new();
        let sprite = ball.sprite();

        assert_eq!(sprite.kind, SpriteKind::Ball);
        assert_eq!(sprite.bounds.width, BALL_SIZE);
        assert_eq!(sprite.bounds.height, BALL_SIZE);
        assert_eq!(sprite.bounds.x, ball.x);
    }
}
