//! Ball velocity model.

use crate::types::BALL_SPEED;

/// Physics calculations for game simulation
pub struct Physics;

impl Physics {
    /// Horizontal speed that keeps the ball at `BALL_SPEED` for a given `vy`.
    ///
    /// Returns the magnitude only; the caller assigns the sign. The result is
    /// truncated toward zero, so `vx² + vy² <= BALL_SPEED²` always holds.
    /// `|vy| >= BALL_SPEED` yields 0.
    pub fn horizontal_speed(vy: i8) -> i8 {
        let speed = i32::from(BALL_SPEED);
        let vy = i32::from(vy);
        let remainder = speed * speed - vy * vy;

        if remainder <= 0 {
            return 0;
        }

        (remainder as f64).sqrt() as i8
    }

    /// Squared magnitude of a velocity vector
    pub fn speed_squared(vx: i8, vy: i8) -> i32 {
        let (vx, vy) = (i32::from(vx), i32::from(vy));
        vx * vx + vy * vy
    }

    /// Whether `(vx, vy)` sits on the constant-speed circle, within truncation
    pub fn is_on_speed_circle(vx: i8, vy: i8) -> bool {
        vx.unsigned_abs() == Self::horizontal_speed(vy).unsigned_abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_speed_known_values() {
        assert_eq!(Physics::horizontal_speed(0), 13);
        assert_eq!(Physics::horizontal_speed(1), 12); // sqrt(168) = 12.96
        assert_eq!(Physics::horizontal_speed(5), 12); // sqrt(144) = 12
        assert_eq!(Physics::horizontal_speed(12), 5); // sqrt(25) = 5
    }

    #[test]
    fn test_horizontal_speed_is_symmetric() {
        for vy in 0..BALL_SPEED {
            assert_eq!(
                Physics::horizontal_speed(vy),
                Physics::horizontal_speed(-vy),
                "asymmetric result for vy = {vy}"
            );
        }
    }

    #[test]
    fn test_horizontal_speed_at_and_beyond_limit() {
        assert_eq!(Physics::horizontal_speed(BALL_SPEED), 0);
        assert_eq!(Physics::horizontal_speed(-BALL_SPEED), 0);
        assert_eq!(Physics::horizontal_speed(i8::MAX), 0);
        assert_eq!(Physics::horizontal_speed(i8::MIN), 0);
    }

    #[test]
    fn test_speed_stays_within_one_unit_of_target() {
        let target = f64::from(BALL_SPEED);

        for vy in (1 - BALL_SPEED)..BALL_SPEED {
            let vx = Physics::horizontal_speed(vy);
            let speed = f64::from(Physics::speed_squared(vx, vy)).sqrt();

            assert!(speed <= target, "vy = {vy} overshoots: {speed}");
            assert!(target - speed < 1.0, "vy = {vy} undershoots: {speed}");
            assert!(vx > 0, "vy = {vy} produced vertical travel");
        }
    }

    #[test]
    fn test_is_on_speed_circle() {
        assert!(Physics::is_on_speed_circle(-13, 0));
        assert!(Physics::is_on_speed_circle(12, -2));
        assert!(!Physics::is_on_speed_circle(13, 2));
    }
}
