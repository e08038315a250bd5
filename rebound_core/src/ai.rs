//! Rule-based controller for the computer paddle.
//!
//! The rules are evaluated in order and each one may request a move; a later
//! accepted request replaces an earlier one, exactly like a human mashing keys.
//! Nothing is remembered between ticks.

use crate::ball::Ball;
use crate::paddle::Paddle;
use crate::types::*;

/// Ball x beyond which the opponent starts paying attention
const FAR_THIRD: i16 = COURT_WIDTH * 2 / 3;
/// Slow balls are ignored until their center passes this x
const SLOW_BALL_LINE: i16 = COURT_WIDTH * 3 / 5;
/// Horizontal speed under which a ball counts as slow
const SLOW_BALL_VX: i8 = 10;

/// Vertical band the paddle rests in while the ball travels away
const BAND_TOP: i16 = COURT_HEIGHT * 2 / 5;
const BAND_BOTTOM: i16 = COURT_HEIGHT * 3 / 5;

/// Request this tick's moves for the `opponent` paddle
pub fn drive(phase: Phase, ball: &Ball, player: &Paddle, opponent: &mut Paddle) {
    let center = opponent.center_y();

    if matches!(phase, Phase::Pregame | Phase::Idle) {
        if center < COURT_HEIGHT / 2 {
            opponent.request_move(Direction::Down);
        } else if center > COURT_HEIGHT / 2 {
            opponent.request_move(Direction::Up);
        }
        return;
    }

    let (vx, _) = ball.velocity();

    // Ball heading to the player: drift back toward the middle band
    if vx < 0 && ball.x + BALL_SIZE <= FAR_THIRD {
        if center <= BAND_TOP {
            opponent.request_move(Direction::Down);
        } else if center >= BAND_BOTTOM {
            opponent.request_move(Direction::Up);
        }
    }

    // About to reach our plane: read the player instead of the ball
    if vx > 0 && ball.x + BALL_SIZE + i16::from(vx) >= opponent.x() {
        if player.center_y() > COURT_HEIGHT / 2 {
            opponent.request_move(Direction::Up);
        } else {
            opponent.request_move(Direction::Down);
        }
    }

    if vx < 0 && ball.x < FAR_THIRD {
        return;
    }
    if vx < SLOW_BALL_VX && ball.x + BALL_SIZE / 2 <= SLOW_BALL_LINE {
        return;
    }

    let target = ball.center_y();
    if center + AI_TOLERANCE < target {
        opponent.request_move(Direction::Down);
    } else if center - AI_TOLERANCE > target {
        opponent.request_move(Direction::Up);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_at(x: i16, y: i16, vx: i8, vy: i8) -> Ball {
        Ball { x, y, vx, vy }
    }

    /// Opponent paddle offset by `steps` moves from center
    fn opponent_at(steps: i16) -> Paddle {
        let mut paddle = Paddle::new(Side::Right);
        let direction = if steps < 0 {
            Direction::Up
        } else {
            Direction::Down
        };
        for _ in 0..steps.abs() {
            assert!(paddle.request_move(direction));
            paddle.commit();
        }
        paddle
    }

    /// Run the heuristic and report the committed move
    fn decision(
        phase: Phase,
        ball: &Ball,
        player: &Paddle,
        opponent: &mut Paddle,
    ) -> Option<Direction> {
        drive(phase, ball, player, opponent);
        opponent.commit();
        opponent.last_move()
    }

    #[test]
    fn test_recenters_in_pregame_and_idle() {
        let ball = Ball::new();
        let player = Paddle::new(Side::Left);

        let mut above = opponent_at(-6);
        assert_eq!(
            decision(Phase::Pregame, &ball, &player, &mut above),
            Some(Direction::Down)
        );

        let mut below = opponent_at(6);
        assert_eq!(
            decision(Phase::Idle, &ball, &player, &mut below),
            Some(Direction::Up)
        );

        let mut centered = opponent_at(0);
        assert_eq!(decision(Phase::Idle, &ball, &player, &mut centered), None);
    }

    #[test]
    fn test_recentering_ignores_ball() {
        let ball = ball_at(470, 10, 13, 0);
        let player = Paddle::new(Side::Left);
        let mut opponent = opponent_at(0);

        assert_eq!(
            decision(Phase::Pregame, &ball, &player, &mut opponent),
            None
        );
    }

    #[test]
    fn test_holds_middle_band_while_ball_moves_away() {
        let ball = ball_at(100, 20, -13, 0);
        let player = Paddle::new(Side::Left);

        let mut high = opponent_at(-10); // center 150, above the band
        assert_eq!(
            decision(Phase::Ingame, &ball, &player, &mut high),
            Some(Direction::Down)
        );

        let mut low = opponent_at(10); // center 250, below the band
        assert_eq!(
            decision(Phase::Ingame, &ball, &player, &mut low),
            Some(Direction::Up)
        );

        let mut inside = opponent_at(2);
        assert_eq!(decision(Phase::Ingame, &ball, &player, &mut inside), None);
    }

    #[test]
    fn test_mirrors_player_when_ball_arrives() {
        let opponent_x = Paddle::x_for(Side::Right);
        let mut player = Paddle::new(Side::Left);
        for _ in 0..4 {
            player.request_move(Direction::Down);
            player.commit();
        }
        // Ball level with the paddle center so ball tracking stays quiet
        let ball = ball_at(opponent_x - BALL_SIZE - 5, COURT_HEIGHT / 2 - BALL_SIZE / 2, 12, 0);

        let mut opponent = opponent_at(0);
        assert_eq!(
            decision(Phase::Ingame, &ball, &player, &mut opponent),
            Some(Direction::Up)
        );

        let player = Paddle::new(Side::Left);
        let mut opponent = opponent_at(0);
        assert_eq!(
            decision(Phase::Ingame, &ball, &player, &mut opponent),
            Some(Direction::Down)
        );
    }

    #[test]
    fn test_tracking_overrides_mirror() {
        let opponent_x = Paddle::x_for(Side::Right);
        let player = Paddle::new(Side::Left); // mirror alone would say Down
        let ball = ball_at(opponent_x - BALL_SIZE - 5, 40, 12, -1);
        let mut opponent = opponent_at(0);

        assert_eq!(
            decision(Phase::Ingame, &ball, &player, &mut opponent),
            Some(Direction::Up)
        );
    }

    #[test]
    fn test_ignores_far_ball() {
        let player = Paddle::new(Side::Left);
        let mut opponent = opponent_at(0);

        // Slow ball still short of three fifths of the court
        let ball = ball_at(200, 20, 8, 5);
        assert_eq!(decision(Phase::Ingame, &ball, &player, &mut opponent), None);

        // Ball moving away in the far two thirds
        let ball = ball_at(300, 20, -13, 0);
        assert_eq!(decision(Phase::Ingame, &ball, &player, &mut opponent), None);
    }

    #[test]
    fn test_tracks_approaching_ball() {
        let player = Paddle::new(Side::Left);
        let mut opponent = opponent_at(0);

        let ball = ball_at(360, 320, 12, 2);
        assert_eq!(
            decision(Phase::Ingame, &ball, &player, &mut opponent),
            Some(Direction::Down)
        );

        let mut opponent = opponent_at(0);
        let ball = ball_at(360, 60, 12, -2);
        assert_eq!(
            decision(Phase::Ingame, &ball, &player, &mut opponent),
            Some(Direction::Up)
        );
    }

    #[test]
    fn test_tolerance_band_keeps_paddle_still() {
        let player = Paddle::new(Side::Left);
        let mut opponent = opponent_at(0);
        // Ball center 4 units below paddle center
        let ball = ball_at(360, COURT_HEIGHT / 2 + 4 - BALL_SIZE / 2, 12, 1);

        assert_eq!(decision(Phase::Ingame, &ball, &player, &mut opponent), None);
    }

    #[test]
    fn test_fast_ball_returning_past_far_third_is_tracked() {
        let player = Paddle::new(Side::Left);
        let mut opponent = opponent_at(0);
        let ball = ball_at(400, 330, -13, 0);

        assert_eq!(
            decision(Phase::Ingame, &ball, &player, &mut opponent),
            Some(Direction::Down)
        );
    }
}
