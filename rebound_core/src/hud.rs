//! Score and winner labels.

use crate::entity::{LabelSize, Sprite, SpriteKind};
use crate::types::*;

/// Y of the score labels
pub const SCORE_LABEL_Y: i16 = 16;
/// Y of the winner banner
pub const WON_LABEL_Y: i16 = COURT_HEIGHT - 64;

const WON_TEXT: &str = "won";

/// Measures rendered text; supplied by whoever owns the fonts
pub trait TextMetrics {
    /// Width of `text` at `size`, in court units
    fn text_width(&self, text: &str, size: LabelSize) -> i16;

    /// Height of a line at `size`, in court units
    fn line_height(&self, size: LabelSize) -> i16;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Label {
    text: String,
    size: LabelSize,
    bounds: Rect,
}

impl Label {
    fn new(text: String, size: LabelSize, y: i16, metrics: &dyn TextMetrics) -> Self {
        let mut label = Label {
            text,
            size,
            bounds: Rect::new(0, y, 0, 0),
        };
        label.measure(metrics);
        label
    }

    fn measure(&mut self, metrics: &dyn TextMetrics) {
        self.bounds.width = metrics.text_width(&self.text, self.size);
        self.bounds.height = metrics.line_height(self.size);
    }

    /// Center the label horizontally on `x`
    fn center_on(&mut self, x: i16) {
        self.bounds.x = x - self.bounds.width / 2;
    }

    fn sprite(&self) -> Sprite {
        Sprite::new(
            SpriteKind::Label {
                text: self.text.clone(),
                size: self.size,
            },
            self.bounds,
        )
    }
}

/// Heads-up display: one score label per side plus the winner banner
#[derive(Debug, Clone)]
pub struct Hud {
    scores: [Label; 2],
    won: Label,
}

impl Hud {
    pub fn new(metrics: &dyn TextMetrics) -> Self {
        let score = |side: Side| {
            let mut label = Label::new("0".to_string(), LabelSize::Score, SCORE_LABEL_Y, metrics);
            label.center_on(Self::score_anchor(side));
            label
        };

        Hud {
            scores: [score(Side::Left), score(Side::Right)],
            won: Label::new(WON_TEXT.to_string(), LabelSize::Banner, WON_LABEL_Y, metrics),
        }
    }

    /// Score labels sit at one and two thirds of the court width
    fn score_anchor(side: Side) -> i16 {
        match side {
            Side::Left => COURT_WIDTH / 3,
            Side::Right => COURT_WIDTH * 2 / 3,
        }
    }

    /// The winner banner sits under the middle of the winner's half
    fn won_anchor(side: Side) -> i16 {
        match side {
            Side::Left => COURT_WIDTH / 4,
            Side::Right => COURT_WIDTH * 3 / 4,
        }
    }

    pub fn set_score(&mut self, side: Side, value: u8, metrics: &dyn TextMetrics) {
        let label = &mut self.scores[side.index()];
        label.text = value.to_string();
        label.measure(metrics);
        label.center_on(Self::score_anchor(side));
    }

    pub fn set_winner(&mut self, side: Side) {
        self.won.center_on(Self::won_anchor(side));
    }

    pub fn reset(&mut self, metrics: &dyn TextMetrics) {
        self.set_score(Side::Left, 0, metrics);
        self.set_score(Side::Right, 0, metrics);
    }

    pub fn score_text(&self, side: Side) -> &str {
        &self.scores[side.index()].text
    }

    /// Apply a game event to the labels; returns whether anything changed
    pub fn apply(&mut self, event: &Event, metrics: &dyn TextMetrics) -> bool {
        match *event {
            Event::ScoreUpdated { side, value } => self.set_score(side, value, metrics),
            Event::GameOver { winner, .. } => self.set_winner(winner),
            Event::ScoresReset => self.reset(metrics),
            _ => return false,
        }
        true
    }

    /// Sprites to draw this frame; the banner only while the winner is shown
    pub fn sprites(&self, show_winner: bool) -> Vec<Sprite> {
        let mut sprites: Vec<Sprite> = self.scores.iter().map(Label::sprite).collect();
        if show_winner {
            sprites.push(self.won.sprite());
        }
        sprites
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every glyph is 10 units wide
    struct FixedMetrics;

    impl TextMetrics for FixedMetrics {
        fn text_width(&self, text: &str, _size: LabelSize) -> i16 {
            text.chars().count() as i16 * 10
        }

        fn line_height(&self, size: LabelSize) -> i16 {
            match size {
                LabelSize::Score => 48,
                LabelSize::Banner => 24,
            }
        }
    }

    #[test]
    fn test_initial_scores_are_zero_and_centered() {
        let hud = Hud::new(&FixedMetrics);
        let sprites = hud.sprites(false);

        assert_eq!(sprites.len(), 2);
        assert_eq!(hud.score_text(Side::Left), "0");
        assert_eq!(sprites[0].bounds.x, COURT_WIDTH / 3 - 5);
        assert_eq!(sprites[1].bounds.x, COURT_WIDTH * 2 / 3 - 5);
        assert_eq!(sprites[0].bounds.y, SCORE_LABEL_Y);
    }

    #[test]
    fn test_two_digit_score_recenters() {
        let mut hud = Hud::new(&FixedMetrics);

        hud.set_score(Side::Right, 10, &FixedMetrics);

        let sprites = hud.sprites(false);
        assert_eq!(hud.score_text(Side::Right), "10");
        assert_eq!(sprites[1].bounds.width, 20);
        assert_eq!(sprites[1].bounds.x, COURT_WIDTH * 2 / 3 - 10);
    }

    #[test]
    fn test_winner_banner_under_winner_half() {
        let mut hud = Hud::new(&FixedMetrics);

        hud.set_winner(Side::Right);
        let sprites = hud.sprites(true);

        let banner = &sprites[2];
        assert_eq!(
            banner.kind,
            SpriteKind::Label {
                text: "won".to_string(),
                size: LabelSize::Banner
            }
        );
        assert_eq!(banner.bounds.x, COURT_WIDTH * 3 / 4 - 15);
        assert_eq!(banner.bounds.y, WON_LABEL_Y);
    }

    #[test]
    fn test_apply_events() {
        let mut hud = Hud::new(&FixedMetrics);

        assert!(hud.apply(
            &Event::ScoreUpdated {
                side: Side::Left,
                value: 7
            },
            &FixedMetrics
        ));
        assert_eq!(hud.score_text(Side::Left), "7");

        assert!(!hud.apply(&Event::Bounce, &FixedMetrics));

        assert!(hud.apply(&Event::ScoresReset, &FixedMetrics));
        assert_eq!(hud.score_text(Side::Left), "0");
    }
}
