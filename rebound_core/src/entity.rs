//! Capability traits shared by the things that live on the court.

use crate::types::{Point, Rect, Side};

/// Text size class of a label
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LabelSize {
    /// Large score digits
    Score,
    /// Smaller banner text
    Banner,
}

/// What a sprite depicts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpriteKind {
    Ball,
    Paddle(Side),
    Label { text: String, size: LabelSize },
    /// Translucent overlay shown while paused
    PausePanel,
}

/// One drawable item handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub bounds: Rect,
}

impl Sprite {
    pub fn new(kind: SpriteKind, bounds: Rect) -> Self {
        Sprite { kind, bounds }
    }
}

/// Something with a position and a size on the court
pub trait Positionable {
    /// Top-left corner
    fn position(&self) -> Point;

    /// `(width, height)`
    fn size(&self) -> (i16, i16);

    fn bounds(&self) -> Rect {
        let origin = self.position();
        let (width, height) = self.size();
        Rect::new(origin.x, origin.y, width, height)
    }
}

/// Something the renderer can draw
pub trait Drawable: Positionable {
    fn kind(&self) -> SpriteKind;

    fn sprite(&self) -> Sprite {
        Sprite::new(self.kind(), self.bounds())
    }
}

/// Something that advances once per tick
pub trait Updatable {
    fn update(&mut self);
}
