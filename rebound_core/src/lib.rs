//! Rebound core game engine - single-player paddle game against a heuristic opponent

pub mod ai;
pub mod ball;
pub mod collision;
pub mod driver;
pub mod entity;
pub mod hud;
pub mod paddle;
pub mod physics;
pub mod services;
pub mod session;
pub mod types;

pub use ball::Ball;
pub use driver::{Driver, Flow, SessionStats};
pub use entity::{Drawable, LabelSize, Positionable, Sprite, SpriteKind, Updatable};
pub use hud::{Hud, TextMetrics};
pub use paddle::Paddle;
pub use physics::Physics;
pub use services::{
    AudioSink, Clock, InputSource, Renderer, ServiceError, SystemClock, VirtualClock, Volume,
};
pub use session::{MatchSession, Score, View};
pub use types::*;
