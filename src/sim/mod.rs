//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - One `tick` per animation frame, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, coin_touches, rects_overlap};
pub use state::{
    Coin, GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, Player, Pursuer, Viewport,
};
pub use tick::{TickInput, tick};
