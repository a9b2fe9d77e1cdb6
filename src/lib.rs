//! Dodge Chase - a single-screen dodge-and-collect arcade game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entities, collisions, spawning, game loop)
//! - `session`: Start/restart/game-over transitions and high-score bookkeeping
//! - `renderer`: Display-list generation and the Canvas 2D backend
//! - `platform`: Browser/native platform abstraction (input, storage)
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use session::Session;
pub use tuning::{Profile, ProfileTuning, Tuning};

/// Game configuration constants
pub mod consts {
    /// Viewports narrower than this use the mobile profile
    pub const MOBILE_WIDTH_THRESHOLD: f32 = 600.0;

    /// Key-value store key holding the best score
    pub const HIGH_SCORE_KEY: &str = "dodge_chase_high_score";
    /// Key-value store key holding an optional JSON tuning override
    pub const TUNING_KEY: &str = "dodge_chase_tuning";

    /// Highest hit tier; reaching it sends the pursuer onto the player
    pub const MAX_HIT_TIER: u8 = 4;
}
