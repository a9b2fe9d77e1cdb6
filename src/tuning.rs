//! Game balance constants
//!
//! Everything gameplay-relevant is a field here so a JSON override can retune
//! a build without recompiling. `Tuning::default()` is the shipped balance.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_HIT_TIER, MOBILE_WIDTH_THRESHOLD, TUNING_KEY};
use crate::platform::storage::KeyValueStore;

/// Device class selected from the viewport width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Profile {
    #[default]
    Desktop,
    Mobile,
}

impl Profile {
    pub fn for_width(width: f32) -> Self {
        if width < MOBILE_WIDTH_THRESHOLD {
            Profile::Mobile
        } else {
            Profile::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Desktop => "desktop",
            Profile::Mobile => "mobile",
        }
    }
}

/// Constants that differ between desktop and mobile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileTuning {
    /// Player square side length
    pub player_size: f32,
    /// Player horizontal speed at full stick deflection (units/frame)
    pub player_speed: f32,
    /// Pursuer sprite side length
    pub pursuer_size: f32,
    /// Fall speed at session start (units/frame)
    pub base_game_speed: f32,
    /// Multiplier applied to obstacle archetype sizes
    pub obstacle_scale: f32,
}

impl ProfileTuning {
    pub fn desktop() -> Self {
        Self {
            player_size: 50.0,
            player_speed: 7.0,
            pursuer_size: 90.0,
            base_game_speed: 3.5,
            obstacle_scale: 1.0,
        }
    }

    pub fn mobile() -> Self {
        Self {
            player_size: 40.0,
            player_speed: 5.0,
            pursuer_size: 70.0,
            base_game_speed: 2.5,
            obstacle_scale: 0.8,
        }
    }
}

/// Full balance sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub desktop: ProfileTuning,
    pub mobile: ProfileTuning,

    // === Cadence (frames) ===
    pub obstacle_interval: u64,
    pub coin_interval: u64,
    pub speed_up_interval: u64,
    /// Added to game speed every `speed_up_interval` frames
    pub speed_up_step: f32,

    // === Player ===
    /// Player top edge as a fraction of viewport height
    pub player_start_fraction: f32,
    /// One hit is forgiven once this many frames pass without another
    pub hit_decay_frames: u32,
    /// Speed multiplier regained per frame after a hit
    pub speed_recovery: f32,
    /// Speed multiplier right after a hit
    pub hit_slowdown: f32,
    /// Horizontal shove away from the obstacle that hit the player
    pub knockback: f32,

    // === Pursuer ===
    /// Vertical offset below the player with no hits
    pub pursuer_rest_offset: f32,
    /// Vertical offsets for hit tiers 1..=4
    pub pursuer_tier_offsets: [f32; MAX_HIT_TIER as usize],
    /// Fraction of remaining horizontal distance closed per frame
    pub pursuer_follow_x: f32,
    /// Fraction of remaining vertical distance closed per frame
    pub pursuer_follow_y: f32,
    /// Spawn distance below the bottom edge
    pub pursuer_spawn_below: f32,
    /// Margin shaved off every side of the pursuer for the catch check
    pub catch_inset: f32,

    // === Hazards ===
    pub coin_radius: f32,
    /// Vertical position new obstacles and coins appear at
    pub spawn_y: f32,
    pub obstacle_score: u64,
    pub coin_score: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            desktop: ProfileTuning::desktop(),
            mobile: ProfileTuning::mobile(),

            obstacle_interval: 70,
            coin_interval: 60,
            speed_up_interval: 600,
            speed_up_step: 0.5,

            player_start_fraction: 0.5,
            hit_decay_frames: 120,
            speed_recovery: 0.005,
            hit_slowdown: 0.2,
            knockback: 3.0,

            pursuer_rest_offset: 120.0,
            pursuer_tier_offsets: [80.0, 50.0, 20.0, -5.0],
            pursuer_follow_x: 0.1,
            pursuer_follow_y: 0.05,
            pursuer_spawn_below: 100.0,
            catch_inset: 15.0,

            coin_radius: 15.0,
            spawn_y: -200.0,
            obstacle_score: 10,
            coin_score: 50,
        }
    }
}

impl Tuning {
    /// Parse a JSON override; omitted top-level fields keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn for_profile(&self, profile: Profile) -> &ProfileTuning {
        match profile {
            Profile::Desktop => &self.desktop,
            Profile::Mobile => &self.mobile,
        }
    }

    /// Pursuer's vertical offset from the player for a given hit count
    pub fn pursuer_offset(&self, hit_count: u8) -> f32 {
        match hit_count.min(MAX_HIT_TIER) {
            0 => self.pursuer_rest_offset,
            tier => self.pursuer_tier_offsets[tier as usize - 1],
        }
    }

    /// Load the override stored under the tuning key, falling back to defaults
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match store.get(TUNING_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning override");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring malformed tuning override: {}", e);
                    Self::default()
                }
            },
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Tuning override unavailable: {}", e);
                Self::default()
            }
        }
    }
}
