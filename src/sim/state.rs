//! Game state and entity types
//!
//! One `GameState` per session: built at start, mutated in place every frame
//! by `tick`, thrown away on restart.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::MAX_HIT_TIER;
use crate::tuning::{Profile, ProfileTuning, Tuning};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen shown, nothing moves
    Idle,
    /// Active gameplay
    Running,
    /// Player was caught
    GameOver,
}

/// Drawable area in canvas units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn profile(&self) -> Profile {
        Profile::for_width(self.width)
    }

    pub fn is_mobile(&self) -> bool {
        self.profile() == Profile::Mobile
    }
}

/// Things that happened during a tick, for HUD updates and logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ObstacleSpawned { id: u32 },
    CoinSpawned { id: u32 },
    /// Obstacle touched the player; `hit_count` is the player's new count
    ObstacleHit { id: u32, hit_count: u8 },
    /// Obstacle left the bottom edge and scored
    ObstaclePassed { id: u32 },
    CoinCollected { id: u32 },
    SpeedUp { game_speed: f32 },
    /// Pursuer reached the player; session is over
    Caught { score: u64 },
}

/// The player's square
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal speed at full deflection
    pub speed: f32,
    /// Temporary slowdown after a hit, recovers toward 1
    pub speed_multiplier: f32,
    /// Recent hits, 0..=4
    pub hit_count: u8,
    pub frames_since_hit: u32,
}

impl Player {
    pub const COLOR: &'static str = "#00d2d3";

    pub fn new(viewport: Viewport, profile: &ProfileTuning, tuning: &Tuning) -> Self {
        let side = profile.player_size;
        Self {
            pos: Vec2::new(
                viewport.width / 2.0 - side / 2.0,
                viewport.height * tuning.player_start_fraction,
            ),
            size: Vec2::splat(side),
            speed: profile.player_speed,
            speed_multiplier: 1.0,
            hit_count: 0,
            frames_since_hit: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Per-frame movement, speed recovery and hit forgiveness
    pub fn update(&mut self, input_x: f32, canvas_width: f32, tuning: &Tuning) {
        if self.speed_multiplier < 1.0 {
            self.speed_multiplier = (self.speed_multiplier + tuning.speed_recovery).min(1.0);
        }

        self.pos.x += input_x * self.speed * self.speed_multiplier;
        self.clamp_to(canvas_width);

        self.frames_since_hit = self.frames_since_hit.saturating_add(1);
        if self.frames_since_hit > tuning.hit_decay_frames && self.hit_count > 0 {
            self.hit_count -= 1;
            self.frames_since_hit = 0;
        }
    }

    /// Register an obstacle hit and shove the player away from its center
    pub fn apply_hit(&mut self, source_center_x: f32, canvas_width: f32, tuning: &Tuning) {
        self.hit_count = (self.hit_count + 1).min(MAX_HIT_TIER);
        self.frames_since_hit = 0;
        self.speed_multiplier = tuning.hit_slowdown;

        if self.center().x < source_center_x {
            self.pos.x -= tuning.knockback;
        } else {
            self.pos.x += tuning.knockback;
        }
        self.clamp_to(canvas_width);
    }

    fn clamp_to(&mut self, canvas_width: f32) {
        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
        }
        if self.pos.x + self.size.x > canvas_width {
            self.pos.x = canvas_width - self.size.x;
        }
    }
}

/// The chaser that closes in as the player takes hits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pursuer {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Pursuer {
    pub const RING_COLOR: &'static str = "#ff4757";
    pub const RING_WIDTH: f32 = 3.0;

    pub fn new(viewport: Viewport, profile: &ProfileTuning, tuning: &Tuning) -> Self {
        let side = profile.pursuer_size;
        Self {
            pos: Vec2::new(
                viewport.width / 2.0 - side / 2.0,
                viewport.height + tuning.pursuer_spawn_below,
            ),
            size: Vec2::splat(side),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Shrunken rectangle used for the game-over check
    pub fn catch_box(&self, inset: f32) -> Rect {
        self.rect().inset(inset)
    }

    /// Where the pursuer is heading: centered under the player, at a height set by the hit tier
    pub fn target(&self, player: &Player, tuning: &Tuning) -> Vec2 {
        Vec2::new(
            player.center().x - self.size.x / 2.0,
            player.pos.y + tuning.pursuer_offset(player.hit_count),
        )
    }

    pub fn update(&mut self, player: &Player, tuning: &Tuning) {
        let target = self.target(player, tuning);
        self.pos.x += (target.x - self.pos.x) * tuning.pursuer_follow_x;
        self.pos.y += (target.y - self.pos.y) * tuning.pursuer_follow_y;
    }
}

/// Obstacle archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Crate,
    Plank,
    Pillar,
    Boulder,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::Crate,
        ObstacleKind::Plank,
        ObstacleKind::Pillar,
        ObstacleKind::Boulder,
    ];

    /// Unscaled (width, height)
    pub fn base_size(&self) -> Vec2 {
        match self {
            ObstacleKind::Crate => Vec2::new(60.0, 60.0),
            ObstacleKind::Plank => Vec2::new(150.0, 30.0),
            ObstacleKind::Pillar => Vec2::new(30.0, 150.0),
            ObstacleKind::Boulder => Vec2::new(80.0, 80.0),
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ObstacleKind::Crate => "#ff6b6b",
            ObstacleKind::Plank => "#ff4757",
            ObstacleKind::Pillar => "#c0392b",
            ObstacleKind::Boulder => "#e17055",
        }
    }
}

/// A falling hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Already applied its hit effect
    pub has_hit: bool,
    /// Left the screen; removed at the end of the frame
    pub expired: bool,
}

impl Obstacle {
    pub fn spawn<R: Rng>(
        id: u32,
        rng: &mut R,
        viewport: Viewport,
        scale: f32,
        spawn_y: f32,
    ) -> Self {
        let kind = ObstacleKind::ALL[rng.random_range(0..ObstacleKind::ALL.len())];
        let size = kind.base_size() * scale;
        let x = rng.random::<f32>() * (viewport.width - size.x);
        Self {
            id,
            kind,
            pos: Vec2::new(x, spawn_y),
            size,
            has_hit: false,
            expired: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Fall one frame. Returns true only on the frame the obstacle leaves the bottom edge.
    pub fn update(&mut self, game_speed: f32, canvas_height: f32) -> bool {
        if self.expired {
            return false;
        }
        self.pos.y += game_speed;
        if self.pos.y > canvas_height {
            self.expired = true;
            return true;
        }
        false
    }
}

/// A collectible; `center` is the circle center
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub center: Vec2,
    pub radius: f32,
    /// Collected or fell off screen
    pub expired: bool,
}

impl Coin {
    pub const FILL: &'static str = "#feca57";
    pub const STROKE: &'static str = "#ff9f43";

    pub fn spawn<R: Rng>(
        id: u32,
        rng: &mut R,
        viewport: Viewport,
        radius: f32,
        spawn_y: f32,
    ) -> Self {
        let x = rng.random::<f32>() * (viewport.width - radius * 2.0);
        Self {
            id,
            center: Vec2::new(x, spawn_y),
            radius,
            expired: false,
        }
    }

    /// Fall one frame; flags the coin once it is below the bottom edge
    pub fn update(&mut self, game_speed: f32, canvas_height: f32) {
        if self.expired {
            return;
        }
        self.center.y += game_speed;
        if self.center.y > canvas_height {
            self.expired = true;
        }
    }
}

/// Complete per-session state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Seed for spawn placement
    pub seed: u64,
    #[serde(skip)]
    rng: Pcg32,
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub phase: GamePhase,
    pub score: u64,
    /// Fall speed of obstacles and coins (units/frame)
    pub game_speed: f32,
    pub frame_count: u64,
    pub player: Player,
    pub pursuer: Pursuer,
    /// Active obstacles, in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Active coins, in spawn order
    pub coins: Vec<Coin>,
    next_id: u32,
}

impl GameState {
    /// Fresh session state in the `Idle` phase
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        let profile = tuning.for_profile(viewport.profile()).clone();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(viewport, &profile, &tuning),
            pursuer: Pursuer::new(viewport, &profile, &tuning),
            game_speed: profile.base_game_speed,
            tuning,
            viewport,
            phase: GamePhase::Idle,
            score: 0,
            frame_count: 0,
            obstacles: Vec::new(),
            coins: Vec::new(),
            next_id: 1,
        }
    }

    /// Begin ticking
    pub fn start(&mut self) {
        self.phase = GamePhase::Running;
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Constants for the current viewport class
    pub fn profile_tuning(&self) -> &ProfileTuning {
        self.tuning.for_profile(self.viewport.profile())
    }

    /// Change bounds mid-session; entities already alive keep their sizes
    pub fn resize(&mut self, viewport: Viewport) {
        let before = self.viewport.profile();
        self.viewport = viewport;
        let after = viewport.profile();
        if before != after {
            log::info!("Viewport profile changed: {} -> {}", before.as_str(), after.as_str());
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }
}
