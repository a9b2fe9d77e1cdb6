//! Session controller
//!
//! Owns the current `GameState`, the persisted best score and the store it
//! lives in. Drives Idle -> Running -> GameOver -> Running.

use crate::highscores::HighScore;
use crate::platform::storage::KeyValueStore;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, Viewport, tick};
use crate::tuning::Tuning;

pub struct Session<S: KeyValueStore> {
    store: S,
    high_score: HighScore,
    state: GameState,
    /// Set when the last finished session beat the stored best
    new_record: bool,
}

impl<S: KeyValueStore> Session<S> {
    /// Read the stored best score and show an idle board
    pub fn new(store: S, tuning: Tuning, viewport: Viewport) -> Self {
        let high_score = HighScore::load(&store);
        Self {
            store,
            high_score,
            state: GameState::new(0, viewport, tuning),
            new_record: false,
        }
    }

    /// Start or restart: every entity, the score, the frame counter and the
    /// game speed are rebuilt from scratch
    pub fn start(&mut self, seed: u64) {
        let viewport = self.state.viewport;
        let tuning = self.state.tuning.clone();
        self.state = GameState::new(seed, viewport, tuning);
        self.state.start();
        self.new_record = false;
        log::info!(
            "Session started (seed {}, {} profile, speed {:.1})",
            seed,
            viewport.profile().as_str(),
            self.state.game_speed
        );
    }

    /// Run one frame. Finishing the session records the score.
    pub fn frame(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let events = tick(&mut self.state, input);
        if let Some(score) = events.iter().find_map(|e| match e {
            GameEvent::Caught { score } => Some(*score),
            _ => None,
        }) {
            self.finish(score);
        }
        events
    }

    fn finish(&mut self, score: u64) {
        self.new_record = self.high_score.record(score, &mut self.store);
        log::info!(
            "Game over: score {}, best {}{}",
            score,
            self.high_score.best(),
            if self.new_record { " (new record)" } else { "" }
        );
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.state.resize(viewport);
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    pub fn is_new_record(&self) -> bool {
        self.new_record
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for hosts and tests that need to stage a situation
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
