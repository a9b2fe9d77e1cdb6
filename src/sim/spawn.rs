//! Fixed-cadence hazard spawning
//!
//! Spawn intervals never change; rising fall speed is the only difficulty lever.

use super::state::{Coin, GameState, Obstacle};

/// True on frames that are a multiple of `every` (frame 0 included)
#[inline]
pub fn due(frame: u64, every: u64) -> bool {
    every != 0 && frame % every == 0
}

/// Append one obstacle above the top edge, returning its ID
pub fn spawn_obstacle(state: &mut GameState) -> u32 {
    let id = state.next_entity_id();
    let viewport = state.viewport;
    let scale = state.profile_tuning().obstacle_scale;
    let spawn_y = state.tuning.spawn_y;
    let obstacle = Obstacle::spawn(id, state.rng(), viewport, scale, spawn_y);
    log::trace!("Spawned {:?} obstacle {} at x={:.1}", obstacle.kind, id, obstacle.pos.x);
    state.obstacles.push(obstacle);
    id
}

/// Append one coin above the top edge, returning its ID
pub fn spawn_coin(state: &mut GameState) -> u32 {
    let id = state.next_entity_id();
    let viewport = state.viewport;
    let radius = state.tuning.coin_radius;
    let spawn_y = state.tuning.spawn_y;
    let coin = Coin::spawn(id, state.rng(), viewport, radius, spawn_y);
    log::trace!("Spawned coin {} at x={:.1}", id, coin.center.x);
    state.coins.push(coin);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use crate::tuning::Tuning;

    #[test]
    fn test_due_cadence() {
        assert!(due(0, 70));
        assert!(!due(69, 70));
        assert!(due(70, 70));
        assert!(due(140, 70));
        assert!(!due(5, 0));
    }

    #[test]
    fn test_spawn_assigns_unique_ids() {
        let mut state = GameState::new(5, Viewport::new(800.0, 600.0), Tuning::default());
        let a = spawn_obstacle(&mut state);
        let b = spawn_coin(&mut state);
        let c = spawn_obstacle(&mut state);
        assert!(a < b && b < c);
        assert_eq!(state.obstacles.len(), 2);
        assert_eq!(state.coins.len(), 1);
        assert_eq!(state.coins[0].radius, 15.0);
        assert!(state.obstacles.iter().all(|o| o.pos.y == -200.0));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut s1 = GameState::new(42, viewport, Tuning::default());
        let mut s2 = GameState::new(42, viewport, Tuning::default());
        for _ in 0..10 {
            spawn_obstacle(&mut s1);
            spawn_obstacle(&mut s2);
        }
        for (a, b) in s1.obstacles.iter().zip(&s2.obstacles) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.pos, b.pos);
        }
    }
}
