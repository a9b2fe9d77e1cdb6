//! Per-frame simulation step
//!
//! One call is one animation frame. Order matters and mirrors what is drawn:
//! player, pursuer, obstacles, coins, catch check, difficulty, frame counter.

use glam::Vec2;

use super::collision::coin_touches;
use super::spawn::{due, spawn_coin, spawn_obstacle};
use super::state::{GameEvent, GamePhase, GameState};

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Joystick deflection, inside the unit disc. Only `x` steers.
    pub stick: Vec2,
    /// Idle/demo mode - the game steers itself
    pub autopilot: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running {
        return events;
    }

    let stick = if input.autopilot {
        autopilot(state)
    } else {
        input.stick
    };
    let steer = stick.x.clamp(-1.0, 1.0);

    state
        .player
        .update(steer, state.viewport.width, &state.tuning);
    state.pursuer.update(&state.player, &state.tuning);

    update_obstacles(state, &mut events);
    update_coins(state, &mut events);

    let catch_box = state.pursuer.catch_box(state.tuning.catch_inset);
    if state.player.rect().overlaps(&catch_box) {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Caught at frame {} with score {}",
            state.frame_count,
            state.score
        );
        events.push(GameEvent::Caught { score: state.score });
        return events;
    }

    if due(state.frame_count, state.tuning.speed_up_interval) {
        state.game_speed += state.tuning.speed_up_step;
        log::info!("Speed up: {:.1}", state.game_speed);
        events.push(GameEvent::SpeedUp {
            game_speed: state.game_speed,
        });
    }

    state.frame_count += 1;
    events
}

fn update_obstacles(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if due(state.frame_count, state.tuning.obstacle_interval) {
        let id = spawn_obstacle(state);
        events.push(GameEvent::ObstacleSpawned { id });
    }

    let GameState {
        obstacles,
        player,
        score,
        tuning,
        viewport,
        game_speed,
        ..
    } = state;

    for obstacle in obstacles.iter_mut() {
        if obstacle.update(*game_speed, viewport.height) {
            *score += tuning.obstacle_score;
            events.push(GameEvent::ObstaclePassed { id: obstacle.id });
        }

        if !obstacle.has_hit && player.rect().overlaps(&obstacle.rect()) {
            obstacle.has_hit = true;
            player.apply_hit(obstacle.rect().center().x, viewport.width, tuning);
            log::debug!("Hit by obstacle {} (hits: {})", obstacle.id, player.hit_count);
            events.push(GameEvent::ObstacleHit {
                id: obstacle.id,
                hit_count: player.hit_count,
            });
        }
    }

    obstacles.retain(|o| !o.expired);
}

fn update_coins(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if due(state.frame_count, state.tuning.coin_interval) {
        let id = spawn_coin(state);
        events.push(GameEvent::CoinSpawned { id });
    }

    let GameState {
        coins,
        player,
        score,
        tuning,
        viewport,
        game_speed,
        ..
    } = state;

    let player_rect = player.rect();
    for coin in coins.iter_mut() {
        coin.update(*game_speed, viewport.height);
        if !coin.expired && coin_touches(coin.center, coin.radius, &player_rect) {
            *score += tuning.coin_score;
            coin.expired = true;
            log::debug!("Collected coin {}", coin.id);
            events.push(GameEvent::CoinCollected { id: coin.id });
        }
    }

    coins.retain(|c| !c.expired);
}

/// Demo steering: dodge the most urgent obstacle, otherwise chase the nearest coin
fn autopilot(state: &GameState) -> Vec2 {
    let player = state.player.rect();
    let center_x = player.center().x;
    // Frames of warning, converted to distance at the current fall speed
    let lookahead = state.game_speed * 45.0;
    let margin = player.size.x * 0.5;

    let threat = state
        .obstacles
        .iter()
        .filter(|o| !o.has_hit)
        .map(|o| o.rect())
        .filter(|r| r.bottom() > player.top() - lookahead && r.top() < player.bottom())
        .filter(|r| r.left() < player.right() + margin && r.right() > player.left() - margin)
        .max_by(|a, b| {
            a.bottom()
                .partial_cmp(&b.bottom())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    if let Some(threat) = threat {
        let room_left = threat.left() - player.size.x;
        let room_right = state.viewport.width - threat.right() - player.size.x;
        let go_left = if room_left < 0.0 {
            false
        } else if room_right < 0.0 {
            true
        } else {
            // Prefer the side the player is already nearer to
            center_x < threat.center().x
        };
        return Vec2::new(if go_left { -1.0 } else { 1.0 }, 0.0);
    }

    let coin = state
        .coins
        .iter()
        .filter(|c| c.center.y < player.bottom())
        .max_by(|a, b| {
            a.center
                .y
                .partial_cmp(&b.center.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let target_x = coin
        .map(|c| c.center.x)
        .unwrap_or(state.viewport.width / 2.0);
    let delta = target_x - center_x;
    Vec2::new((delta / state.player.speed.max(1.0)).clamp(-1.0, 1.0), 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Coin, Obstacle, ObstacleKind, Viewport};
    use crate::tuning::Tuning;

    fn running(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Viewport::new(1024.0, 768.0), Tuning::default());
        state.start();
        state
    }

    fn obstacle_at(id: u32, x: f32, y: f32) -> Obstacle {
        Obstacle {
            id,
            kind: ObstacleKind::Crate,
            pos: Vec2::new(x, y),
            size: ObstacleKind::Crate.base_size(),
            has_hit: false,
            expired: false,
        }
    }

    #[test]
    fn test_idle_and_game_over_do_not_tick() {
        let mut state = GameState::new(1, Viewport::new(1024.0, 768.0), Tuning::default());
        assert!(tick(&mut state, &TickInput::default()).is_empty());
        assert_eq!(state.frame_count, 0);

        state.phase = GamePhase::GameOver;
        assert!(tick(&mut state, &TickInput::default()).is_empty());
        assert_eq!(state.frame_count, 0);
    }

    #[test]
    fn test_first_frame_spawns_and_speeds_up() {
        let mut state = running(1);
        let events = tick(&mut state, &TickInput::default());
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.coins.len(), 1);
        assert_eq!(state.game_speed, 4.0);
        assert_eq!(state.frame_count, 1);
        assert!(events.contains(&GameEvent::SpeedUp { game_speed: 4.0 }));
    }

    #[test]
    fn test_stick_moves_player() {
        let mut state = running(1);
        let x = state.player.pos.x;
        tick(
            &mut state,
            &TickInput {
                stick: Vec2::new(0.5, 0.3),
                ..Default::default()
            },
        );
        assert_eq!(state.player.pos.x, x + 3.5);
        assert_eq!(state.player.pos.y, 384.0);
    }

    #[test]
    fn test_obstacle_hit_applies_once() {
        let mut state = running(1);
        // Skip frame-0 spawns
        state.frame_count = 1;
        let p = state.player.pos;
        state.obstacles.push(obstacle_at(99, p.x, p.y - 10.0));

        let events = tick(&mut state, &TickInput::default());
        assert!(events.contains(&GameEvent::ObstacleHit { id: 99, hit_count: 1 }));
        assert_eq!(state.player.speed_multiplier, 0.2);

        // Still overlapping on the next frame, but no second hit
        let events = tick(&mut state, &TickInput::default());
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ObstacleHit { .. })));
        assert_eq!(state.player.hit_count, 1);
    }

    #[test]
    fn test_obstacle_exit_scores_ten_once() {
        let mut state = running(1);
        state.frame_count = 1;
        state.obstacles.push(obstacle_at(7, 0.0, 768.0 - 1.0));

        let events = tick(&mut state, &TickInput::default());
        assert!(events.contains(&GameEvent::ObstaclePassed { id: 7 }));
        assert_eq!(state.score, 10);
        assert!(state.obstacles.iter().all(|o| o.id != 7));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_coin_collect_and_miss() {
        let mut state = running(1);
        state.frame_count = 1;
        let center = state.player.center();
        let speed = state.game_speed;
        state.coins.push(Coin {
            id: 50,
            center: Vec2::new(center.x, center.y - speed),
            radius: 15.0,
            expired: false,
        });
        state.coins.push(Coin {
            id: 51,
            center: Vec2::new(10.0, 768.0),
            radius: 15.0,
            expired: false,
        });

        let events = tick(&mut state, &TickInput::default());
        assert!(events.contains(&GameEvent::CoinCollected { id: 50 }));
        assert_eq!(state.score, 50);
        assert!(state.coins.is_empty());
    }

    #[test]
    fn test_caught_once() {
        let mut state = running(1);
        state.frame_count = 1;
        state.pursuer.pos = state.player.pos;

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::Caught { .. }))
                .count(),
            1
        );
        assert!(tick(&mut state, &TickInput::default()).is_empty());
    }

    #[test]
    fn test_autopilot_dodges_overhead_obstacle() {
        let mut state = running(1);
        let p = state.player.rect();
        // Slightly right of the player's center, about to land
        state
            .obstacles
            .push(obstacle_at(1, p.center().x - 20.0, p.top() - 70.0));
        let steer = autopilot(&state);
        assert_eq!(steer, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_determinism() {
        let mut state1 = running(99999);
        let mut state2 = running(99999);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..2000 {
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }
        assert_eq!(state1.frame_count, state2.frame_count);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.obstacles.len(), state2.obstacles.len());
    }
}
