//! End-to-end session scenarios on a desktop-sized board

use dodge_chase::consts::HIGH_SCORE_KEY;
use dodge_chase::platform::{KeyValueStore, MemoryStore};
use dodge_chase::sim::{Coin, GameEvent, GamePhase, TickInput, Viewport};
use dodge_chase::{Session, Tuning};
use glam::Vec2;

fn desktop_session(store: MemoryStore) -> Session<MemoryStore> {
    Session::new(store, Tuning::default(), Viewport::new(1280.0, 720.0))
}

fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

/// Mark every live obstacle as already spent so nothing can hit the player
fn neutralize_obstacles(session: &mut Session<MemoryStore>) {
    for obstacle in session.state_mut().obstacles.iter_mut() {
        obstacle.has_hit = true;
    }
}

#[test]
fn test_fresh_start() {
    let mut session = desktop_session(MemoryStore::default());
    session.start(7);
    let state = session.state();
    assert_eq!(state.phase, GamePhase::Running);
    assert_eq!(state.score, 0);
    assert_eq!(state.game_speed, 3.5);
    assert_eq!(state.player.size, Vec2::splat(50.0));
    assert_eq!(state.player.pos, Vec2::new(615.0, 360.0));
    assert_eq!(state.pursuer.pos, Vec2::new(595.0, 820.0));
}

#[test]
fn test_seventy_frames_spawn_one_obstacle() {
    let mut session = desktop_session(MemoryStore::default());
    session.start(7);
    let mut spawned = 0;
    for _ in 0..70 {
        let events = session.frame(&TickInput::default());
        spawned += count(&events, |e| matches!(e, GameEvent::ObstacleSpawned { .. }));
    }
    assert!(session.is_running());
    assert_eq!(spawned, 1);

    // Frame 70 is the next slot
    let events = session.frame(&TickInput::default());
    assert_eq!(
        count(&events, |e| matches!(e, GameEvent::ObstacleSpawned { .. })),
        1
    );
}

#[test]
fn test_six_hundred_frames_reach_speed_four() {
    let mut session = desktop_session(MemoryStore::default());
    session.start(11);
    for _ in 0..600 {
        session.frame(&TickInput::default());
        neutralize_obstacles(&mut session);
    }
    assert!(session.is_running());
    assert_eq!(session.state().frame_count, 600);
    assert_eq!(session.state().game_speed, 4.0);

    session.frame(&TickInput::default());
    assert_eq!(session.state().game_speed, 4.5);
}

#[test]
fn test_max_hit_tier_brings_pursuer_onto_player() {
    let mut session = desktop_session(MemoryStore::default());
    session.start(3);
    {
        let state = session.state_mut();
        state.player.hit_count = 4;
        state.player.frames_since_hit = 0;
    }
    let state = session.state();
    let target = state.pursuer.target(&state.player, &state.tuning);
    assert_eq!(target.y, state.player.pos.y - 5.0);

    let mut caught = 0;
    for _ in 0..110 {
        let events = session.frame(&TickInput::default());
        neutralize_obstacles(&mut session);
        caught += count(&events, |e| matches!(e, GameEvent::Caught { .. }));
        if !session.is_running() {
            break;
        }
    }
    assert_eq!(caught, 1);
    assert_eq!(session.phase(), GamePhase::GameOver);

    // Nothing moves after game over
    let frame = session.state().frame_count;
    assert!(session.frame(&TickInput::default()).is_empty());
    assert_eq!(session.state().frame_count, frame);
}

#[test]
fn test_rested_pursuer_never_catches() {
    let mut session = desktop_session(MemoryStore::default());
    session.start(5);
    for _ in 0..1500 {
        session.frame(&TickInput::default());
        neutralize_obstacles(&mut session);
    }
    assert!(session.is_running());
    assert_eq!(session.state().player.hit_count, 0);
}

#[test]
fn test_missed_coin_scores_nothing() {
    let mut session = desktop_session(MemoryStore::default());
    session.start(9);
    session.frame(&TickInput::default());
    let state = session.state_mut();
    state.coins.clear();
    state.obstacles.clear();
    state.coins.push(Coin {
        id: 1000,
        center: Vec2::new(20.0, 719.0),
        radius: 15.0,
        expired: false,
    });

    let events = session.frame(&TickInput::default());
    assert!(!events.contains(&GameEvent::CoinCollected { id: 1000 }));
    assert_eq!(session.score(), 0);
    assert!(session.state().coins.iter().all(|c| c.id != 1000));
}

/// Play a session that ends immediately with `score`
fn finish_with(session: &mut Session<MemoryStore>, score: u64) {
    session.start(1);
    session.state_mut().score = score;
    let pos = session.state().player.pos;
    session.state_mut().pursuer.pos = pos;
    session.frame(&TickInput::default());
    assert_eq!(session.phase(), GamePhase::GameOver);
}

#[test]
fn test_high_score_only_replaced_when_beaten() {
    let mut store = MemoryStore::default();
    store.set(HIGH_SCORE_KEY, "120").unwrap();
    let mut session = desktop_session(store);
    assert_eq!(session.high_score(), 120);

    finish_with(&mut session, 60);
    assert!(!session.is_new_record());
    assert_eq!(session.store().get(HIGH_SCORE_KEY).unwrap().as_deref(), Some("120"));

    finish_with(&mut session, 120);
    assert!(!session.is_new_record());
    assert_eq!(session.high_score(), 120);

    finish_with(&mut session, 300);
    assert!(session.is_new_record());
    assert_eq!(session.high_score(), 300);
    assert_eq!(session.store().get(HIGH_SCORE_KEY).unwrap().as_deref(), Some("300"));
}

#[test]
fn test_corrupt_high_score_reads_as_zero() {
    let mut store = MemoryStore::default();
    store.set(HIGH_SCORE_KEY, "lots").unwrap();
    let session = desktop_session(store);
    assert_eq!(session.high_score(), 0);
}

#[test]
fn test_mobile_profile_start() {
    let mut session = Session::new(
        MemoryStore::default(),
        Tuning::default(),
        Viewport::new(390.0, 844.0),
    );
    session.start(4);
    let state = session.state();
    assert_eq!(state.game_speed, 2.5);
    assert_eq!(state.player.size, Vec2::splat(40.0));
    assert_eq!(state.pursuer.size, Vec2::splat(70.0));
    assert_eq!(state.player.speed, 5.0);
}
