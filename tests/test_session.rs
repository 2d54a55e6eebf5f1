use dino_stopper::collision::{creature_bounds, points_for};
use dino_stopper::config::GameConfig;
use dino_stopper::entities::{Animation, GameOverReason, GameStatus};
use dino_stopper::pool::PoolHandle;
use dino_stopper::session::{GameEvent, Session};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Session that never spawns on its own, so tests place creatures by hand.
fn quiet_session() -> Session {
    let mut config = GameConfig::default();
    config.rules.starting_spawn_interval_ms = 10_000_000;
    let mut s = Session::new(&config, 0);
    s.start();
    s
}

fn center_of(s: &Session, h: PoolHandle) -> (f32, f32) {
    creature_bounds(s.creatures().get(h).unwrap()).center()
}

fn escape_at(s: &Session, h: PoolHandle) -> u64 {
    s.creatures().get(h).unwrap().escape_at_ms
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn tick_does_nothing_before_start() {
    let mut s = Session::new(&GameConfig::default(), 0);
    let events = s.tick(5_000, &mut seeded_rng());
    assert!(events.is_empty());
    assert_eq!(s.now_ms(), 0);
    assert_eq!(s.creatures().active_count(), 0);
}

#[test]
fn spawn_timer_fires_on_interval() {
    let mut s = Session::new(&GameConfig::default(), 0);
    s.start();
    let mut rng = seeded_rng();

    assert!(s.tick(1_399, &mut rng).is_empty());
    let events = s.tick(1, &mut rng);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], GameEvent::Spawned { .. }));
    assert_eq!(s.creatures().active_count(), 1);
}

#[test]
fn spawned_creature_gets_speed_side_and_deadline() {
    let mut s = quiet_session();
    let h = s.spawn(&mut seeded_rng()).unwrap();
    let c = s.creatures().get(h).unwrap().clone();

    assert_eq!(c.speed, c.kind.base_speed() + 12.0);
    assert_eq!((c.end_x - c.start_x).abs(), 1000.0);
    assert_eq!(c.direction as f32, (c.end_x - c.start_x).signum());
    assert_eq!(c.flip_x, c.direction > 0);
    assert_eq!(c.animation, Some(c.kind.travel_animation()));
    assert!(c.escape_at_ms > 0);
    if c.kind.is_flying() {
        assert!((100.0..=250.0).contains(&c.position.y));
    } else {
        assert!((480.0..=540.0).contains(&c.position.y));
    }
}

#[test]
fn spawn_respects_creature_cap() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    for _ in 0..6 {
        assert!(s.spawn(&mut rng).is_some());
    }
    assert!(s.spawn(&mut rng).is_none());
    assert_eq!(s.creatures().active_count(), 6);
}

// ── Escape ────────────────────────────────────────────────────────────────────

#[test]
fn unhit_creature_escapes_and_costs_a_life() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    let h = s.spawn(&mut rng).unwrap();
    let deadline = escape_at(&s, h);

    assert!(s.tick(deadline - 1, &mut rng).is_empty());
    assert!(s.creatures().is_active(h));

    let events = s.tick(1, &mut rng);
    assert!(matches!(events[0], GameEvent::Escaped { lives_left: 2, .. }));
    assert_eq!(s.state().lives, 2);
    assert!(!s.creatures().is_active(h));
}

#[test]
fn creature_moves_linearly_with_time() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    let h = s.spawn(&mut rng).unwrap();
    let c = s.creatures().get(h).unwrap().clone();

    s.tick(1_000, &mut rng);
    let moved = s.creatures().get(h).unwrap().position.x;
    let expected = c.start_x + f32::from(c.direction) * c.speed;
    assert!((moved - expected).abs() < 0.01);
}

#[test]
fn three_escapes_end_the_game() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    let mut last = Vec::new();
    for _ in 0..3 {
        let h = s.spawn(&mut rng).unwrap();
        let wait = escape_at(&s, h) - s.now_ms();
        last = s.tick(wait, &mut rng);
    }
    assert!(last.contains(&GameEvent::GameOver(GameOverReason::OutOfLives)));
    assert_eq!(s.state().status, GameStatus::GameOver);
    assert_eq!(s.state().lives, 0);
}

// ── Hits & misses ─────────────────────────────────────────────────────────────

#[test]
fn hit_scores_level_scaled_points() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    let h = s.spawn(&mut rng).unwrap();
    let kind = s.creatures().get(h).unwrap().kind;
    let (x, y) = center_of(&s, h);

    s.pointer_down(x, y);
    let events = s.tick(0, &mut rng);

    let expected = points_for(kind, 1);
    assert_eq!(expected, kind.base_points() * 3 / 2);
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::Hit { points, combo_bonus: 0, .. } if *points == expected
    )));
    assert_eq!(s.state().score, u64::from(expected));
    assert_eq!(s.state().kills, 1);
}

#[test]
fn hit_creature_is_hurt_then_released_and_never_escapes() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    let h = s.spawn(&mut rng).unwrap();
    let kind = s.creatures().get(h).unwrap().kind;
    let deadline = escape_at(&s, h);
    let (x, y) = center_of(&s, h);

    s.pointer_down(x, y);
    s.tick(0, &mut rng);
    let c = s.creatures().get(h).unwrap();
    assert!(c.hurt);
    assert_eq!(c.animation, Some(Animation::Hurt));

    let hurt_ms = kind.animation_ms(Animation::Hurt).unwrap();
    s.tick(hurt_ms, &mut rng);
    assert!(!s.creatures().is_active(h));

    let events = s.tick(deadline, &mut rng);
    assert!(events.iter().all(|e| !matches!(e, GameEvent::Escaped { .. })));
    assert_eq!(s.state().lives, 3);
}

#[test]
fn hurt_creature_cannot_be_hit_twice() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    let h = s.spawn(&mut rng).unwrap();
    let (x, y) = center_of(&s, h);

    s.pointer_down(x, y);
    s.pointer_down(x, y);
    let events = s.tick(0, &mut rng);
    let hits = events.iter().filter(|e| matches!(e, GameEvent::Hit { .. })).count();
    let misses = events.iter().filter(|e| matches!(e, GameEvent::Missed { .. })).count();
    assert_eq!((hits, misses), (1, 1));
    assert_eq!(s.state().kills, 1);
    assert_eq!(s.state().combo, 0);
}

#[test]
fn click_beats_escape_in_the_same_tick() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    let h = s.spawn(&mut rng).unwrap();
    let deadline = escape_at(&s, h);
    let (x, y) = center_of(&s, h);

    s.pointer_down(x, y);
    let events = s.tick(deadline + 500, &mut rng);
    assert!(matches!(events[0], GameEvent::Hit { .. }));
    assert!(events.iter().all(|e| !matches!(e, GameEvent::Escaped { .. })));
    assert_eq!(s.state().lives, 3);
}

#[test]
fn consecutive_hits_build_combo_bonus() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    let a = s.spawn(&mut rng).unwrap();
    let (ax, ay) = center_of(&s, a);
    s.pointer_down(ax, ay);
    s.tick(0, &mut rng);

    let b = s.spawn(&mut rng).unwrap();
    let (bx, by) = center_of(&s, b);
    s.pointer_down(bx, by);
    let events = s.tick(0, &mut rng);
    assert!(events.iter().any(|e| matches!(e, GameEvent::Hit { combo_bonus: 10, .. })));
    assert_eq!(s.state().combo, 2);
}

#[test]
fn miss_only_resets_combo() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    let a = s.spawn(&mut rng).unwrap();
    let (x, y) = center_of(&s, a);
    s.pointer_down(x, y);
    s.tick(0, &mut rng);
    let before = s.state().snapshot();

    // Top-left corner: nothing ever walks there.
    s.pointer_down(1.0, 1.0);
    let events = s.tick(0, &mut rng);
    assert!(matches!(events[0], GameEvent::Missed { .. }));

    let after = s.state().snapshot();
    assert_eq!(after.combo, 0);
    assert_eq!(after.max_combo, before.max_combo);
    assert_eq!(after.score, before.score);
    assert_eq!(after.lives, before.lives);
    assert_eq!(after.kills, before.kills);
}

#[test]
fn new_high_score_is_reported() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    let h = s.spawn(&mut rng).unwrap();
    let (x, y) = center_of(&s, h);
    s.pointer_down(x, y);
    let events = s.tick(0, &mut rng);
    let score = s.state().score;
    assert!(events.contains(&GameEvent::NewHighScore(score)));
    assert_eq!(s.state().high_score, score);
}

#[test]
fn eighth_kill_levels_up() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    let mut level_events = 0;
    for _ in 0..8 {
        let h = s.spawn(&mut rng).unwrap();
        let (x, y) = center_of(&s, h);
        s.pointer_down(x, y);
        let events = s.tick(0, &mut rng);
        level_events += events.iter().filter(|e| matches!(e, GameEvent::LevelUp { .. })).count();
        // Let the hurt animation finish so the field stays clear.
        s.tick(1_000, &mut rng);
    }
    assert_eq!(level_events, 1);
    assert_eq!(s.state().level, 2);
    assert_eq!(s.state().spawn_interval_ms, 10_000_000 - 200);
    assert_eq!(s.state().max_concurrent, 7);
    assert!(s.take_level_up());
}

// ── Game over ─────────────────────────────────────────────────────────────────

#[test]
fn full_field_overwhelms_the_player() {
    let mut s = Session::new(&GameConfig::default(), 0);
    s.start();
    let mut rng = seeded_rng();

    let mut over = None;
    while over.is_none() {
        for ev in s.tick(100, &mut rng) {
            if let GameEvent::GameOver(reason) = ev {
                over = Some(reason);
            }
        }
        assert!(s.now_ms() < 60_000, "game never ended");
    }

    // Six spawns at 1400ms apart; nothing escapes that fast.
    assert_eq!(over, Some(GameOverReason::Overwhelmed));
    assert_eq!(s.now_ms(), 8_400);
    assert_eq!(s.state().lives, 3);
    assert_eq!(s.creatures().active_count(), 0);
    assert_eq!(s.effects().active_count(), 0);
}

#[test]
fn game_over_freezes_session_until_restart() {
    let mut s = Session::new(&GameConfig::default(), 0);
    s.start();
    let mut rng = seeded_rng();
    while s.state().is_running() {
        s.tick(700, &mut rng);
    }
    let frozen = s.now_ms();
    assert!(s.tick(10_000, &mut rng).is_empty());
    assert_eq!(s.now_ms(), frozen);

    s.pointer_down(400.0, 500.0);
    s.restart();
    assert!(s.state().is_running());
    assert_eq!(s.state().lives, 3);
    assert_eq!(s.creatures().active_count(), 0);
    // Queued clicks from the old game are gone.
    assert!(s.tick(0, &mut rng).is_empty());
}

#[test]
fn restart_keeps_high_score_and_summary_tracks_the_record() {
    let mut s = Session::new(&GameConfig::default(), 500);
    s.start();
    let mut rng = seeded_rng();
    let h = s.spawn(&mut rng).unwrap();
    let (x, y) = center_of(&s, h);
    s.pointer_down(x, y);
    s.tick(0, &mut rng);

    let summary = s.summary();
    assert_eq!(summary.previous_high_score, 500);
    assert_eq!(summary.kills, 1);
    assert_eq!(summary.lives_lost, 0);
    assert!(!summary.new_high_score);

    s.restart();
    assert_eq!(s.state().high_score, 500);
    assert_eq!(s.state().score, 0);
}
