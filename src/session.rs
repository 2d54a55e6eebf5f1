//! One play session: state, pools, timeline and the per-frame tick.
//!
//! The session is the only mutator of its pools.  Pointer input is queued
//! and resolved at the start of the next `tick`, before time advances, so a
//! click always wins over an escape falling due in the same tick.

use std::collections::VecDeque;

use rand::Rng;
use tracing::{debug, info};

use crate::collision::{hit_test, points_for};
use crate::config::GameConfig;
use crate::effects::{Effect, EffectKind};
use crate::entities::{Animation, Creature, CreatureKind, GameOverReason, GameStatus, Vec2, Viewport};
use crate::pool::{EntityPool, PoolHandle};
use crate::schedule::{Deferred, Timeline};
use crate::spawn::{plan_spawn, SpawnTimer};
use crate::state::GameState;

/// Everything the presentation layer may want to react to.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Spawned { handle: PoolHandle, kind: CreatureKind },
    Hit { handle: PoolHandle, kind: CreatureKind, at: Vec2, points: u32, combo_bonus: u32 },
    Missed { at: Vec2 },
    Escaped { kind: CreatureKind, lives_left: u32 },
    LevelUp { level: u32 },
    NewHighScore(u64),
    GameOver(GameOverReason),
}

/// End-of-game statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameSummary {
    pub final_score: u64,
    pub level: u32,
    pub kills: u32,
    pub max_combo: u32,
    pub lives_lost: u32,
    pub new_high_score: bool,
    /// Record held when this session started.
    pub previous_high_score: u64,
    pub duration_ms: u64,
}

pub struct Session {
    state: GameState,
    viewport: Viewport,
    creatures: EntityPool<Creature>,
    effects: EntityPool<Effect>,
    timeline: Timeline,
    spawner: SpawnTimer,
    pending_clicks: VecDeque<Vec2>,
    now_ms: u64,
    started_at_ms: u64,
    opening_high_score: u64,
}

impl Session {
    pub fn new(config: &GameConfig, high_score: u64) -> Self {
        Self {
            state: GameState::new(config.rules.clone(), high_score),
            viewport: config.viewport,
            creatures: EntityPool::new(config.pool.creatures),
            effects: EntityPool::new(config.pool.effects),
            timeline: Timeline::new(),
            spawner: SpawnTimer::new(),
            pending_clicks: VecDeque::new(),
            now_ms: 0,
            started_at_ms: 0,
            opening_high_score: high_score,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Consume the one-shot level-up flag.
    pub fn take_level_up(&mut self) -> bool {
        self.state.take_level_up()
    }

    pub fn creatures(&self) -> &EntityPool<Creature> {
        &self.creatures
    }

    pub fn effects(&self) -> &EntityPool<Effect> {
        &self.effects
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn summary(&self) -> GameSummary {
        let s = &self.state;
        GameSummary {
            final_score: s.score,
            level: s.level,
            kills: s.kills,
            max_combo: s.max_combo,
            lives_lost: s.rules().starting_lives.saturating_sub(s.lives),
            new_high_score: s.score > self.opening_high_score,
            previous_high_score: self.opening_high_score,
            duration_ms: self.now_ms - self.started_at_ms,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    pub fn start(&mut self) -> bool {
        let started = self.state.start();
        if started {
            self.started_at_ms = self.now_ms;
            self.opening_high_score = self.state.high_score;
            info!(high_score = self.state.high_score, "session started");
        }
        started
    }

    /// Throw away the current game and begin a new one.  The high score is
    /// kept.
    pub fn restart(&mut self) {
        self.clear_field();
        self.spawner.reset();
        self.state.reset();
        self.start();
    }

    /// Queue a pointer-down at world coordinates for the next tick.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if self.state.is_running() {
            self.pending_clicks.push_back(Vec2::new(x, y));
        }
    }

    // ── Per-frame update ─────────────────────────────────────────────────────

    /// Advance the session by `dt_ms`.  Does nothing unless running.
    pub fn tick(&mut self, dt_ms: u64, rng: &mut impl Rng) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.state.is_running() {
            return events;
        }

        // 1. Clicks, against what was on screen
        while let Some(at) = self.pending_clicks.pop_front() {
            self.resolve_click(at, &mut events);
        }

        // 2. Clock and motion
        self.now_ms += dt_ms;
        let now = self.now_ms;
        for (_, creature) in self.creatures.iter_mut() {
            if !creature.hurt {
                creature.advance_to(now);
            }
        }

        // 3. Deferred events
        while let Some(deferred) = self.timeline.pop_due(now) {
            self.run_deferred(deferred, &mut events);
            if !self.state.is_running() {
                return events;
            }
        }

        // 4. Spawning
        let fired = self.spawner.advance(dt_ms, self.state.spawn_interval_ms);
        for _ in 0..fired {
            if let Some(handle) = self.spawn(rng) {
                let kind = self.creatures.get(handle).map(|c| c.kind);
                if let Some(kind) = kind {
                    events.push(GameEvent::Spawned { handle, kind });
                }
            }
        }

        // 5. Game over
        let reason = if self.state.lives == 0 {
            Some(GameOverReason::OutOfLives)
        } else if self.creatures.active_count() >= self.state.max_concurrent {
            Some(GameOverReason::Overwhelmed)
        } else {
            None
        };
        if let Some(reason) = reason {
            self.finish(reason, &mut events);
        }

        events
    }

    /// Put one creature on the field if there is room.
    pub fn spawn(&mut self, rng: &mut impl Rng) -> Option<PoolHandle> {
        if !self.state.is_running() || self.creatures.active_count() >= self.state.max_concurrent {
            return None;
        }
        let plan = plan_spawn(
            rng,
            &self.viewport,
            self.state.level,
            self.state.rules().speed_bonus_per_level,
        );
        let now = self.now_ms;
        let handle = self.creatures.acquire();
        let creature = self.creatures.get_mut(handle)?;
        *creature = Creature {
            kind: plan.kind,
            position: Vec2::new(plan.start_x, plan.y),
            start_x: plan.start_x,
            end_x: plan.end_x,
            direction: plan.side.direction(),
            speed: plan.speed,
            spawned_at_ms: now,
            escape_at_ms: now + plan.duration_ms,
            animation: Some(plan.kind.travel_animation()),
            // Sprites face left; flip the ones walking right.
            flip_x: plan.side.direction() > 0,
            ..Creature::default()
        };
        self.timeline.schedule(now + plan.duration_ms, Deferred::Escape(handle));
        debug!(kind = plan.kind.name(), side = ?plan.side, speed = plan.speed, "spawned");
        Some(handle)
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn resolve_click(&mut self, at: Vec2, events: &mut Vec<GameEvent>) {
        self.add_effect(EffectKind::MuzzleFlash, at);

        let Some(handle) = hit_test(&self.creatures, at.x, at.y) else {
            self.state.reset_combo();
            events.push(GameEvent::Missed { at });
            return;
        };
        let Some(creature) = self.creatures.get_mut(handle) else {
            return;
        };

        let kind = creature.kind;
        creature.hurt = true;
        self.timeline.cancel(Deferred::Escape(handle));
        match kind.animation_ms(Animation::Hurt) {
            Some(ms) => {
                creature.animation = Some(Animation::Hurt);
                self.timeline.schedule(self.now_ms + ms, Deferred::HurtFinished(handle));
            }
            None => {
                self.creatures.release(handle);
            }
        }
        self.add_effect(EffectKind::Explosion, at);

        let points = points_for(kind, self.state.level);
        let outcome = self.state.add_score(points);
        events.push(GameEvent::Hit {
            handle,
            kind,
            at,
            points,
            combo_bonus: outcome.combo_bonus,
        });
        if outcome.leveled_up {
            let center = Vec2::new(self.viewport.width / 2.0, self.viewport.height / 2.0 - 50.0);
            self.add_effect(EffectKind::Celebration, center);
            events.push(GameEvent::LevelUp { level: self.state.level });
        }
        if outcome.new_high_score {
            events.push(GameEvent::NewHighScore(self.state.high_score));
        }
    }

    fn run_deferred(&mut self, deferred: Deferred, events: &mut Vec<GameEvent>) {
        match deferred {
            Deferred::Escape(handle) => {
                let Some(creature) = self.creatures.get(handle) else {
                    return;
                };
                if creature.hurt {
                    return;
                }
                let kind = creature.kind;
                self.creatures.release(handle);
                let out_of_lives = self.state.lose_life();
                debug!(kind = kind.name(), lives = self.state.lives, "escaped");
                events.push(GameEvent::Escaped { kind, lives_left: self.state.lives });
                if out_of_lives {
                    self.finish(GameOverReason::OutOfLives, events);
                }
            }
            Deferred::HurtFinished(handle) => {
                self.creatures.release(handle);
            }
            Deferred::EffectExpired(handle) => {
                self.effects.release(handle);
            }
        }
    }

    fn add_effect(&mut self, kind: EffectKind, at: Vec2) {
        let handle = self.effects.acquire();
        if let Some(effect) = self.effects.get_mut(handle) {
            *effect = Effect { kind, position: at, started_at_ms: self.now_ms };
        }
        self.timeline
            .schedule(self.now_ms + kind.lifetime_ms(), Deferred::EffectExpired(handle));
    }

    fn finish(&mut self, reason: GameOverReason, events: &mut Vec<GameEvent>) {
        if self.state.status != GameStatus::Running {
            return;
        }
        self.state.end(reason);
        self.clear_field();
        events.push(GameEvent::GameOver(reason));
    }

    fn clear_field(&mut self) {
        self.timeline.clear();
        self.creatures.release_all();
        self.effects.release_all();
        self.pending_clicks.clear();
    }
}
