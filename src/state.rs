//! Score, lives, level and difficulty: the session-wide game state.
//!
//! Pure data plus transition rules.  Nothing here performs I/O: persisting
//! a new high score is left to whoever receives the [`ScoreOutcome`].

use serde::Serialize;
use tracing::{debug, info};

use crate::config::Rules;
use crate::entities::{GameOverReason, GameStatus};

// ── Difficulty schedule ──────────────────────────────────────────────────────

/// Spawn-interval step and floor for the tier that `level` falls in.
fn interval_tier(level: u32) -> (u64, u64) {
    match level {
        0..=2 => (200, 800),
        3..=5 => (160, 500),
        _ => (140, 300),
    }
}

const EARLY_CREATURE_CAP: usize = 10;
const LATE_CREATURE_CAP: usize = 12;
/// Level-ups leaving a level at or below this always add a creature.
const EARLY_LEVELS: u32 = 4;

// ── State ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct GameState {
    rules: Rules,
    pub score: u64,
    pub high_score: u64,
    pub lives: u32,
    pub level: u32,
    pub spawn_interval_ms: u64,
    pub max_concurrent: usize,
    pub combo: u32,
    pub max_combo: u32,
    pub kills: u32,
    pub status: GameStatus,
    pub game_over_reason: Option<GameOverReason>,
    level_up_pending: bool,
}

/// What a single [`GameState::add_score`] call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreOutcome {
    pub points: u32,
    pub combo_bonus: u32,
    pub leveled_up: bool,
    pub new_high_score: bool,
}

/// Read-only view for HUD and telemetry consumers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub score: u64,
    pub high_score: u64,
    pub lives: u32,
    pub level: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub kills: u32,
    pub spawn_interval_ms: u64,
    pub max_concurrent: usize,
    pub status: GameStatus,
}

impl GameState {
    pub fn new(rules: Rules, high_score: u64) -> Self {
        Self {
            score: 0,
            high_score,
            lives: rules.starting_lives,
            level: 1,
            spawn_interval_ms: rules.starting_spawn_interval_ms,
            max_concurrent: rules.starting_max_creatures,
            combo: 0,
            max_combo: 0,
            kills: 0,
            status: GameStatus::NotRunning,
            game_over_reason: None,
            level_up_pending: false,
            rules,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    /// NotRunning → Running.  Returns `false` from any other status; a
    /// finished game has to be `reset` first.
    pub fn start(&mut self) -> bool {
        if self.status != GameStatus::NotRunning {
            return false;
        }
        self.status = GameStatus::Running;
        true
    }

    /// Running → GameOver.
    pub fn end(&mut self, reason: GameOverReason) {
        if self.status == GameStatus::Running {
            info!(?reason, score = self.score, level = self.level, "game over");
            self.status = GameStatus::GameOver;
            self.game_over_reason = Some(reason);
        }
    }

    /// Credit a hit worth `points`.
    ///
    /// The combo counter is bumped first, so the bonus only kicks in from
    /// the second consecutive hit.
    pub fn add_score(&mut self, points: u32) -> ScoreOutcome {
        self.score += u64::from(points);
        self.kills += 1;
        self.combo += 1;

        let combo_bonus = if self.combo > 1 {
            self.combo * self.rules.combo_bonus_per_hit
        } else {
            0
        };
        self.score += u64::from(combo_bonus);
        self.max_combo = self.max_combo.max(self.combo);

        let leveled_up = self.rules.kills_per_level > 0 && self.kills % self.rules.kills_per_level == 0;
        if leveled_up {
            self.level_up();
        }

        let new_high_score = self.score > self.high_score;
        if new_high_score {
            self.high_score = self.score;
        }

        ScoreOutcome { points, combo_bonus, leveled_up, new_high_score }
    }

    /// Advance one level.  Each step subtracts from the current interval, so
    /// the result depends on the path taken, not only on the final level.
    pub fn level_up(&mut self) {
        let previous = self.level;
        self.level += 1;

        let (step, floor) = interval_tier(self.level);
        self.spawn_interval_ms = self.spawn_interval_ms.saturating_sub(step).max(floor);

        let cap = if previous <= EARLY_LEVELS {
            Some(EARLY_CREATURE_CAP)
        } else if self.level % 2 == 0 {
            Some(LATE_CREATURE_CAP)
        } else {
            None
        };
        // A configured start above the tier cap is kept, never lowered.
        if let Some(cap) = cap {
            if self.max_concurrent < cap {
                self.max_concurrent += 1;
            }
        }

        self.level_up_pending = true;
        debug!(
            level = self.level,
            spawn_interval_ms = self.spawn_interval_ms,
            max_concurrent = self.max_concurrent,
            "level up"
        );
    }

    /// Lose one life (never below zero) and break the combo.  Returns `true`
    /// once no lives are left.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.combo = 0;
        self.lives == 0
    }

    pub fn reset_combo(&mut self) {
        self.combo = 0;
    }

    /// Back to a fresh, not-yet-started game.  The high score survives.
    pub fn reset(&mut self) {
        *self = Self::new(self.rules.clone(), self.high_score);
    }

    /// Consume the one-shot level-up flag.
    pub fn take_level_up(&mut self) -> bool {
        std::mem::take(&mut self.level_up_pending)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            score: self.score,
            high_score: self.high_score,
            lives: self.lives,
            level: self.level,
            combo: self.combo,
            max_combo: self.max_combo,
            kills: self.kills,
            spawn_interval_ms: self.spawn_interval_ms,
            max_concurrent: self.max_concurrent,
            status: self.status,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Rules::default(), 0)
    }
}
