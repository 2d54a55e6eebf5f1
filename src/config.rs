//! Game configuration, loaded once at startup from an optional TOML file.
//!
//! Every section has defaults matching the standard game, so an empty file
//! (or no file at all) gives the regular experience.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entities::Viewport;
use crate::error::{GameError, Result};

/// Tunable gameplay numbers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub starting_lives: u32,
    pub starting_spawn_interval_ms: u64,
    pub starting_max_creatures: usize,
    /// A level-up happens every time the kill count hits a multiple of this.
    pub kills_per_level: u32,
    /// Bonus per combo step, applied from the second consecutive hit.
    pub combo_bonus_per_hit: u32,
    /// Extra pixels per second added to every creature per level.
    pub speed_bonus_per_level: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            starting_spawn_interval_ms: 1400,
            starting_max_creatures: 6,
            kills_per_level: 8,
            combo_bonus_per_hit: 5,
            speed_bonus_per_level: 12,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub creatures: usize,
    pub effects: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { creatures: 15, effects: 20 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub viewport: Viewport,
    pub rules: Rules,
    pub pool: PoolConfig,
    /// Target frame time of the terminal front end.
    pub frame_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            rules: Rules::default(),
            pool: PoolConfig::default(),
            frame_ms: 33,
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig = toml::from_str(&text).map_err(|source| GameError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // The spawn band for ground creatures sits 120px above the bottom edge
        // and flyers need up to y=250.
        if self.viewport.width <= 0.0 || self.viewport.height < 250.0 {
            return Err(GameError::InvalidConfig(format!(
                "viewport {}x{} is too small",
                self.viewport.width, self.viewport.height
            )));
        }
        if self.rules.starting_lives == 0 {
            return Err(GameError::InvalidConfig("starting_lives must be at least 1".into()));
        }
        if self.rules.starting_spawn_interval_ms == 0 {
            return Err(GameError::InvalidConfig(
                "starting_spawn_interval_ms must be positive".into(),
            ));
        }
        if self.rules.starting_max_creatures == 0 {
            return Err(GameError::InvalidConfig(
                "starting_max_creatures must be at least 1".into(),
            ));
        }
        if self.rules.kills_per_level == 0 {
            return Err(GameError::InvalidConfig("kills_per_level must be positive".into()));
        }
        if self.frame_ms == 0 {
            return Err(GameError::InvalidConfig("frame_ms must be positive".into()));
        }
        Ok(())
    }
}
