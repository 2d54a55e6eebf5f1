//! All game entity types: plain data plus the fixed per-kind tables.

use serde::{Deserialize, Serialize};

use crate::pool::Poolable;

// ── Creature kinds ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureKind {
    /// Flying pterosaur, spawns high in the sky.
    Alanqa,
    Baryonyx,
    Carnotaurus,
    Oviraptor,
    Styracosaurus,
}

impl CreatureKind {
    pub const ALL: [CreatureKind; 5] = [
        CreatureKind::Alanqa,
        CreatureKind::Baryonyx,
        CreatureKind::Carnotaurus,
        CreatureKind::Oviraptor,
        CreatureKind::Styracosaurus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CreatureKind::Alanqa => "Alanqa",
            CreatureKind::Baryonyx => "Baryonyx",
            CreatureKind::Carnotaurus => "Carnotaurus",
            CreatureKind::Oviraptor => "Oviraptor",
            CreatureKind::Styracosaurus => "Styracosaurus",
        }
    }

    /// Base traversal speed in pixels per second, before the level bonus.
    pub fn base_speed(self) -> f32 {
        match self {
            CreatureKind::Alanqa => 70.0,
            CreatureKind::Baryonyx => 45.0,
            CreatureKind::Carnotaurus => 55.0,
            CreatureKind::Oviraptor => 60.0,
            CreatureKind::Styracosaurus => 40.0,
        }
    }

    /// Points awarded for a hit at level 0, before the level multiplier.
    pub fn base_points(self) -> u32 {
        match self {
            CreatureKind::Alanqa => 150,
            CreatureKind::Baryonyx => 100,
            CreatureKind::Carnotaurus => 125,
            CreatureKind::Oviraptor => 75,
            CreatureKind::Styracosaurus => 100,
        }
    }

    pub fn is_flying(self) -> bool {
        matches!(self, CreatureKind::Alanqa)
    }

    /// Animation played while crossing the screen.
    pub fn travel_animation(self) -> Animation {
        if self.is_flying() {
            Animation::Fly
        } else {
            Animation::Walk
        }
    }

    /// Number of sprite frames for `anim`, or `None` when the kind has no
    /// such animation.
    pub fn frame_count(self, anim: Animation) -> Option<u32> {
        use Animation::*;
        let frames = match (self, anim) {
            (CreatureKind::Alanqa, Dead) => 2,
            (CreatureKind::Alanqa, Fly) => 4,
            (CreatureKind::Alanqa, Hurt) => 3,
            (CreatureKind::Alanqa, _) => return None,

            (CreatureKind::Baryonyx, Attack) => 7,
            (CreatureKind::Baryonyx, Dead) => 5,
            (CreatureKind::Baryonyx, Hurt) => 3,
            (CreatureKind::Baryonyx, Idle) => 6,
            (CreatureKind::Baryonyx, Walk) => 12,

            (CreatureKind::Carnotaurus, Attack) => 6,
            (CreatureKind::Carnotaurus, Dead) => 7,
            (CreatureKind::Carnotaurus, Hurt) => 3,
            (CreatureKind::Carnotaurus, Idle) => 6,
            (CreatureKind::Carnotaurus, Walk) => 11,

            (CreatureKind::Oviraptor, Attack) => 6,
            (CreatureKind::Oviraptor, Dead) => 7,
            (CreatureKind::Oviraptor, Hurt) => 4,
            (CreatureKind::Oviraptor, Idle) => 6,
            (CreatureKind::Oviraptor, Walk) => 9,

            (CreatureKind::Styracosaurus, Attack) => 7,
            (CreatureKind::Styracosaurus, Dead) => 4,
            (CreatureKind::Styracosaurus, Hurt) => 3,
            (CreatureKind::Styracosaurus, Idle) => 6,
            (CreatureKind::Styracosaurus, Walk) => 12,

            (_, Fly) => return None,
        };
        Some(frames)
    }

    /// Play time of a one-shot animation in milliseconds, rounded up.
    pub fn animation_ms(self, anim: Animation) -> Option<u64> {
        let frames = self.frame_count(anim)? as u64;
        let fps = anim.frame_rate() as u64;
        Some((frames * 1000).div_ceil(fps))
    }

    /// Unscaled sprite size in pixels (width, height).
    pub fn sprite_size(self) -> (f32, f32) {
        match self {
            CreatureKind::Alanqa => (260.0, 180.0),
            CreatureKind::Baryonyx => (320.0, 220.0),
            CreatureKind::Carnotaurus => (300.0, 230.0),
            CreatureKind::Oviraptor => (220.0, 200.0),
            CreatureKind::Styracosaurus => (330.0, 210.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Animation {
    Walk,
    Fly,
    Idle,
    Attack,
    Hurt,
    Dead,
}

impl Animation {
    pub fn frame_rate(self) -> u32 {
        match self {
            Animation::Walk | Animation::Fly => 12,
            Animation::Idle | Animation::Dead => 8,
            Animation::Attack => 15,
            Animation::Hurt => 10,
        }
    }

    pub fn loops(self) -> bool {
        matches!(self, Animation::Walk | Animation::Fly | Animation::Idle)
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Size of the logical play field in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 800.0, height: 600.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Horizontal direction of travel for a creature entering from this side.
    pub fn direction(self) -> i8 {
        match self {
            Side::Left => 1,
            Side::Right => -1,
        }
    }
}

// ── Creature ──────────────────────────────────────────────────────────────────

pub const DEFAULT_SCALE: f32 = 0.4;

/// A pooled dinosaur.  Only meaningful while its pool slot is active.
#[derive(Clone, Debug, PartialEq)]
pub struct Creature {
    pub kind: CreatureKind,
    pub position: Vec2,
    pub start_x: f32,
    pub end_x: f32,
    /// +1 moving right, −1 moving left.
    pub direction: i8,
    /// Pixels per second.
    pub speed: f32,
    pub spawned_at_ms: u64,
    /// Clock time at which the creature escapes unless hit first.
    pub escape_at_ms: u64,
    pub hurt: bool,
    pub scale: f32,
    pub flip_x: bool,
    pub animation: Option<Animation>,
}

impl Default for Creature {
    fn default() -> Self {
        Self {
            kind: CreatureKind::Baryonyx,
            position: Vec2::default(),
            start_x: 0.0,
            end_x: 0.0,
            direction: 1,
            speed: 0.0,
            spawned_at_ms: 0,
            escape_at_ms: 0,
            hurt: false,
            scale: DEFAULT_SCALE,
            flip_x: false,
            animation: None,
        }
    }
}

impl Poolable for Creature {}

impl Creature {
    /// Move along the traversal line to where the creature is at `now_ms`.
    /// Never overshoots `end_x`.
    pub fn advance_to(&mut self, now_ms: u64) {
        let elapsed = now_ms.saturating_sub(self.spawned_at_ms) as f32 / 1000.0;
        let travelled = self.speed * elapsed;
        let total = (self.end_x - self.start_x).abs();
        self.position.x = self.start_x + f32::from(self.direction) * travelled.min(total);
    }
}

// ── Status ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    NotRunning,
    Running,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Lives reached zero.
    OutOfLives,
    /// Active creatures reached the concurrent cap.
    Overwhelmed,
}
