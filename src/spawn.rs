//! Spawn timing and placement.
//!
//! The timer only counts milliseconds; the caller decides whether a firing
//! actually produces a creature (it is skipped while the field is full).

use rand::Rng;

use crate::entities::{CreatureKind, Side, Viewport};

/// How far outside the viewport creatures enter and leave.
pub const OFFSCREEN_MARGIN: f32 = 100.0;

/// Vertical band for flying kinds, in pixels from the top.
pub const FLYING_BAND: (i32, i32) = (100, 250);
/// Vertical band for ground kinds, in pixels above the bottom edge.
pub const GROUND_BAND: (i32, i32) = (120, 60);

// ── Timer ────────────────────────────────────────────────────────────────────

/// Repeating timer whose period is passed in on every advance, so a new
/// spawn interval takes effect on the very next tick.
#[derive(Clone, Debug, Default)]
pub struct SpawnTimer {
    elapsed_ms: u64,
}

impl SpawnTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `dt_ms` and return how many times the timer fired.
    pub fn advance(&mut self, dt_ms: u64, interval_ms: u64) -> u32 {
        let interval_ms = interval_ms.max(1);
        self.elapsed_ms += dt_ms;
        let mut fired = 0;
        while self.elapsed_ms >= interval_ms {
            self.elapsed_ms -= interval_ms;
            fired += 1;
        }
        fired
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
    }
}

// ── Placement ────────────────────────────────────────────────────────────────

/// Everything needed to put one creature on its way.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnPlan {
    pub kind: CreatureKind,
    pub side: Side,
    pub start_x: f32,
    pub end_x: f32,
    pub y: f32,
    /// Pixels per second.
    pub speed: f32,
    pub duration_ms: u64,
}

pub fn creature_speed(kind: CreatureKind, level: u32, bonus_per_level: u32) -> f32 {
    kind.base_speed() + (level * bonus_per_level) as f32
}

/// Time to cross `distance` pixels at `speed`, rounded up to whole ms.
pub fn traversal_ms(distance: f32, speed: f32) -> u64 {
    if speed <= 0.0 {
        return u64::MAX;
    }
    (distance.abs() / speed * 1000.0).ceil() as u64
}

pub fn plan_spawn(
    rng: &mut impl Rng,
    viewport: &Viewport,
    level: u32,
    speed_bonus_per_level: u32,
) -> SpawnPlan {
    let kind = CreatureKind::ALL[rng.gen_range(0..CreatureKind::ALL.len())];
    let side = if rng.gen_bool(0.5) { Side::Left } else { Side::Right };

    let (start_x, end_x) = match side {
        Side::Left => (-OFFSCREEN_MARGIN, viewport.width + OFFSCREEN_MARGIN),
        Side::Right => (viewport.width + OFFSCREEN_MARGIN, -OFFSCREEN_MARGIN),
    };

    let y = if kind.is_flying() {
        rng.gen_range(FLYING_BAND.0..=FLYING_BAND.1)
    } else {
        let bottom = viewport.height as i32;
        rng.gen_range(bottom - GROUND_BAND.0..=bottom - GROUND_BAND.1)
    } as f32;

    let speed = creature_speed(kind, level, speed_bonus_per_level);
    SpawnPlan {
        kind,
        side,
        start_x,
        end_x,
        y,
        speed,
        duration_ms: traversal_ms(end_x - start_x, speed),
    }
}
