//! Short-lived visual effects (explosions, muzzle flashes, level-up bursts).
//!
//! Effects carry no gameplay meaning.  They live in their own pool and are
//! released when their lifetime runs out.

use crate::entities::Vec2;
use crate::pool::Poolable;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EffectKind {
    #[default]
    Explosion,
    MuzzleFlash,
    Celebration,
}

impl EffectKind {
    pub fn lifetime_ms(self) -> u64 {
        match self {
            EffectKind::Explosion => 500,
            EffectKind::MuzzleFlash => 150,
            EffectKind::Celebration => 1200,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    pub position: Vec2,
    pub started_at_ms: u64,
}

impl Poolable for Effect {}

impl Effect {
    /// Fraction of the lifetime already played, in `0.0..=1.0`.
    pub fn progress(&self, now_ms: u64) -> f32 {
        let elapsed = now_ms.saturating_sub(self.started_at_ms) as f32;
        (elapsed / self.kind.lifetime_ms() as f32).min(1.0)
    }
}
