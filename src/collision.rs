//! Pointer hit testing and hit scoring.

use crate::entities::{Creature, CreatureKind};
use crate::pool::{EntityPool, PoolHandle};

/// Sprite anchor: horizontally centred, near the feet.
const ORIGIN: (f32, f32) = (0.5, 0.9);

/// Axis-aligned screen-space rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    /// Edges count as inside.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.left + self.width && y >= self.top && y <= self.top + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

pub fn creature_bounds(creature: &Creature) -> Bounds {
    let (w, h) = creature.kind.sprite_size();
    let width = w * creature.scale;
    let height = h * creature.scale;
    Bounds {
        left: creature.position.x - width * ORIGIN.0,
        top: creature.position.y - height * ORIGIN.1,
        width,
        height,
    }
}

/// First active, unhurt creature under the point, in slot order.
pub fn hit_test(pool: &EntityPool<Creature>, x: f32, y: f32) -> Option<PoolHandle> {
    pool.iter()
        .find(|(_, c)| !c.hurt && creature_bounds(c).contains(x, y))
        .map(|(handle, _)| handle)
}

/// Points for stopping `kind` at `level`: base × (level / 2 + 1), floored.
pub fn points_for(kind: CreatureKind, level: u32) -> u32 {
    let multiplier = f64::from(level) * 0.5 + 1.0;
    (f64::from(kind.base_points()) * multiplier).floor() as u32
}
