//! Static level collision: a flat list of axis-aligned boxes and an XZ-only
//! capsule resolver for player movement.
//!
//! Only the horizontal plane is resolved. Vertical placement (ground plane,
//! gravity, jumping) belongs to the movement code that calls
//! [`CollisionWorld::resolve_capsule_xz`].

use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};
use strike_math::Aabb;
use tracing::{debug, trace};

/// Maximum resolution passes per call. More than one pass lets a capsule
/// pushed out of one box settle against a neighbouring box (corner sliding).
pub const MAX_RESOLVE_PASSES: usize = 3;

/// A capsule whose bottom is within this distance of a box top counts as
/// standing on it.
pub const STANDING_EPSILON: f32 = 1e-3;

/// Penetration shallower than this is treated as touching, which keeps a
/// freshly resolved position a fixed point under f32 rounding.
const CONTACT_SLOP: f32 = 1e-5;

/// Separations at or below this have no usable push direction.
const MIN_SEPARATION: f32 = 1e-6;

/// One immutable static obstacle.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticBox {
    pub bounds: Aabb,
    /// Free-form level tag ("wall", "crate", ...).
    pub kind: String,
}

/// Outcome of [`CollisionWorld::resolve_capsule_xz`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapsuleResolution {
    /// Corrected capsule center. Y is always the input Y.
    pub position: Vec3,
    /// True if at least one push was applied in any pass.
    pub collided: bool,
}

/// Owns the level's static obstacles.
#[derive(Resource, Debug, Clone, Default)]
pub struct CollisionWorld {
    boxes: Vec<StaticBox>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a box described by its center and half-extents.
    pub fn add_box(&mut self, kind: impl Into<String>, half_extents: Vec3, center: Vec3) {
        let bounds = Aabb::from_center_half_extents(center, half_extents);
        let kind = kind.into();
        trace!(%kind, min = ?bounds.min, max = ?bounds.max, "added static box");
        self.boxes.push(StaticBox { bounds, kind });
    }

    /// Removes every obstacle.
    pub fn clear(&mut self) {
        debug!(count = self.boxes.len(), "cleared collision world");
        self.boxes.clear();
    }

    pub fn boxes(&self) -> &[StaticBox] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Pushes a vertical capsule out of every box it overlaps in XZ.
    ///
    /// `half_height` is the center-to-feet distance and defines the vertical
    /// span `[y - half_height, y + half_height]` tested against each box.
    /// Boxes the capsule is standing on are ignored. The caller commits the
    /// returned position.
    pub fn resolve_capsule_xz(
        &self,
        position: Vec3,
        radius: f32,
        half_height: f32,
    ) -> CapsuleResolution {
        let mut pos = position;
        let mut collided = false;

        let y_min = pos.y - half_height;
        let y_max = pos.y + half_height;

        for _ in 0..MAX_RESOLVE_PASSES {
            let mut moved = false;

            for b in &self.boxes {
                let bounds = &b.bounds;
                if !bounds.overlaps_y(y_min, y_max) {
                    continue;
                }
                if y_min >= bounds.max.y - STANDING_EPSILON {
                    continue;
                }

                if bounds.contains_xz_strict(pos) {
                    push_out_nearest_face(&mut pos, bounds, radius);
                    collided = true;
                    moved = true;
                    continue;
                }

                let closest = bounds.closest_point_xz(pos);
                let sep = Vec2::new(pos.x, pos.z) - closest;
                let d2 = sep.length_squared();
                let reach = (radius - CONTACT_SLOP).max(0.0);
                if d2 >= reach * reach {
                    continue;
                }

                if d2 <= MIN_SEPARATION * MIN_SEPARATION {
                    // Center on the footprint boundary: no separation direction.
                    push_out_nearest_face(&mut pos, bounds, radius);
                } else {
                    let d = d2.sqrt();
                    let n = sep / d;
                    let push = radius - d;
                    pos.x += n.x * push;
                    pos.z += n.y * push;
                }
                collided = true;
                moved = true;
            }

            if !moved {
                break;
            }
        }

        CapsuleResolution {
            position: pos,
            collided,
        }
    }
}

/// Moves a center lying inside or on the footprint to `radius` beyond the
/// nearest side face. Ties resolve left, right, back, front.
fn push_out_nearest_face(pos: &mut Vec3, bounds: &Aabb, radius: f32) {
    let pen_left = pos.x - bounds.min.x;
    let pen_right = bounds.max.x - pos.x;
    let pen_back = pos.z - bounds.min.z;
    let pen_front = bounds.max.z - pos.z;
    let min_pen = pen_left.min(pen_right).min(pen_back).min(pen_front);

    if min_pen == pen_left {
        pos.x = bounds.min.x - radius;
    } else if min_pen == pen_right {
        pos.x = bounds.max.x + radius;
    } else if min_pen == pen_back {
        pos.z = bounds.min.z - radius;
    } else {
        pos.z = bounds.max.z + radius;
    }
}
