//! Ray queries against node hit-test boxes.
//!
//! A query takes a set of root nodes and recurses into their descendants, so
//! callers only ever pass roots.

use glam::Vec3;

use crate::{NodeId, SceneGraph};

/// Result of a successful scene ray query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// World-space hit point.
    pub point: Vec3,
    /// Outward normal of the face that was hit.
    pub normal: Vec3,
    /// The node whose bounds were hit (may be a descendant of a queried root).
    pub node: NodeId,
    /// Distance from the ray origin to `point`.
    pub distance: f32,
}

impl SceneGraph {
    /// Casts a ray against `roots` and all their descendants, returning the
    /// nearest hit within `max_distance`.
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        roots: &[NodeId],
    ) -> Option<RayHit> {
        self.raycast_where(origin, direction, max_distance, roots, |_| true)
    }

    /// Like [`raycast`](Self::raycast), but only nodes accepted by `filter`
    /// can be hit. Rejected nodes are still traversed into.
    pub fn raycast_where(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        roots: &[NodeId],
        filter: impl Fn(NodeId) -> bool,
    ) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        let mut best: Option<RayHit> = None;
        for &root in roots {
            if !self.contains(root) {
                continue;
            }
            let candidates = std::iter::once(root).chain(self.descendants(root));
            for node in candidates {
                if !filter(node) {
                    continue;
                }
                let Some(bounds) = self.world_bounds(node) else {
                    continue;
                };
                let Some((t, normal)) = bounds.ray_intersect(origin, dir, max_distance) else {
                    continue;
                };
                if best.is_none_or(|b| t < b.distance) {
                    best = Some(RayHit {
                        point: origin + dir * t,
                        normal,
                        node,
                        distance: t,
                    });
                }
            }
        }
        best
    }
}
