//! Render-graph stand-in: a node hierarchy with parent links, positions,
//! hit-test bounds, and per-node hit-region tags.
//!
//! Gameplay systems never own nodes. They hold [`NodeId`] handles, which are
//! generational, so a handle to a despawned node fails every lookup instead of
//! aliasing whatever node reuses the slot.

mod graph;
mod raycast;

pub use graph::{Ancestors, HitRegion, NodeId, SceneGraph};
pub use raycast::RayHit;
