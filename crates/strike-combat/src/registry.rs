//! The damageable-entity registry and its node side table.
//!
//! Registration tags the owner node and every descendant with the new id in
//! a side table keyed by [`NodeId`]. A hit on any node resolves by walking
//! the node's parent chain until a tag naming a live registry entry is found.
//! Ancestors of the owner are never tagged, otherwise unrelated scene objects
//! would resolve to the same entity through the shared parent.

use std::collections::BTreeMap;

use bevy_ecs::prelude::*;
use rustc_hash::FxHashMap;
use strike_scene::{HitRegion, NodeId, RayHit, SceneGraph};
use tracing::{debug, info, trace};

use crate::{
    DamageContext, DamageError, DamageReport, DamageableEntity, EntityId, EntityOptions,
};

/// Headshot ratios are clamped into this range before use.
pub const HEADSHOT_RATIO_MIN: f32 = 0.55;
pub const HEADSHOT_RATIO_MAX: f32 = 0.92;

const DEFAULT_HEIGHT: f32 = 1.8;
const DEFAULT_HEADSHOT_RATIO: f32 = 0.78;
const MIN_HEIGHT: f32 = 0.1;

#[derive(Resource, Debug, Default)]
pub struct DamageSystem {
    next_id: u64,
    entities: BTreeMap<EntityId, DamageableEntity>,
    node_tags: FxHashMap<NodeId, EntityId>,
}

impl DamageSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `owner` as a damageable entity.
    ///
    /// Returns `None` if `owner` is not a live node in `scene`.
    pub fn register(
        &mut self,
        scene: &SceneGraph,
        owner: NodeId,
        options: EntityOptions,
    ) -> Option<EntityId> {
        if !scene.contains(owner) {
            debug!(?owner, "register skipped: owner node missing");
            return None;
        }

        self.next_id += 1;
        let id = EntityId::new(self.next_id);
        let max_hp = finite_or(options.max_hp, 100.0).max(0.0);
        let entity = DamageableEntity {
            id,
            owner,
            team: options.team,
            hp: max_hp,
            max_hp,
            height: options.height,
            headshot_y_ratio: options.headshot_y_ratio,
            alive: true,
        };

        self.node_tags.insert(owner, id);
        let descendants = scene.descendants(owner);
        for node in &descendants {
            self.node_tags.insert(*node, id);
        }

        info!(%id, team = %entity.team, max_hp, tagged = descendants.len() + 1, "registered damageable");
        self.entities.insert(id, entity);
        Some(id)
    }

    /// Removes the entity. Node tags are left in place; they no longer
    /// resolve because lookups require a live registry entry.
    pub fn unregister(&mut self, id: EntityId) {
        if self.entities.remove(&id).is_some() {
            info!(%id, "unregistered damageable");
        }
    }

    /// Drops side-table entries whose entity is gone or whose node was
    /// despawned. Returns the number of entries removed.
    pub fn prune_stale_tags(&mut self, scene: &SceneGraph) -> usize {
        let before = self.node_tags.len();
        let entities = &self.entities;
        self.node_tags
            .retain(|node, id| entities.contains_key(id) && scene.contains(*node));
        let removed = before - self.node_tags.len();
        trace!(removed, "pruned stale node tags");
        removed
    }

    /// Number of nodes currently tagged, stale entries included.
    pub fn tag_count(&self) -> usize {
        self.node_tags.len()
    }

    pub fn entity(&self, id: EntityId) -> Option<&DamageableEntity> {
        self.entities.get(&id)
    }

    /// Resolves an arbitrary hit node to the entity it belongs to.
    pub fn entity_from_hit_node(
        &self,
        scene: &SceneGraph,
        node: NodeId,
    ) -> Option<&DamageableEntity> {
        if !scene.contains(node) {
            return None;
        }
        std::iter::once(node)
            .chain(scene.ancestors(node))
            .find_map(|n| self.node_tags.get(&n).and_then(|id| self.entities.get(id)))
    }

    /// Returns true if `node` carries a tag for a live registry entry.
    pub fn is_damageable_node(&self, node: NodeId) -> bool {
        self.node_tags
            .get(&node)
            .is_some_and(|id| self.entities.contains_key(id))
    }

    /// Owner nodes of all registered entities that are still in the scene.
    ///
    /// Ray queries recurse into children, so only roots are returned.
    pub fn damageable_roots(&self, scene: &SceneGraph) -> Vec<NodeId> {
        self.entities
            .values()
            .map(|e| e.owner)
            .filter(|n| scene.contains(*n))
            .collect()
    }

    /// Decides whether `hit` on `entity` is a headshot.
    ///
    /// A node explicitly tagged [`HitRegion::Head`] always counts. Otherwise
    /// the hit point must sit at least `height * ratio` above the entity's
    /// root, with the ratio clamped to
    /// [`HEADSHOT_RATIO_MIN`]..=[`HEADSHOT_RATIO_MAX`].
    pub fn is_headshot(&self, scene: &SceneGraph, hit: &RayHit, entity: &DamageableEntity) -> bool {
        if scene.hit_region(hit.node) == Some(HitRegion::Head) {
            return true;
        }
        let Some(root) = scene.world_position(entity.owner) else {
            return false;
        };

        let y_rel = hit.point.y - root.y;
        let height = finite_or(entity.height, DEFAULT_HEIGHT).max(MIN_HEIGHT);
        let ratio = finite_or(entity.headshot_y_ratio, DEFAULT_HEADSHOT_RATIO)
            .clamp(HEADSHOT_RATIO_MIN, HEADSHOT_RATIO_MAX);
        y_rel >= height * ratio
    }

    /// Subtracts `amount` hp from a living entity.
    ///
    /// Negative or non-finite amounts deal zero damage. Fails with
    /// [`DamageError::NoEntity`] for unknown ids and for dead entities, which
    /// never take further damage.
    pub fn apply_damage(
        &mut self,
        id: EntityId,
        amount: f32,
        context: DamageContext,
    ) -> Result<DamageReport, DamageError> {
        let entity = match self.entities.get_mut(&id) {
            Some(e) if e.alive => e,
            _ => {
                debug!(%id, "damage rejected: no living entity");
                return Err(DamageError::NoEntity(id));
            }
        };

        let damage = finite_or(amount, 0.0).max(0.0);
        entity.hp = (entity.hp - damage).clamp(0.0, entity.max_hp);
        if entity.hp <= 0.0 {
            entity.alive = false;
        }
        let killed = !entity.alive;

        if killed {
            info!(
                %id,
                weapon = ?context.weapon_id,
                source_team = ?context.source_team,
                headshot = context.headshot,
                "entity killed"
            );
        } else {
            debug!(%id, damage, hp = entity.hp, headshot = context.headshot, "entity damaged");
        }

        Ok(DamageReport {
            entity: entity.clone(),
            damage,
            killed,
            context,
        })
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DamageableEntity> {
        self.entities.values()
    }
}

fn finite_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() { v } else { fallback }
}
