//! Level construction: static boxes that both block movement and stop shots,
//! and humanoid training targets.

use bevy_ecs::prelude::*;
use glam::Vec3;
use strike_collision::CollisionWorld;
use strike_combat::{DamageSystem, EntityId, EntityOptions};
use strike_config::{CombatConfig, PlayerConfig};
use strike_scene::{HitRegion, NodeId, SceneGraph};
use tracing::{info, warn};

const TORSO_HALF_EXTENTS: Vec3 = Vec3::new(0.3, 0.7, 0.3);
const HEAD_HALF_EXTENTS: Vec3 = Vec3::new(0.2, 0.2, 0.2);

/// Everything the simulation needs to know about the loaded level.
#[derive(Resource, Debug, Clone, Default)]
pub struct Level {
    /// Scene roots holding level geometry, queried by shots.
    pub world_roots: Vec<NodeId>,
    pub targets: Vec<EntityId>,
    /// Capsule center the player starts at.
    pub spawn_position: Vec3,
    pub spawn_yaw_deg: f32,
}

/// Adds a box to the collision world and a matching hit-test node to the
/// scene. Returns the scene node.
pub fn spawn_static_box(
    scene: &mut SceneGraph,
    collision: &mut CollisionWorld,
    kind: &str,
    half_extents: Vec3,
    center: Vec3,
) -> NodeId {
    collision.add_box(kind, half_extents, center);
    let node = scene.spawn(None, center);
    scene.set_bounds(node, half_extents);
    node
}

/// Spawns a target with its root at `feet`, a torso and a head, and registers
/// it as damageable.
pub fn spawn_target(
    scene: &mut SceneGraph,
    damage: &mut DamageSystem,
    feet: Vec3,
    options: EntityOptions,
) -> Option<EntityId> {
    let root = scene.spawn(None, feet);

    let torso = scene.spawn(Some(root), Vec3::new(0.0, TORSO_HALF_EXTENTS.y, 0.0));
    scene.set_bounds(torso, TORSO_HALF_EXTENTS);
    scene.set_hit_region(torso, HitRegion::Body);

    let head_y = 2.0 * TORSO_HALF_EXTENTS.y + HEAD_HALF_EXTENTS.y;
    let head = scene.spawn(Some(root), Vec3::new(0.0, head_y, 0.0));
    scene.set_bounds(head, HEAD_HALF_EXTENTS);
    scene.set_hit_region(head, HitRegion::Head);

    damage.register(scene, root, options)
}

/// Removes everything `level` put into the scene, collision and damage
/// resources, and drops the node tags it leaves behind.
pub fn unload_level(
    scene: &mut SceneGraph,
    collision: &mut CollisionWorld,
    damage: &mut DamageSystem,
    level: &Level,
) {
    collision.clear();
    for &root in &level.world_roots {
        scene.despawn(root);
    }
    for &id in &level.targets {
        if let Some(owner) = damage.entity(id).map(|e| e.owner) {
            scene.despawn(owner);
        }
        damage.unregister(id);
    }
    let pruned = damage.prune_stale_tags(scene);
    info!(
        boxes = level.world_roots.len(),
        targets = level.targets.len(),
        pruned,
        "Level unloaded"
    );
}

/// A walled 24 m square with cover, a low platform and three targets down
/// range of a spawn facing -Z.
pub fn build_arena(
    scene: &mut SceneGraph,
    collision: &mut CollisionWorld,
    damage: &mut DamageSystem,
    combat: &CombatConfig,
    player: &PlayerConfig,
) -> Level {
    let mut level = Level {
        spawn_position: Vec3::new(0.0, player.ground_y + player.half_height_stand, 6.0),
        spawn_yaw_deg: 0.0,
        ..Default::default()
    };

    let statics = [
        ("wall", Vec3::new(12.0, 2.0, 0.25), Vec3::new(0.0, 2.0, -12.25)),
        ("wall", Vec3::new(12.0, 2.0, 0.25), Vec3::new(0.0, 2.0, 12.25)),
        ("wall", Vec3::new(0.25, 2.0, 12.0), Vec3::new(-12.25, 2.0, 0.0)),
        ("wall", Vec3::new(0.25, 2.0, 12.0), Vec3::new(12.25, 2.0, 0.0)),
        ("crate", Vec3::splat(0.5), Vec3::new(4.0, 0.5, -2.0)),
        ("crate", Vec3::splat(0.5), Vec3::new(-4.0, 0.5, 2.0)),
        ("platform", Vec3::new(2.0, 0.25, 2.0), Vec3::new(-7.0, 0.25, -7.0)),
    ];
    for (kind, half, center) in statics {
        let node = spawn_static_box(scene, collision, kind, half, center);
        level.world_roots.push(node);
    }

    let options = EntityOptions::from(combat).with_team("red");
    for feet in [
        Vec3::new(0.0, 0.0, -8.0),
        Vec3::new(-3.0, 0.0, -9.0),
        Vec3::new(3.0, 0.0, -9.0),
    ] {
        match spawn_target(scene, damage, feet, options.clone()) {
            Some(id) => level.targets.push(id),
            None => warn!(?feet, "Target registration failed"),
        }
    }

    info!(
        boxes = collision.len(),
        targets = level.targets.len(),
        "Arena built"
    );
    level
}
