//! Hitscan weapons: fire-rate gating and shot resolution.

use bevy_ecs::prelude::*;
use glam::Vec3;
use strike_combat::{DamageContext, DamageError, DamageReport, DamageSystem};
use strike_scene::{NodeId, RayHit, SceneGraph};
use tracing::{debug, trace};

/// Rates below this are treated as this when computing the shot interval.
const MIN_RPM: f32 = 120.0;
const DEFAULT_RPM: f32 = 420.0;

/// How a held trigger is turned into shots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FireMode {
    /// One shot per trigger press.
    #[default]
    Semi,
    /// Fires every interval while the trigger is held.
    Auto,
}

/// Static tuning for one weapon.
#[derive(Clone, Debug, PartialEq)]
pub struct WeaponProfile {
    pub id: String,
    pub fire_mode: FireMode,
    /// Damage per body hit.
    pub damage: f32,
    /// Multiplier applied to `damage` on a headshot.
    pub headshot_mult: f32,
    /// Rounds per minute.
    pub rpm: f32,
    /// Maximum hit distance in meters.
    pub range: f32,
    /// Recoil kick per shot, radians.
    pub recoil_pitch: f32,
    pub recoil_yaw: f32,
    /// Movement multiplier while the weapon is held.
    pub move_speed_mul: f32,
}

impl Default for WeaponProfile {
    /// The starting pistol.
    fn default() -> Self {
        Self {
            id: "pistol1".to_string(),
            fire_mode: FireMode::Semi,
            damage: 22.0,
            headshot_mult: 1.5,
            rpm: DEFAULT_RPM,
            range: 120.0,
            recoil_pitch: 0.035,
            recoil_yaw: 0.0,
            move_speed_mul: 1.0,
        }
    }
}

impl WeaponProfile {
    /// Seconds between shots.
    pub fn fire_interval(&self) -> f32 {
        let rpm = if self.rpm.is_finite() {
            self.rpm
        } else {
            DEFAULT_RPM
        };
        60.0 / rpm.max(MIN_RPM)
    }

    /// Damage for one hit, with the headshot multiplier applied when needed.
    pub fn damage_for(&self, headshot: bool) -> f32 {
        if headshot {
            self.damage * self.headshot_mult
        } else {
            self.damage
        }
    }
}

/// The player's equipped weapon, its fire cooldown and trigger edge state.
#[derive(Resource, Debug, Clone, Default)]
pub struct WeaponState {
    pub profile: WeaponProfile,
    cooldown: f32,
    trigger_was_held: bool,
    shots_fired: u64,
}

impl WeaponState {
    pub fn new(profile: WeaponProfile) -> Self {
        Self {
            profile,
            cooldown: 0.0,
            trigger_was_held: false,
            shots_fired: 0,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.cooldown = (self.cooldown - dt).max(0.0);
        }
    }

    /// Samples the trigger for this tick and consumes a shot if one is due.
    ///
    /// Must be called every tick, held or not, so semi-automatic weapons can
    /// see the press. A press that lands during the cooldown is dropped.
    pub fn try_fire(&mut self, trigger_held: bool) -> bool {
        let pressed = trigger_held && !self.trigger_was_held;
        self.trigger_was_held = trigger_held;

        let wants_fire = match self.profile.fire_mode {
            FireMode::Semi => pressed,
            FireMode::Auto => trigger_held,
        };
        if !wants_fire || self.cooldown > 0.0 {
            return false;
        }
        self.cooldown = self.profile.fire_interval();
        self.shots_fired += 1;
        true
    }

    /// Seconds until the next shot is allowed.
    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    pub fn shots_fired(&self) -> u64 {
        self.shots_fired
    }
}

/// What a single hitscan shot did.
#[derive(Clone, Debug, PartialEq)]
pub enum ShotOutcome {
    Miss,
    /// Level geometry was the nearest hit.
    World(RayHit),
    /// A living entity took damage.
    Entity { hit: RayHit, report: DamageReport },
    /// An entity was the nearest hit but could not be damaged (already dead).
    Rejected { hit: RayHit, error: DamageError },
}

impl ShotOutcome {
    pub fn report(&self) -> Option<&DamageReport> {
        match self {
            ShotOutcome::Entity { report, .. } => Some(report),
            _ => None,
        }
    }
}

/// Resolves one shot from `origin` along `direction`.
///
/// Level geometry under `world_roots` and all damageable roots are queried
/// separately. Damageable nodes never count as level geometry, even when they
/// sit under a world root. The nearer hit wins; ties go to the level.
pub fn resolve_hitscan(
    scene: &SceneGraph,
    world_roots: &[NodeId],
    damage: &mut DamageSystem,
    origin: Vec3,
    direction: Vec3,
    weapon: &WeaponProfile,
    source_team: &str,
) -> ShotOutcome {
    let world_hit = scene.raycast_where(origin, direction, weapon.range, world_roots, |node| {
        !damage.is_damageable_node(node)
    });
    let entity_roots = damage.damageable_roots(scene);
    let entity_hit = scene.raycast(origin, direction, weapon.range, &entity_roots);

    let hit = match (world_hit, entity_hit) {
        (Some(world), Some(entity)) if world.distance <= entity.distance => {
            return ShotOutcome::World(world);
        }
        (_, Some(entity)) => entity,
        (Some(world), None) => return ShotOutcome::World(world),
        (None, None) => {
            trace!(weapon = %weapon.id, "Shot missed");
            return ShotOutcome::Miss;
        }
    };

    let Some(entity) = damage.entity_from_hit_node(scene, hit.node) else {
        return ShotOutcome::World(hit);
    };
    let id = entity.id;
    let headshot = damage.is_headshot(scene, &hit, entity);

    let context = DamageContext {
        weapon_id: Some(weapon.id.clone()),
        source_team: Some(source_team.to_string()),
        headshot,
    };
    match damage.apply_damage(id, weapon.damage_for(headshot), context) {
        Ok(report) => ShotOutcome::Entity { hit, report },
        Err(error) => {
            debug!(%id, reason = error.reason(), "Shot hit an undamageable entity");
            ShotOutcome::Rejected { hit, error }
        }
    }
}
