//! Per-tick resources and the systems that run in the simulation schedule.

use std::collections::VecDeque;

use bevy_ecs::prelude::*;
use strike_camera::{CameraController, LookDevice};
use strike_collision::CollisionWorld;
use strike_combat::DamageSystem;
use strike_config::InputConfig;
use strike_player::{MoveInput, PlayerController};
use strike_scene::SceneGraph;
use tracing::{info, trace};

use crate::level::Level;
use crate::weapon::{ShotOutcome, WeaponState, resolve_hitscan};

/// Team the local player shoots for.
pub const PLAYER_TEAM: &str = "blue";

/// Input sampled for one simulation tick.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Pointer delta in pixels since the previous tick.
    pub look_dx: f32,
    pub look_dy: f32,
    pub look_device: LookDevice,
    pub movement: MoveInput,
    /// Trigger held.
    pub fire: bool,
}

impl FrameInput {
    /// The same held state with one-shot inputs cleared, for extra ticks run
    /// within a single frame.
    pub fn without_edges(&self) -> Self {
        Self {
            look_dx: 0.0,
            look_dy: 0.0,
            movement: MoveInput {
                jump_pressed: false,
                crouch_toggle_pressed: false,
                ..self.movement
            },
            ..self.clone()
        }
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct SimTime {
    /// Seconds simulated by the current tick.
    pub delta: f32,
    pub elapsed: f64,
    pub tick: u64,
}

/// Live input preferences read by the look system.
#[derive(Resource, Debug, Clone, Default)]
pub struct LookSettings(pub InputConfig);

/// Number of recent shots kept in a [`ShotLog`].
pub const SHOT_LOG_CAPACITY: usize = 256;

/// The most recent shots, oldest first, plus running totals over the whole
/// session.
#[derive(Resource, Debug, Clone, Default)]
pub struct ShotLog {
    pub shots: VecDeque<ShotOutcome>,
    fired: usize,
    kills: usize,
}

impl ShotLog {
    /// Appends a shot, dropping the oldest once [`SHOT_LOG_CAPACITY`] is
    /// reached.
    pub fn record(&mut self, shot: ShotOutcome) {
        if shot.report().is_some_and(|r| r.killed) {
            self.kills += 1;
        }
        self.fired += 1;
        if self.shots.len() == SHOT_LOG_CAPACITY {
            self.shots.pop_front();
        }
        self.shots.push_back(shot);
    }

    /// Shots fired this session, including ones no longer kept.
    pub fn fired(&self) -> usize {
        self.fired
    }

    pub fn kills(&self) -> usize {
        self.kills
    }
}

pub fn look_system(
    input: Res<FrameInput>,
    settings: Res<LookSettings>,
    mut camera: ResMut<CameraController>,
) {
    if input.look_dx != 0.0 || input.look_dy != 0.0 {
        camera.apply_look_delta(input.look_dx, input.look_dy, input.look_device, &settings.0);
    }
}

pub fn recoil_system(time: Res<SimTime>, mut camera: ResMut<CameraController>) {
    camera.update_recoil(time.delta);
}

pub fn movement_system(
    time: Res<SimTime>,
    input: Res<FrameInput>,
    camera: Res<CameraController>,
    collision: Res<CollisionWorld>,
    weapon: Res<WeaponState>,
    mut player: ResMut<PlayerController>,
) {
    player.set_weapon_speed_mul(weapon.profile.move_speed_mul);
    let outcome = player.update(time.delta, &input.movement, &camera.orientation(), &collision);
    if outcome.collided {
        trace!(tick = time.tick, position = ?player.position(), "Player blocked");
    }
}

#[allow(clippy::too_many_arguments)]
pub fn fire_system(
    time: Res<SimTime>,
    input: Res<FrameInput>,
    player: Res<PlayerController>,
    scene: Res<SceneGraph>,
    level: Res<Level>,
    mut damage: ResMut<DamageSystem>,
    mut weapon: ResMut<WeaponState>,
    mut camera: ResMut<CameraController>,
    mut log: ResMut<ShotLog>,
) {
    weapon.tick(time.delta);
    if !weapon.try_fire(input.fire) {
        return;
    }

    let view = camera.orientation();
    let outcome = resolve_hitscan(
        &scene,
        &level.world_roots,
        &mut damage,
        player.eye_position(),
        view.forward(),
        &weapon.profile,
        PLAYER_TEAM,
    );
    camera.add_recoil(weapon.profile.recoil_pitch, weapon.profile.recoil_yaw);

    if let Some(report) = outcome.report() {
        info!(
            tick = time.tick,
            entity = %report.entity.id,
            damage = report.damage,
            hp = report.entity.hp,
            headshot = report.context.headshot,
            killed = report.killed,
            "Hit"
        );
    }
    log.record(outcome);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_edges_keeps_held_state() {
        let input = FrameInput {
            look_dx: 12.0,
            look_dy: -3.0,
            look_device: LookDevice::Touch,
            movement: MoveInput {
                move_z: 1.0,
                sprint_held: true,
                jump_pressed: true,
                crouch_toggle_pressed: true,
                ..Default::default()
            },
            fire: true,
        };
        let held = input.without_edges();

        assert_eq!(held.look_dx, 0.0);
        assert_eq!(held.look_dy, 0.0);
        assert_eq!(held.look_device, LookDevice::Touch);
        assert!(!held.movement.jump_pressed);
        assert!(!held.movement.crouch_toggle_pressed);
        assert!(held.movement.sprint_held);
        assert_eq!(held.movement.move_z, 1.0);
        assert!(held.fire);
    }

    #[test]
    fn test_shot_log_keeps_recent_shots_and_totals() {
        let mut log = ShotLog::default();
        for _ in 0..SHOT_LOG_CAPACITY + 10 {
            log.record(ShotOutcome::Miss);
        }
        assert_eq!(log.shots.len(), SHOT_LOG_CAPACITY);
        assert_eq!(log.fired(), SHOT_LOG_CAPACITY + 10);
        assert_eq!(log.kills(), 0);
    }

    #[test]
    fn test_look_system_uses_live_sensitivity() {
        let mut world = World::new();
        world.insert_resource(CameraController::default());
        world.insert_resource(LookSettings(InputConfig {
            sensitivity: 2.0,
            ..Default::default()
        }));
        world.insert_resource(FrameInput {
            look_dx: 100.0,
            ..Default::default()
        });
        let start_yaw = world.resource::<CameraController>().yaw();

        let mut schedule = Schedule::default();
        schedule.add_systems(look_system);
        schedule.run(&mut world);

        let yaw = world.resource::<CameraController>().yaw();
        // 100 px * 0.002 rad/px * 2.0, turning right.
        assert!((start_yaw - yaw - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_recoil_system_decays_each_tick() {
        let mut world = World::new();
        let mut camera = CameraController::default();
        camera.add_recoil(0.2, 0.1);
        world.insert_resource(camera);
        world.insert_resource(SimTime {
            delta: 1.0 / 60.0,
            ..Default::default()
        });

        let mut schedule = Schedule::default();
        schedule.add_systems(recoil_system);
        schedule.run(&mut world);

        let camera = world.resource::<CameraController>();
        let expected = 0.2 * (-14.0_f32 / 60.0).exp();
        assert!((camera.recoil_pitch() - expected).abs() < 1e-5);
    }
}
