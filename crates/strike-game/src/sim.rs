//! World factory, schedule, and the fixed-rate simulation driver.

use bevy_ecs::prelude::*;
use strike_camera::CameraController;
use strike_collision::CollisionWorld;
use strike_combat::DamageSystem;
use strike_config::Config;
use strike_player::PlayerController;
use strike_scene::SceneGraph;
use tracing::debug;

use crate::level::{Level, build_arena, unload_level};
use crate::stepper::{FIXED_DT, FixedStepper};
use crate::systems::{
    FrameInput, LookSettings, ShotLog, SimTime, fire_system, look_system, movement_system,
    recoil_system,
};
use crate::weapon::{WeaponProfile, WeaponState};

/// Inserts every simulation resource with values from `config`. The level is
/// left empty.
pub fn register_resources(world: &mut World, config: &Config) {
    world.insert_resource(SimTime::default());
    world.insert_resource(FrameInput::default());
    world.insert_resource(LookSettings(config.input.clone()));
    world.insert_resource(CameraController::new(&config.camera));
    world.insert_resource(PlayerController::new(&config.player));
    world.insert_resource(CollisionWorld::new());
    world.insert_resource(SceneGraph::new());
    world.insert_resource(DamageSystem::new());
    world.insert_resource(Level::default());
    world.insert_resource(WeaponState::new(WeaponProfile::default()));
    world.insert_resource(ShotLog::default());
}

pub fn create_world(config: &Config) -> World {
    let mut world = World::new();
    register_resources(&mut world, config);
    world
}

/// Replaces the loaded level with the arena and moves the player to its
/// spawn.
pub fn load_arena(world: &mut World, config: &Config) {
    let mut scene = world.remove_resource::<SceneGraph>().unwrap_or_default();
    let mut collision = world.remove_resource::<CollisionWorld>().unwrap_or_default();
    let mut damage = world.remove_resource::<DamageSystem>().unwrap_or_default();
    if let Some(previous) = world.remove_resource::<Level>() {
        unload_level(&mut scene, &mut collision, &mut damage, &previous);
    }

    let level = build_arena(
        &mut scene,
        &mut collision,
        &mut damage,
        &config.combat,
        &config.player,
    );

    world.insert_resource(scene);
    world.insert_resource(collision);
    world.insert_resource(damage);
    spawn_player(world, &level);
    world.insert_resource(level);
}

fn spawn_player(world: &mut World, level: &Level) {
    if let Some(mut player) = world.get_resource_mut::<PlayerController>() {
        player.teleport_to(level.spawn_position);
    }
    if let Some(mut camera) = world.get_resource_mut::<CameraController>() {
        camera.set_from_spawn_yaw_degrees(level.spawn_yaw_deg);
    }
}

/// Look, recoil recovery, movement, then firing, once per tick.
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((look_system, recoil_system, movement_system, fire_system).chain());
    schedule
}

pub struct Simulation {
    world: World,
    schedule: Schedule,
    stepper: FixedStepper,
}

impl Simulation {
    pub fn new(world: World) -> Self {
        Self {
            world,
            schedule: build_schedule(),
            stepper: FixedStepper::new(),
        }
    }

    /// A simulation over the default arena.
    pub fn arena(config: &Config) -> Self {
        let mut world = create_world(config);
        load_arena(&mut world, config);
        Self::new(world)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn tick(&self) -> u64 {
        self.world.get_resource::<SimTime>().map_or(0, |t| t.tick)
    }

    /// Runs exactly one fixed tick with `input`.
    pub fn step(&mut self, input: FrameInput) {
        run_tick(&mut self.world, &mut self.schedule, input);
    }

    /// Feeds `frame_time` seconds of wall time and runs as many fixed ticks as
    /// fit. One-shot inputs apply to the first tick only. Returns the number
    /// of ticks run.
    pub fn advance(&mut self, frame_time: f64, input: &FrameInput) -> u32 {
        let Self {
            world,
            schedule,
            stepper,
        } = self;
        let steps = stepper.advance(frame_time, |index, _| {
            let tick_input = if index == 0 {
                input.clone()
            } else {
                input.without_edges()
            };
            run_tick(world, schedule, tick_input);
        });
        debug!(frame_time, steps, alpha = stepper.alpha(), "Frame advanced");
        steps
    }
}

fn run_tick(world: &mut World, schedule: &mut Schedule, input: FrameInput) {
    world.insert_resource(input);
    {
        let mut time = world.resource_mut::<SimTime>();
        time.delta = FIXED_DT as f32;
        time.elapsed += FIXED_DT;
        time.tick += 1;
    }
    schedule.run(world);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_world_has_all_resources() {
        let world = create_world(&Config::default());
        assert!(world.contains_resource::<SimTime>());
        assert!(world.contains_resource::<FrameInput>());
        assert!(world.contains_resource::<LookSettings>());
        assert!(world.contains_resource::<CameraController>());
        assert!(world.contains_resource::<PlayerController>());
        assert!(world.contains_resource::<CollisionWorld>());
        assert!(world.contains_resource::<SceneGraph>());
        assert!(world.contains_resource::<DamageSystem>());
        assert!(world.contains_resource::<Level>());
        assert!(world.contains_resource::<WeaponState>());
        assert!(world.contains_resource::<ShotLog>());
    }

    #[test]
    fn test_config_flows_into_resources() {
        let mut config = Config::default();
        config.input.sensitivity = 2.5;
        config.player.half_height_stand = 0.9;
        let world = create_world(&config);

        assert_eq!(world.resource::<LookSettings>().0.sensitivity, 2.5);
        assert_eq!(world.resource::<CameraController>().yaw(), config.camera.initial_yaw);
        assert_eq!(world.resource::<PlayerController>().position().y, 0.9);
    }

    #[test]
    fn test_arena_spawns_player() {
        let sim = Simulation::arena(&Config::default());
        let world = sim.world();
        let level = world.resource::<Level>();

        assert_eq!(world.resource::<PlayerController>().position(), level.spawn_position);
        assert_eq!(world.resource::<CameraController>().yaw(), 0.0);
        assert_eq!(world.resource::<DamageSystem>().len(), level.targets.len());
    }

    #[test]
    fn test_reloading_arena_replaces_previous_level() {
        let config = Config::default();
        let mut sim = Simulation::arena(&config);
        let first_targets = sim.world().resource::<Level>().targets.clone();
        let nodes = sim.world().resource::<SceneGraph>().len();

        load_arena(sim.world_mut(), &config);

        let world = sim.world();
        let level = world.resource::<Level>();
        let damage = world.resource::<DamageSystem>();
        assert_eq!(world.resource::<SceneGraph>().len(), nodes);
        assert_eq!(world.resource::<CollisionWorld>().len(), level.world_roots.len());
        assert_eq!(damage.len(), 3);
        assert_eq!(damage.tag_count(), 9);
        assert!(first_targets.iter().all(|id| damage.entity(*id).is_none()));
    }

    #[test]
    fn test_step_advances_time() {
        let mut sim = Simulation::arena(&Config::default());
        sim.step(FrameInput::default());
        sim.step(FrameInput::default());

        let time = sim.world().resource::<SimTime>();
        assert_eq!(time.tick, 2);
        assert!((time.delta - 1.0 / 60.0).abs() < 1e-7);
        assert_eq!(sim.tick(), 2);
    }

    #[test]
    fn test_advance_applies_edges_once() {
        let mut sim = Simulation::arena(&Config::default());
        let input = FrameInput {
            look_dx: 50.0,
            ..Default::default()
        };
        let steps = sim.advance(3.0 / 60.0 + 1e-6, &input);
        assert_eq!(steps, 3);

        // 50 px at 0.002 rad/px, applied on the first tick only.
        let yaw = sim.world().resource::<CameraController>().yaw();
        assert!((yaw + 0.1).abs() < 1e-5);
    }
}
