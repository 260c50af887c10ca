//! Strike headless simulation.
//!
//! Loads `config.ron`, builds the training arena, and runs a scripted session
//! for `--ticks` fixed steps, logging hits and the final state.
//!
//! Run with: `cargo run -p strike-game -- --ticks 600`

use clap::Parser;
use strike_camera::CameraController;
use strike_combat::DamageSystem;
use strike_config::{CliArgs, Config, default_config_dir};
use strike_game::{FrameInput, ShotLog, Simulation};
use strike_player::PlayerController;
use tracing::{error, info};

fn main() {
    let args = CliArgs::parse();

    let config_dir = match &args.config {
        Some(dir) => Ok(dir.clone()),
        None => default_config_dir(),
    };
    let (mut config, load_error) = match config_dir.as_deref() {
        Ok(dir) => match Config::load_or_create(dir) {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        },
        Err(_) => (Config::default(), None),
    };
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.as_ref().ok().map(|dir| dir.join("logs"));
    strike_log::init_logging(log_dir.as_deref(), cfg!(debug_assertions), Some(&config));

    if let Err(e) = &config_dir {
        error!("{e}; using default config");
    }
    if let Some(e) = load_error {
        error!("Failed to load config: {e}; using defaults");
    }

    info!("Strike simulation core");
    info!(
        sensitivity = config.input.sensitivity,
        preset = ?config.input.control_preset,
        ticks = args.ticks,
        "Session starting"
    );

    let mut sim = Simulation::arena(&config);
    for tick in 0..args.ticks {
        sim.step(scripted_input(tick));
    }

    report(&sim);
}

/// Shoots the center target, then turns, sprints, jumps and slides.
fn scripted_input(tick: u32) -> FrameInput {
    let mut input = FrameInput::default();
    match tick {
        0..120 => input.fire = tick % 20 == 0,
        120..150 => input.look_dx = 25.0,
        150..270 => {
            input.movement.move_z = 1.0;
            input.movement.sprint_held = true;
            input.movement.jump_pressed = tick == 180;
            input.movement.crouch_toggle_pressed = tick == 240;
        }
        _ => input.movement.move_x = if (tick / 60) % 2 == 0 { 1.0 } else { -1.0 },
    }
    input
}

fn report(sim: &Simulation) {
    let world = sim.world();
    let player = world.resource::<PlayerController>();
    let camera = world.resource::<CameraController>().debug();
    let shots = world.resource::<ShotLog>();

    info!(
        ticks = sim.tick(),
        position = ?player.position(),
        yaw_deg = camera.yaw_deg,
        pitch_deg = camera.pitch_deg,
        crouched = player.is_crouched(),
        "Session finished"
    );
    info!(shots = shots.fired(), kills = shots.kills(), "Combat summary");
    for entity in world.resource::<DamageSystem>().iter() {
        info!(
            id = %entity.id,
            team = %entity.team,
            hp = entity.hp,
            alive = entity.alive,
            "Target"
        );
    }
}
