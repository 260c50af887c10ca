//! Headless simulation: collision, camera, player movement and combat wired
//! into a `bevy_ecs` world stepped at a fixed 60 Hz.

pub mod level;
pub mod sim;
pub mod stepper;
pub mod systems;
pub mod weapon;

pub use level::Level;
pub use sim::Simulation;
pub use stepper::{FIXED_DT, FixedStepper, MAX_FRAME_TIME};
pub use systems::{FrameInput, LookSettings, PLAYER_TEAM, SHOT_LOG_CAPACITY, ShotLog, SimTime};
pub use weapon::{FireMode, ShotOutcome, WeaponProfile, WeaponState};
