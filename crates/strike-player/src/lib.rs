//! Kinematic first-person movement: ground plane, gravity, jump, crouch,
//! sprint and slide, with horizontal motion resolved against the
//! [`CollisionWorld`](strike_collision::CollisionWorld).

mod controller;

pub use controller::{MoveInput, MoveOutcome, PlayerController};
