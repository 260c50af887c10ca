//! Look orientation: raw pointer input to yaw/pitch, with weapon recoil
//! layered on top as a decaying offset.

mod controller;
mod sensitivity;

pub use controller::{
    CameraController, CameraDebug, LookDevice, Orientation, RECOIL_PITCH_MAX, RECOIL_PITCH_MIN,
    RECOIL_YAW_MAX, RECOIL_YAW_MIN,
};
pub use sensitivity::SensitivitySource;
