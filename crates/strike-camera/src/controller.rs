//! The single authoritative owner of look orientation.
//!
//! Base orientation (yaw/pitch driven by input) and recoil (a transient
//! offset driven by weapon fire) are stored separately and only summed in
//! [`CameraController::orientation`], so input and recoil never fight.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use strike_config::CameraConfig;
use tracing::trace;

use crate::SensitivitySource;

/// Recoil may push the view down at most this far (radians).
pub const RECOIL_PITCH_MIN: f32 = -0.35;
/// Recoil kicks the view up more than down.
pub const RECOIL_PITCH_MAX: f32 = 0.55;
pub const RECOIL_YAW_MIN: f32 = -0.55;
pub const RECOIL_YAW_MAX: f32 = 0.55;

/// Input device a look delta came from. Selects the base scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LookDevice {
    #[default]
    Mouse,
    Touch,
}

/// Externally visible orientation: base plus recoil.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orientation {
    /// Player facing around +Y, radians. Positive turns left.
    pub yaw: f32,
    /// Camera pitch around the player's X axis, radians. Positive looks up.
    pub pitch: f32,
}

impl Orientation {
    /// Yaw applied to the player body, then pitch applied to the camera.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    /// View direction (unit length).
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    /// Facing projected onto the ground plane (unit length, pitch-free).
    pub fn forward_xz(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Strafe-right direction on the ground plane.
    pub fn right_xz(&self) -> Vec3 {
        self.forward_xz().cross(Vec3::Y)
    }
}

/// Base orientation in degrees, for overlays and logs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraDebug {
    pub yaw_deg: f32,
    pub pitch_deg: f32,
}

#[derive(Resource, Debug, Clone)]
pub struct CameraController {
    yaw: f32,
    pitch: f32,
    recoil_yaw: f32,
    recoil_pitch: f32,
    pitch_min: f32,
    pitch_max: f32,
    mouse_scale: f32,
    touch_scale: f32,
    return_speed: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

impl CameraController {
    /// Builds a controller from `config`. Out-of-range tuning falls back to
    /// defaults, as [`CameraConfig::sanitize`] does.
    pub fn new(config: &CameraConfig) -> Self {
        let mut config = config.clone();
        config.sanitize();
        let limit = config.pitch_limit;
        Self {
            yaw: config.initial_yaw,
            pitch: 0.0,
            recoil_yaw: 0.0,
            recoil_pitch: 0.0,
            pitch_min: -limit,
            pitch_max: limit,
            mouse_scale: config.mouse_scale,
            touch_scale: config.touch_scale,
            return_speed: config.recoil_return_speed,
        }
    }

    /// Base yaw (without recoil).
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Base pitch (without recoil).
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn recoil_yaw(&self) -> f32 {
        self.recoil_yaw
    }

    pub fn recoil_pitch(&self) -> f32 {
        self.recoil_pitch
    }

    pub fn pitch_limits(&self) -> (f32, f32) {
        (self.pitch_min, self.pitch_max)
    }

    /// The orientation to render and aim with.
    pub fn orientation(&self) -> Orientation {
        Orientation {
            yaw: self.yaw + self.recoil_yaw,
            pitch: self.pitch + self.recoil_pitch,
        }
    }

    /// Resets yaw from a spawn heading in degrees. Non-finite headings face 0.
    pub fn set_from_spawn_yaw_degrees(&mut self, yaw_deg: f32) {
        self.yaw = finite_or(yaw_deg, 0.0).to_radians();
        trace!(yaw = self.yaw, "camera yaw set from spawn");
    }

    /// Turns a pointer delta into a yaw/pitch change.
    ///
    /// Moving right turns right and moving down looks down. Pitch is clamped
    /// to the configured limits afterwards.
    pub fn apply_look_delta(
        &mut self,
        dx: f32,
        dy: f32,
        device: LookDevice,
        settings: &impl SensitivitySource,
    ) {
        let base = match device {
            LookDevice::Mouse => self.mouse_scale,
            LookDevice::Touch => self.touch_scale,
        };
        let scale = base * finite_or(settings.sensitivity(), 1.0);

        self.yaw -= finite_or(dx, 0.0) * scale;
        self.pitch -= finite_or(dy, 0.0) * scale;
        self.pitch = self.pitch.clamp(self.pitch_min, self.pitch_max);
    }

    /// Adds one shot's recoil kick (radians). Each axis is clamped to its range.
    pub fn add_recoil(&mut self, pitch_kick: f32, yaw_kick: f32) {
        self.recoil_pitch += finite_or(pitch_kick, 0.0);
        self.recoil_yaw += finite_or(yaw_kick, 0.0);
        self.clamp_recoil();
    }

    /// Decays recoil toward zero at the configured return speed.
    pub fn update_recoil(&mut self, dt: f32) {
        self.update_recoil_with_speed(dt, self.return_speed);
    }

    /// Decays recoil toward zero with `t = 1 - e^(-return_speed * dt)`, so the
    /// result depends only on total elapsed time, not on frame rate.
    ///
    /// A non-positive or non-finite `return_speed` falls back to 14.
    pub fn update_recoil_with_speed(&mut self, dt: f32, return_speed: f32) {
        let speed = if return_speed.is_finite() && return_speed > 0.0 {
            return_speed
        } else {
            14.0
        };
        let dt = finite_or(dt, 0.0).max(0.0);
        let t = 1.0 - (-speed * dt).exp();

        self.recoil_pitch += (0.0 - self.recoil_pitch) * t;
        self.recoil_yaw += (0.0 - self.recoil_yaw) * t;
        self.clamp_recoil();
    }

    pub fn debug(&self) -> CameraDebug {
        CameraDebug {
            yaw_deg: self.yaw.to_degrees(),
            pitch_deg: self.pitch.to_degrees(),
        }
    }

    fn clamp_recoil(&mut self) {
        self.recoil_pitch = self.recoil_pitch.clamp(RECOIL_PITCH_MIN, RECOIL_PITCH_MAX);
        self.recoil_yaw = self.recoil_yaw.clamp(RECOIL_YAW_MIN, RECOIL_YAW_MAX);
    }
}

fn finite_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() { v } else { fallback }
}
