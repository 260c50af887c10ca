use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};
use strike_camera::Orientation;
use strike_collision::CollisionWorld;
use strike_config::PlayerConfig;
use tracing::{debug, trace};

/// Slide entry speed relative to sprint speed.
const SLIDE_BOOST: f32 = 1.35;
/// A slide ends once its speed decays to this fraction of walk speed.
const SLIDE_END_RATIO: f32 = 0.35;
/// Extra friction applied per sub-step when a slide runs into a box.
const SLIDE_BONK_FRICTION: f32 = 2.5;
const SLIDE_BONK_END_RATIO: f32 = 0.4;
/// Forward input needed for sprint and slide.
const FORWARD_THRESHOLD: f32 = 0.2;
const GROUND_EPSILON: f32 = 1e-3;
const MAX_SUBSTEPS: u32 = 8;
/// Longest horizontal move per sub-step, as a fraction of the radius.
const SUBSTEP_RADIUS_FRACTION: f32 = 0.75;
const CAMERA_EASE_RATE: f32 = 18.0;

/// One frame of movement intent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveInput {
    /// Strafe axis, right positive.
    pub move_x: f32,
    /// Forward axis, forward positive.
    pub move_z: f32,
    pub sprint_held: bool,
    /// Edge-triggered.
    pub jump_pressed: bool,
    /// Edge-triggered.
    pub crouch_toggle_pressed: bool,
}

/// What happened during a [`PlayerController::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveOutcome {
    pub grounded: bool,
    /// Any sub-step was pushed out of a box.
    pub collided: bool,
}

/// Kinematic player on a flat ground plane.
///
/// `position` is the capsule center. Vertical motion only knows the plane at
/// `ground_y`; horizontal motion is resolved against the collision world.
#[derive(Resource, Debug, Clone)]
pub struct PlayerController {
    config: PlayerConfig,
    position: Vec3,
    vertical_velocity: f32,
    crouched: bool,
    sliding: bool,
    slide_timer: f32,
    slide_cooldown_timer: f32,
    slide_dir: Vec3,
    slide_speed: f32,
    weapon_speed_mul: f32,
    cam_y: f32,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(&PlayerConfig::default())
    }
}

impl PlayerController {
    /// Creates a standing player resting on the ground plane at the origin.
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            position: Vec3::new(0.0, config.ground_y + config.half_height_stand, 0.0),
            vertical_velocity: 0.0,
            crouched: false,
            sliding: false,
            slide_timer: 0.0,
            slide_cooldown_timer: 0.0,
            slide_dir: Vec3::NEG_Z,
            slide_speed: 0.0,
            weapon_speed_mul: 1.0,
            cam_y: config.stand_cam_y,
            config: config.clone(),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    pub fn is_crouched(&self) -> bool {
        self.crouched
    }

    pub fn is_sliding(&self) -> bool {
        self.sliding
    }

    pub fn slide_speed(&self) -> f32 {
        self.slide_speed
    }

    /// Seconds until another slide may start.
    pub fn slide_cooldown_remaining(&self) -> f32 {
        self.slide_cooldown_timer
    }

    pub fn radius(&self) -> f32 {
        self.config.radius
    }

    /// Center-to-feet distance for the current stance.
    pub fn half_height(&self) -> f32 {
        if self.crouched {
            self.config.half_height_crouch
        } else {
            self.config.half_height_stand
        }
    }

    /// Current eye height above the feet.
    pub fn cam_y(&self) -> f32 {
        self.cam_y
    }

    /// Bottom of the capsule.
    pub fn feet_position(&self) -> Vec3 {
        self.position - Vec3::Y * self.half_height()
    }

    /// World-space camera position.
    pub fn eye_position(&self) -> Vec3 {
        self.feet_position() + Vec3::Y * self.cam_y
    }

    pub fn weapon_speed_mul(&self) -> f32 {
        self.weapon_speed_mul
    }

    /// Movement slow imposed by the held weapon. Non-finite or negative
    /// values reset to 1.0.
    pub fn set_weapon_speed_mul(&mut self, mul: f32) {
        self.weapon_speed_mul = if mul.is_finite() && mul >= 0.0 {
            mul
        } else {
            1.0
        };
    }

    /// Moves the player and clears vertical velocity and any slide.
    pub fn teleport_to(&mut self, position: Vec3) {
        self.position = position;
        self.vertical_velocity = 0.0;
        self.sliding = false;
        self.slide_timer = 0.0;
        self.slide_cooldown_timer = 0.0;
        self.slide_speed = 0.0;
        debug!(?position, "Player teleported");
    }

    /// Advances movement by `dt` seconds.
    ///
    /// `view` supplies the facing; only its yaw matters.
    pub fn update(
        &mut self,
        dt: f32,
        input: &MoveInput,
        view: &Orientation,
        world: &CollisionWorld,
    ) -> MoveOutcome {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let move_x = finite_or_zero(input.move_x);
        let move_z = finite_or_zero(input.move_z);
        let half_height = self.half_height();

        if self.slide_cooldown_timer > 0.0 {
            self.slide_cooldown_timer = (self.slide_cooldown_timer - dt).max(0.0);
        }

        let min_center_y = self.config.ground_y + half_height;
        let mut grounded = false;
        if self.position.y <= min_center_y + GROUND_EPSILON {
            grounded = true;
            self.position.y = min_center_y;
            if self.vertical_velocity < 0.0 {
                self.vertical_velocity = 0.0;
            }
        }

        let forward = view.forward_xz();
        let right = view.right_xz();

        if input.crouch_toggle_pressed && grounded {
            let wants_slide = input.sprint_held
                && move_z > FORWARD_THRESHOLD
                && !self.sliding
                && self.slide_cooldown_timer <= 0.0;
            if wants_slide {
                self.start_slide(forward);
            } else {
                self.crouched = !self.crouched;
                debug!(crouched = self.crouched, "Crouch toggled");
            }
        }

        if input.jump_pressed && grounded && !self.sliding {
            self.vertical_velocity = self.config.jump_speed;
            grounded = false;
        }

        if !grounded {
            self.vertical_velocity -= self.config.gravity * dt;
            self.position.y += self.vertical_velocity * dt;
        }

        let velocity = if self.sliding {
            self.advance_slide(dt)
        } else {
            self.walk_velocity(move_x, move_z, input.sprint_held, forward, right)
        };

        let collided = self.move_horizontal(velocity, dt, half_height, world);

        let target_cam_y = if self.crouched {
            self.config.crouch_cam_y
        } else {
            self.config.stand_cam_y
        };
        self.cam_y += (target_cam_y - self.cam_y) * (dt * CAMERA_EASE_RATE).min(1.0);

        MoveOutcome { grounded, collided }
    }

    fn start_slide(&mut self, forward: Vec3) {
        self.sliding = true;
        self.crouched = true;
        self.slide_timer = self.config.slide_duration;
        self.slide_cooldown_timer = self.config.slide_cooldown;
        self.slide_dir = forward.normalize_or(Vec3::NEG_Z);
        self.slide_speed = self.config.speed * self.config.sprint_mul * SLIDE_BOOST;
        debug!(speed = self.slide_speed, "Slide started");
    }

    fn end_slide(&mut self) {
        self.sliding = false;
        self.slide_speed = 0.0;
        debug!("Slide ended");
    }

    /// Returns this frame's slide velocity, then decays the slide.
    fn advance_slide(&mut self, dt: f32) -> Vec3 {
        let velocity = self.slide_dir * self.slide_speed;

        self.slide_speed = (self.slide_speed - self.config.slide_friction * dt).max(0.0);
        self.slide_timer -= dt;

        if self.slide_timer <= 0.0 || self.slide_speed <= self.config.speed * SLIDE_END_RATIO {
            self.end_slide();
        }
        velocity
    }

    fn walk_velocity(
        &self,
        move_x: f32,
        move_z: f32,
        sprint_held: bool,
        forward: Vec3,
        right: Vec3,
    ) -> Vec3 {
        let mut dir = right * move_x + forward * move_z;
        if dir.length_squared() > 1e-6 {
            dir = dir.normalize();
        }

        let mut speed_mul = 1.0;
        if sprint_held && move_z > FORWARD_THRESHOLD && !self.crouched {
            speed_mul *= self.config.sprint_mul;
        }
        if self.crouched {
            speed_mul *= self.config.crouch_mul;
        }
        speed_mul *= self.weapon_speed_mul;

        dir * self.config.speed * speed_mul
    }

    /// Sub-stepped XZ move so a fast player cannot skip through thin boxes.
    fn move_horizontal(
        &mut self,
        velocity: Vec3,
        dt: f32,
        half_height: f32,
        world: &CollisionWorld,
    ) -> bool {
        let horizontal_speed = Vec2::new(velocity.x, velocity.z).length();
        let max_step = self.config.radius * SUBSTEP_RADIUS_FRACTION;
        // NaN casts to 0 and infinity saturates, both clamp into range.
        let steps = ((horizontal_speed * dt / max_step).ceil() as u32).clamp(1, MAX_SUBSTEPS);
        let step_dt = dt / steps as f32;

        let mut collided = false;
        for _ in 0..steps {
            self.position.x += velocity.x * step_dt;
            self.position.z += velocity.z * step_dt;

            let resolution = world.resolve_capsule_xz(self.position, self.config.radius, half_height);
            self.position = resolution.position;

            if resolution.collided {
                collided = true;
                if self.sliding {
                    self.slide_speed = (self.slide_speed
                        - self.config.slide_friction * step_dt * SLIDE_BONK_FRICTION)
                        .max(0.0);
                    if self.slide_speed <= self.config.speed * SLIDE_BONK_END_RATIO {
                        self.end_slide();
                    }
                }
            }
        }

        if steps > 1 {
            trace!(steps, collided, "Sub-stepped horizontal move");
        }
        collided
    }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}
