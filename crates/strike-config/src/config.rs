//! Configuration structs with gameplay defaults and RON persistence.

use std::f32::consts::{FRAC_PI_2, PI};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Lowest accepted look sensitivity.
pub const MIN_SENSITIVITY: f32 = 0.2;
/// Highest accepted look sensitivity.
pub const MAX_SENSITIVITY: f32 = 3.0;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub camera: CameraConfig,
    pub player: PlayerConfig,
    pub combat: CombatConfig,
    pub debug: DebugConfig,
}

/// Which control scheme the player chose.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ControlPreset {
    #[default]
    Pc,
    Mobile,
    MobileKeyboard,
}

/// Live player input preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Look sensitivity multiplier, kept within
    /// [`MIN_SENSITIVITY`]..=[`MAX_SENSITIVITY`] by [`sanitize`](Self::sanitize).
    pub sensitivity: f32,
    pub control_preset: ControlPreset,
}

/// Camera/orientation tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Radians of rotation per mouse pixel at sensitivity 1.0.
    pub mouse_scale: f32,
    /// Radians of rotation per touch pixel at sensitivity 1.0.
    pub touch_scale: f32,
    /// Pitch is clamped to ±pitch_limit radians.
    pub pitch_limit: f32,
    /// Yaw in radians before any spawn heading is applied.
    pub initial_yaw: f32,
    /// Exponential recoil recovery rate (1/s).
    pub recoil_return_speed: f32,
}

/// Player movement tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Walk speed in m/s.
    pub speed: f32,
    /// Downward acceleration in m/s².
    pub gravity: f32,
    /// Upward velocity applied on jump, m/s.
    pub jump_speed: f32,
    /// Height of the ground plane.
    pub ground_y: f32,
    /// Capsule radius.
    pub radius: f32,
    pub half_height_stand: f32,
    pub half_height_crouch: f32,
    pub sprint_mul: f32,
    pub crouch_mul: f32,
    /// Seconds a slide lasts at most.
    pub slide_duration: f32,
    /// Seconds before another slide may start.
    pub slide_cooldown: f32,
    /// Slide deceleration in m/s².
    pub slide_friction: f32,
    /// Eye height above the feet when standing.
    pub stand_cam_y: f32,
    pub crouch_cam_y: f32,
}

/// Defaults for newly registered damageable entities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CombatConfig {
    pub max_hp: f32,
    /// Entity height in meters, measured up from its root.
    pub height: f32,
    /// Fraction of `height` above which a hit counts as a headshot.
    pub headshot_y_ratio: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter override (e.g., "debug", "info,strike_combat=trace").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            control_preset: ControlPreset::Pc,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            mouse_scale: 0.0020,
            touch_scale: 0.0035,
            pitch_limit: PI * 0.49,
            initial_yaw: -PI / 2.0,
            recoil_return_speed: 14.0,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 6.0,
            gravity: 18.0,
            jump_speed: 6.5,
            ground_y: 0.0,
            radius: 0.38,
            half_height_stand: 1.0,
            half_height_crouch: 0.75,
            sprint_mul: 1.40,
            crouch_mul: 0.50,
            slide_duration: 0.75,
            slide_cooldown: 3.0,
            slide_friction: 14.0,
            stand_cam_y: 1.6,
            crouch_cam_y: 1.15,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            max_hp: 100.0,
            height: 1.8,
            headshot_y_ratio: 0.78,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl InputConfig {
    /// Clamps sensitivity into the accepted range; non-finite values reset
    /// to 1.0.
    pub fn sanitize(&mut self) {
        self.sensitivity = if self.sensitivity.is_finite() {
            self.sensitivity.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY)
        } else {
            1.0
        };
    }
}

impl CameraConfig {
    /// Resets non-finite or non-positive tuning to its default and keeps the
    /// pitch limit within a quarter turn.
    pub fn sanitize(&mut self) {
        let defaults = Self::default();
        self.mouse_scale = positive_or(self.mouse_scale, defaults.mouse_scale);
        self.touch_scale = positive_or(self.touch_scale, defaults.touch_scale);
        self.recoil_return_speed =
            positive_or(self.recoil_return_speed, defaults.recoil_return_speed);
        self.pitch_limit = if self.pitch_limit.is_finite() {
            self.pitch_limit.abs().min(FRAC_PI_2)
        } else {
            defaults.pitch_limit
        };
        if !self.initial_yaw.is_finite() {
            self.initial_yaw = defaults.initial_yaw;
        }
    }
}

impl Config {
    /// Normalizes values a hand-edited file may have pushed out of range.
    pub fn sanitize(&mut self) {
        self.input.sanitize();
        self.camera.sanitize();
    }
}

fn positive_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() && v > 0.0 { v } else { fallback }
}

/// Per-user config directory: `<platform config dir>/strike`.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|d| d.join("strike"))
        .ok_or(ConfigError::NoConfigDir)
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized).map_err(ConfigError::WriteError)
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;
        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let mut config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        config.sanitize();
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_gameplay_tuning() {
        let config = Config::default();
        assert_eq!(config.camera.mouse_scale, 0.0020);
        assert_eq!(config.camera.touch_scale, 0.0035);
        assert_eq!(config.camera.recoil_return_speed, 14.0);
        assert!((config.camera.pitch_limit - PI * 0.49).abs() < 1e-6);
        assert_eq!(config.combat.max_hp, 100.0);
        assert_eq!(config.combat.headshot_y_ratio, 0.78);
        assert_eq!(config.player.radius, 0.38);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(input: (sensitivity: 2.0))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.input.sensitivity, 2.0);
        assert_eq!(config.input.control_preset, ControlPreset::Pc);
        assert_eq!(config.player, PlayerConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_sensitivity_sanitized() {
        let mut input = InputConfig {
            sensitivity: 9.0,
            ..Default::default()
        };
        input.sanitize();
        assert_eq!(input.sensitivity, MAX_SENSITIVITY);

        input.sensitivity = 0.0;
        input.sanitize();
        assert_eq!(input.sensitivity, MIN_SENSITIVITY);

        input.sensitivity = f32::NAN;
        input.sanitize();
        assert_eq!(input.sensitivity, 1.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.input.sensitivity = 1.7;
        config.input.control_preset = ControlPreset::Mobile;
        config.player.speed = 7.5;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_load_sanitizes_hand_edited_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "(input: (sensitivity: 50.0))").unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config.input.sensitivity, MAX_SENSITIVITY);
    }

    #[test]
    fn test_load_sanitizes_camera_section() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "(camera: (pitch_limit: NaN, mouse_scale: NaN, touch_scale: -1.0, recoil_return_speed: 0.0))",
        )
        .unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_camera_pitch_limit_capped_to_quarter_turn() {
        let mut camera = CameraConfig {
            pitch_limit: -4.0,
            initial_yaw: f32::INFINITY,
            ..Default::default()
        };
        camera.sanitize();
        assert_eq!(camera.pitch_limit, FRAC_PI_2);
        assert_eq!(camera.initial_yaw, CameraConfig::default().initial_yaw);

        let mut infinite = CameraConfig {
            pitch_limit: f32::INFINITY,
            ..Default::default()
        };
        infinite.sanitize();
        assert!((infinite.pitch_limit - PI * 0.49).abs() < 1e-6);
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.camera.recoil_return_speed = 20.0;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.camera.recoil_return_speed), Some(20.0));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
