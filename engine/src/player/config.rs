//! Controller configuration
//!
//! Every tunable of the character controller, with the defaults the feel
//! was tuned around. Configurations can be edited at runtime, persisted to
//! JSON for designer iteration, and are validated up front: a degenerate
//! configuration is a programming error and fails fast at controller
//! construction rather than producing silently wrong motion.

use std::path::Path;

use serde::{Deserialize, Serialize};
use static_assertions::const_assert;
use tracing::debug;

use crate::physics::collision::LayerMask;
use crate::physics::probe::{Bounds, CollisionProbe};
use crate::physics::types::Vec2;

// ============================================================================
// DEFAULT TUNING
// ============================================================================

/// Horizontal acceleration per tick while input is held
pub const ACCELERATION: f32 = 30.0;

/// Maximum horizontal speed in m/s
pub const MOVE_CLAMP: f32 = 13.0;

/// Horizontal decay per tick while no input is held
pub const DE_ACCELERATION: f32 = 0.3;

/// Extra horizontal speed granted at the apex of a jump
pub const APEX_BONUS: f32 = 2.0;

/// Terminal fall speed in m/s (most negative vertical speed)
pub const FALL_CLAMP: f32 = -30.0;

/// Fall acceleration far from the jump apex, in m/s^2
pub const MIN_FALL_SPEED: f32 = 80.0;

/// Fall acceleration at the jump apex, in m/s^2
pub const MAX_FALL_SPEED: f32 = 120.0;

/// Vertical speed applied by a jump impulse, in m/s
pub const JUMP_HEIGHT: f32 = 30.0;

/// Vertical speed magnitude below which the apex point ramps toward 1
pub const JUMP_APEX_THRESHOLD: f32 = 10.0;

/// Seconds after leaving a ledge during which a jump still triggers
pub const COYOTE_TIME_THRESHOLD: f32 = 0.1;

/// Seconds before landing during which a jump press is banked
pub const JUMP_BUFFER: f32 = 0.1;

/// Detection rays per bounding-box edge
pub const DETECTOR_COUNT: u32 = 3;

/// Length of each detection ray in meters
pub const DETECTION_RAY_LENGTH: f32 = 0.3;

/// Hit distance below which an edge counts as colliding
pub const DETECTION_THRESHOLD: f32 = 0.01;

/// Speed used to push the character out of overlapping geometry, in m/s
pub const OBSTACLE_ESCAPE_SPEED: f32 = 1.0;

/// Edge endpoint inset that keeps side rays off the floor at corners
pub const RAY_BUFFER: f32 = 0.1;

/// Valid range for [`RAY_BUFFER`]
pub const RAY_BUFFER_RANGE: (f32, f32) = (0.1, 0.3);

const_assert!(DETECTOR_COUNT >= 1);
const_assert!(MIN_FALL_SPEED <= MAX_FALL_SPEED);
const_assert!(FALL_CLAMP < 0.0);
const_assert!(RAY_BUFFER_RANGE.0 <= RAY_BUFFER && RAY_BUFFER <= RAY_BUFFER_RANGE.1);

// ============================================================================
// CONFIG
// ============================================================================

/// Complete tuning set for one character controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    // Walking
    pub acceleration: f32,
    pub move_clamp: f32,
    pub de_acceleration: f32,
    pub apex_bonus: f32,

    // Gravity
    pub fall_clamp: f32,
    pub min_fall_speed: f32,
    pub max_fall_speed: f32,

    // Jumping
    pub jump_height: f32,
    pub jump_apex_threshold: f32,
    pub coyote_time_threshold: f32,
    pub jump_buffer: f32,

    // Collision
    pub detector_count: u32,
    pub detection_ray_length: f32,
    pub detection_threshold: f32,
    pub obstacle_escape_speed: f32,
    pub ray_buffer: f32,
    pub character_bounds: Bounds,
    pub ground_mask: LayerMask,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            acceleration: ACCELERATION,
            move_clamp: MOVE_CLAMP,
            de_acceleration: DE_ACCELERATION,
            apex_bonus: APEX_BONUS,
            fall_clamp: FALL_CLAMP,
            min_fall_speed: MIN_FALL_SPEED,
            max_fall_speed: MAX_FALL_SPEED,
            jump_height: JUMP_HEIGHT,
            jump_apex_threshold: JUMP_APEX_THRESHOLD,
            coyote_time_threshold: COYOTE_TIME_THRESHOLD,
            jump_buffer: JUMP_BUFFER,
            detector_count: DETECTOR_COUNT,
            detection_ray_length: DETECTION_RAY_LENGTH,
            detection_threshold: DETECTION_THRESHOLD,
            obstacle_escape_speed: OBSTACLE_ESCAPE_SPEED,
            ray_buffer: RAY_BUFFER,
            character_bounds: Bounds::new(Vec2::new(-0.5, -1.0), Vec2::new(0.5, 1.0)),
            ground_mask: LayerMask::GROUND,
        }
    }
}

impl ControllerConfig {
    /// Check every tunable for sanity.
    ///
    /// Returns the first violation found. Hosts that accept user-edited
    /// config files should call this and surface the error; controller
    /// construction calls [`assert_valid`](Self::assert_valid) regardless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.detector_count < 1 {
            return Err(ConfigError::ZeroDetectors);
        }
        if self.acceleration <= 0.0 {
            return Err(ConfigError::NonPositive("acceleration"));
        }
        if self.move_clamp <= 0.0 {
            return Err(ConfigError::NonPositive("move_clamp"));
        }
        if self.de_acceleration <= 0.0 {
            return Err(ConfigError::NonPositive("de_acceleration"));
        }
        if self.apex_bonus < 0.0 {
            return Err(ConfigError::Negative("apex_bonus"));
        }
        if self.fall_clamp >= 0.0 {
            return Err(ConfigError::FallClampNotNegative(self.fall_clamp));
        }
        if self.min_fall_speed <= 0.0 {
            return Err(ConfigError::NonPositive("min_fall_speed"));
        }
        if self.min_fall_speed > self.max_fall_speed {
            return Err(ConfigError::FallSpeedRangeInverted {
                min: self.min_fall_speed,
                max: self.max_fall_speed,
            });
        }
        if self.jump_height <= 0.0 {
            return Err(ConfigError::NonPositive("jump_height"));
        }
        if self.jump_apex_threshold <= 0.0 {
            return Err(ConfigError::NonPositive("jump_apex_threshold"));
        }
        if self.coyote_time_threshold < 0.0 {
            return Err(ConfigError::Negative("coyote_time_threshold"));
        }
        if self.jump_buffer < 0.0 {
            return Err(ConfigError::Negative("jump_buffer"));
        }
        if self.detection_ray_length <= 0.0 {
            return Err(ConfigError::NonPositive("detection_ray_length"));
        }
        if self.detection_threshold < 0.0 {
            return Err(ConfigError::Negative("detection_threshold"));
        }
        if self.obstacle_escape_speed <= 0.0 {
            return Err(ConfigError::NonPositive("obstacle_escape_speed"));
        }
        if self.ray_buffer < RAY_BUFFER_RANGE.0 || self.ray_buffer > RAY_BUFFER_RANGE.1 {
            return Err(ConfigError::RayBufferOutOfRange(self.ray_buffer));
        }
        if !self.character_bounds.is_valid() {
            return Err(ConfigError::DegenerateBounds);
        }
        Ok(())
    }

    /// Panic with a descriptive message if the configuration is invalid.
    pub fn assert_valid(&self) {
        if let Err(err) = self.validate() {
            panic!("invalid controller config: {err}");
        }
    }

    /// Build the edge probe for this configuration.
    pub fn probe(&self) -> CollisionProbe {
        CollisionProbe::new(
            self.detector_count,
            self.detection_ray_length,
            self.detection_threshold,
            self.ray_buffer,
        )
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn load_json(path: &Path) -> Result<Self, ConfigFileError> {
        let text = std::fs::read_to_string(path)?;
        let config: ControllerConfig = serde_json::from_str(&text)?;
        config.validate()?;
        debug!(path = %path.display(), "loaded controller config");
        Ok(config)
    }

    /// Write the configuration to a JSON file, creating parent directories
    /// as needed.
    pub fn save_json(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

// ============================================================================
// ERROR TYPES
// ============================================================================

/// A configuration value that cannot produce meaningful motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// The named field must be strictly positive.
    NonPositive(&'static str),
    /// The named field must not be negative.
    Negative(&'static str),
    /// `detector_count` must be at least 1.
    ZeroDetectors,
    /// `fall_clamp` is a terminal fall speed and must be negative.
    FallClampNotNegative(f32),
    /// `min_fall_speed` must not exceed `max_fall_speed`.
    FallSpeedRangeInverted { min: f32, max: f32 },
    /// `ray_buffer` must stay within [`RAY_BUFFER_RANGE`].
    RayBufferOutOfRange(f32),
    /// `character_bounds` must have positive extent on both axes.
    DegenerateBounds,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NonPositive(field) => write!(f, "{field} must be > 0"),
            ConfigError::Negative(field) => write!(f, "{field} must be >= 0"),
            ConfigError::ZeroDetectors => write!(f, "detector_count must be at least 1"),
            ConfigError::FallClampNotNegative(v) => {
                write!(f, "fall_clamp must be negative, got {v}")
            }
            ConfigError::FallSpeedRangeInverted { min, max } => {
                write!(f, "min_fall_speed {min} exceeds max_fall_speed {max}")
            }
            ConfigError::RayBufferOutOfRange(v) => write!(
                f,
                "ray_buffer {v} outside [{}, {}]",
                RAY_BUFFER_RANGE.0, RAY_BUFFER_RANGE.1
            ),
            ConfigError::DegenerateBounds => {
                write!(f, "character_bounds must have positive extent")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors that can occur while loading or saving a config file.
#[derive(Debug)]
pub enum ConfigFileError {
    /// Standard I/O error.
    Io(std::io::Error),
    /// JSON serialization/deserialization error.
    Json(serde_json::Error),
    /// The file parsed but the values fail validation.
    Invalid(ConfigError),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigFileError::Io(e) => write!(f, "IO error: {e}"),
            ConfigFileError::Json(e) => write!(f, "JSON error: {e}"),
            ConfigFileError::Invalid(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {}

impl From<std::io::Error> for ConfigFileError {
    fn from(e: std::io::Error) -> Self {
        ConfigFileError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigFileError {
    fn from(e: serde_json::Error) -> Self {
        ConfigFileError::Json(e)
    }
}

impl From<ConfigError> for ConfigFileError {
    fn from(e: ConfigError) -> Self {
        ConfigFileError::Invalid(e)
    }
}
