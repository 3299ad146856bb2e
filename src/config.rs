//! Match tuning
//!
//! Everything the physics reads lives in one struct so several matches with
//! different tuning can run side by side in the same process.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Physical and gameplay tuning for a single match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Timing ===
    /// Fixed tick duration (seconds)
    pub dt: f32,

    // === Field ===
    /// Field width (meters)
    pub field_width: f32,
    /// Field height (meters)
    pub field_height: f32,
    /// Sensor output scale (pixels per meter)
    pub pixels_per_meter: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_mass: f32,
    pub ball_max_linear_speed: f32,
    pub ball_max_angular_speed: f32,
    /// Gravitational acceleration used by rolling friction
    pub gravity: f32,
    /// Rolling friction slowdown coefficient
    pub friction_slowdown: f32,

    // === Collisions ===
    pub player_mass: f32,
    /// Multiplier applied to the post-impulse ball velocity
    pub bounce_factor: f32,
    /// Resting-ball speed threshold for momentum capture
    pub capture_speed: f32,

    // === Vision ===
    /// Half angle of the sensor cone (radians)
    pub vision_half_angle: f32,
    /// Landmark flags per field edge
    pub flag_resolution: usize,

    // === Goals ===
    pub goal_depth: f32,
    pub goal_half_height: f32,
    pub goal_cooldown_secs: f64,
    pub restart_hold_secs: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: SIM_DT,

            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            pixels_per_meter: M2PIX,

            ball_radius: BALL_RADIUS,
            ball_mass: BALL_MASS,
            ball_max_linear_speed: BALL_MAX_LINEAR_SPEED,
            ball_max_angular_speed: BALL_MAX_ANGULAR_SPEED,
            gravity: GRAVITY,
            friction_slowdown: FRICTION_SLOWDOWN,

            player_mass: PLAYER_MASS,
            bounce_factor: BOUNCE_FACTOR,
            capture_speed: CAPTURE_SPEED,

            vision_half_angle: VISION_HALF_ANGLE,
            flag_resolution: FLAG_RESOLUTION,

            goal_depth: GOAL_DEPTH,
            goal_half_height: GOAL_HALF_HEIGHT,
            goal_cooldown_secs: GOAL_COOLDOWN_SECS,
            restart_hold_secs: RESTART_HOLD_SECS,
        }
    }
}

impl SimConfig {
    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::info!(
            "Loaded match config: field {}x{} m, dt {:.4} s",
            config.field_width,
            config.field_height,
            config.dt
        );
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Per-tick rolling friction scale: g * slowdown * dt, expressed per pixel
    pub fn friction_factor(&self) -> f32 {
        self.gravity * self.friction_slowdown * self.dt / self.pixels_per_meter
    }

    /// Reject tunings the physics cannot run with
    pub fn validate(&self) -> Result<(), SimError> {
        let positive = [
            ("dt", self.dt),
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("pixels_per_meter", self.pixels_per_meter),
            ("ball_radius", self.ball_radius),
            ("ball_mass", self.ball_mass),
            ("player_mass", self.player_mass),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.flag_resolution == 0 {
            return Err(SimError::InvalidConfig(
                "flag_resolution must be at least 1".into(),
            ));
        }
        if !(0.0..=std::f32::consts::PI).contains(&self.vision_half_angle) {
            return Err(SimError::InvalidConfig(format!(
                "vision_half_angle out of range: {}",
                self.vision_half_angle
            )));
        }
        if self.goal_cooldown_secs < 0.0 || self.restart_hold_secs < 0.0 {
            return Err(SimError::InvalidConfig(
                "goal timings must not be negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_friction_factor_default() {
        let config = SimConfig::default();
        let expected = 9.8 * 0.5 * (1.0 / 60.0) / 100.0;
        assert!((config.friction_factor() - expected).abs() < 1e-7);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json_str(r#"{ "bounce_factor": 1.5 }"#).unwrap();
        assert_eq!(config.bounce_factor, 1.5);
        assert_eq!(config.field_width, FIELD_WIDTH);
    }

    #[test]
    fn test_json_round_trip() {
        let config = SimConfig {
            flag_resolution: 4,
            ..Default::default()
        };
        let json = config.to_json_string().unwrap();
        assert_eq!(SimConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_values() {
        let zero_mass = SimConfig {
            ball_mass: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            zero_mass.validate(),
            Err(SimError::InvalidConfig(_))
        ));

        let no_flags = SimConfig {
            flag_resolution: 0,
            ..Default::default()
        };
        assert!(no_flags.validate().is_err());

        assert!(matches!(
            SimConfig::from_json_str("{ not json"),
            Err(SimError::Config(_))
        ));
    }
}
