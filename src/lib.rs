//! Robot Soccer - a headless 2D robot soccer simulation
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (kinematics, collisions, ball controller, vision, score)
//! - `config`: Data-driven match tuning
//! - `clock`: Injectable wall-clock source for the goal cooldown
//! - `error`: Errors raised at the match boundary

pub mod clock;
pub mod config;
pub mod error;
pub mod sim;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::SimConfig;
pub use error::SimError;

use glam::Vec2;

/// Default match constants (all lengths in meters)
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Meters per pixel and pixels per meter
    pub const PIX2M: f32 = 0.01;
    pub const M2PIX: f32 = 100.0;

    /// Field dimensions (1000 x 650 px)
    pub const FIELD_WIDTH: f32 = 1000.0 * PIX2M;
    pub const FIELD_HEIGHT: f32 = 650.0 * PIX2M;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 0.05;
    pub const BALL_MASS: f32 = 0.45;
    pub const BALL_MAX_LINEAR_SPEED: f32 = 1.0;
    pub const BALL_MAX_ANGULAR_SPEED: f32 = 100.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 0.34 / 2.0;
    pub const PLAYER_MASS: f32 = 75.0;

    /// Rolling friction inputs
    pub const GRAVITY: f32 = 9.8;
    pub const FRICTION_SLOWDOWN: f32 = 0.5;

    /// Empirical multiplier on the post-impulse ball velocity (tuned, not physical)
    pub const BOUNCE_FACTOR: f32 = 2.0;
    /// Below this speed a ball takes the kicking player's speed before the impulse
    pub const CAPTURE_SPEED: f32 = 1.0e-2;

    /// Vision cone half angle (tuned, not physical)
    pub const VISION_HALF_ANGLE: f32 = std::f32::consts::FRAC_PI_4;
    /// Landmark flags per field edge
    pub const FLAG_RESOLUTION: usize = 10;

    /// Goal mouth (30 px deep, 200 px tall)
    pub const GOAL_DEPTH: f32 = 30.0 * PIX2M;
    pub const GOAL_HALF_HEIGHT: f32 = 100.0 * PIX2M;
    /// Minimum wall-clock time between two counted goals
    pub const GOAL_COOLDOWN_SECS: f64 = 3.0;
    /// Poses are held at kickoff for this long after a goal
    pub const RESTART_HOLD_SECS: f64 = 1.0;

    /// Below this angular speed the straight-line integration branch is used
    pub const ANGULAR_EPSILON: f32 = 1.0e-3;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (speed, heading) to a cartesian velocity
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert a cartesian velocity to polar (speed, heading in (-π, π])
#[inline]
pub fn cartesian_to_polar(v: Vec2) -> (f32, f32) {
    (v.length(), v.y.atan2(v.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) - (-PI / 2.0)).abs() < 1e-6);
        assert!((normalize_angle(TAU + 0.25) - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_polar_of_backwards_velocity_is_pi() {
        let (speed, heading) = cartesian_to_polar(Vec2::new(-2.0, 0.0));
        assert!((speed - 2.0).abs() < 1e-6);
        assert!((heading - PI).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn polar_round_trip(speed in 0.01f32..50.0, heading in -3.1f32..3.1) {
            let v = polar_to_cartesian(speed, heading);
            let (r, theta) = cartesian_to_polar(v);
            prop_assert!((r - speed).abs() < 1e-3 * speed.max(1.0));
            let diff = normalize_angle(theta - heading);
            prop_assert!(diff.abs() < 1e-3);
        }
    }
}
