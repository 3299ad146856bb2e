//! Differential-drive agents
//!
//! An agent is a disc driven by one linear and one angular speed. Players add
//! a vision sensor; the ball (see `ball.rs`) adds its own controller.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Contact;
use super::geometry::Pose;
use super::sensor::Sensor;
use crate::config::SimConfig;
use crate::consts::ANGULAR_EPSILON;
use crate::normalize_angle;
use crate::polar_to_cartesian;

/// Kinematic state shared by players and the ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub pose: Pose,
    pub linear_speed: f32,
    pub angular_speed: f32,
    pub max_linear_speed: f32,
    pub max_angular_speed: f32,
    pub radius: f32,
    /// Collision report from the current tick
    pub contact: Contact,
}

impl Agent {
    pub fn new(pose: Pose, max_linear_speed: f32, max_angular_speed: f32, radius: f32) -> Self {
        Self {
            pose,
            linear_speed: 0.0,
            angular_speed: 0.0,
            max_linear_speed: max_linear_speed.abs(),
            max_angular_speed: max_angular_speed.abs(),
            radius,
            contact: Contact::none(),
        }
    }

    /// Set both speeds, saturating each at its limit
    pub fn set_velocity(&mut self, linear_speed: f32, angular_speed: f32) {
        self.linear_speed = linear_speed.clamp(-self.max_linear_speed, self.max_linear_speed);
        self.angular_speed = angular_speed.clamp(-self.max_angular_speed, self.max_angular_speed);
    }

    #[inline]
    pub fn bumper_state(&self) -> bool {
        self.contact.bumper
    }

    /// Cartesian velocity from (linear speed, heading)
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        polar_to_cartesian(self.linear_speed, self.pose.rotation)
    }

    /// Move one fixed step with the current speeds
    pub fn advance(&mut self, dt: f32) {
        self.pose = integrate(self.pose, self.linear_speed, self.angular_speed, dt);
    }
}

/// Exact unicycle motion over `dt`
///
/// Near `w = 0` the arc solution has a removable singularity, so the
/// straight-line limit is used instead.
pub fn integrate(pose: Pose, v: f32, w: f32, dt: f32) -> Pose {
    if w.abs() < ANGULAR_EPSILON {
        integrate_straight(pose, v, w, dt)
    } else {
        integrate_arc(pose, v, w, dt)
    }
}

fn integrate_straight(pose: Pose, v: f32, w: f32, dt: f32) -> Pose {
    let mid = pose.rotation + w * dt / 2.0;
    Pose {
        position: pose.position + Vec2::new(mid.cos(), mid.sin()) * (v * dt),
        rotation: pose.rotation + w * dt,
    }
}

fn integrate_arc(pose: Pose, v: f32, w: f32, dt: f32) -> Pose {
    let mid = pose.rotation + w * dt / 2.0;
    let chord = (2.0 * v / w) * (w * dt / 2.0).sin();
    Pose {
        position: pose.position + Vec2::new(mid.cos(), mid.sin()) * chord,
        rotation: pose.rotation + w * dt,
    }
}

/// A robot player: an agent with a vision sensor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub agent: Agent,
    pub sensor: Sensor,
}

impl Player {
    pub fn new(
        pose: Pose,
        max_linear_speed: f32,
        max_angular_speed: f32,
        radius: f32,
        config: &SimConfig,
    ) -> Self {
        Self {
            agent: Agent::new(pose, max_linear_speed, max_angular_speed, radius),
            sensor: Sensor::new(config),
        }
    }

    pub fn set_velocity(&mut self, linear_speed: f32, angular_speed: f32) {
        self.agent.set_velocity(linear_speed, angular_speed);
    }

    /// Players have no behavior of their own; they just integrate.
    /// Headings are kept in [-π, π) so long spins stay bounded.
    pub fn update(&mut self, dt: f32) {
        self.agent.advance(dt);
        self.agent.pose.rotation = normalize_angle(self.agent.pose.rotation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_straight_line_step() {
        let mut agent = Agent::new(Pose::new(1.0, 1.0, 0.0), 2.0, 2.0, 0.1);
        agent.set_velocity(1.0, 0.0);
        agent.advance(0.5);
        assert!((agent.pose.position.x - 1.5).abs() < 1e-6);
        assert!((agent.pose.position.y - 1.0).abs() < 1e-6);
        assert_eq!(agent.pose.rotation, 0.0);
    }

    #[test]
    fn test_quarter_turn_arc() {
        // v = 1, w = π/2 for 1 s traces a quarter circle of radius 2/π
        let pose = integrate(Pose::new(0.0, 0.0, 0.0), 1.0, FRAC_PI_2, 1.0);
        let r = 2.0 / std::f32::consts::PI;
        assert!((pose.position.x - r).abs() < 1e-5);
        assert!((pose.position.y - r).abs() < 1e-5);
        assert!((pose.rotation - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_spin_in_place() {
        let pose = integrate(Pose::new(2.0, 3.0, 0.0), 0.0, 1.0, SIM_DT);
        assert_eq!(pose.position, Vec2::new(2.0, 3.0));
        assert!((pose.rotation - SIM_DT).abs() < 1e-7);
    }

    #[test]
    fn test_zero_angular_speed_is_finite() {
        let pose = integrate(Pose::new(0.0, 0.0, 0.3), 1.0, 0.0, SIM_DT);
        assert!(pose.position.is_finite());
    }

    #[test]
    fn test_player_update_moves() {
        let config = SimConfig::default();
        let mut player = Player::new(Pose::new(3.0, 3.0, FRAC_PI_2), 1.0, 1.0, 0.17, &config);
        player.set_velocity(5.0, 0.0);
        assert_eq!(player.agent.linear_speed, 1.0);
        player.update(1.0);
        assert!((player.agent.pose.position.y - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_spinning_player_heading_stays_wrapped() {
        let config = SimConfig::default();
        let mut player = Player::new(Pose::new(3.0, 3.0, 0.0), 1.0, 2.0, 0.17, &config);
        player.set_velocity(0.0, 2.0);
        for _ in 0..600 {
            player.update(SIM_DT);
            let heading = player.agent.pose.rotation;
            assert!((-std::f32::consts::PI..std::f32::consts::PI).contains(&heading));
        }
        // 10 s at 2 rad/s is 20 rad, which wraps to 20 - 6π
        let expected = 20.0 - 6.0 * std::f32::consts::PI;
        assert!((player.agent.pose.rotation - expected).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn set_velocity_saturates(
            max_lin in 0.0f32..10.0,
            max_ang in 0.0f32..10.0,
            lin in -100.0f32..100.0,
            ang in -100.0f32..100.0,
        ) {
            let mut agent = Agent::new(Pose::new(0.0, 0.0, 0.0), max_lin, max_ang, 0.1);
            agent.set_velocity(lin, ang);
            prop_assert_eq!(agent.linear_speed, lin.clamp(-max_lin, max_lin));
            prop_assert_eq!(agent.angular_speed, ang.clamp(-max_ang, max_ang));
            prop_assert!(agent.linear_speed.abs() <= max_lin);
            prop_assert!(agent.angular_speed.abs() <= max_ang);
        }

        #[test]
        fn arc_matches_straight_limit(
            v in -2.0f32..2.0,
            theta in -3.0f32..3.0,
        ) {
            let start = Pose::new(1.0, 1.0, theta);
            let straight = integrate_straight(start, v, 0.0, SIM_DT);
            let arc = integrate_arc(start, v, 1.0e-4, SIM_DT);
            prop_assert!((straight.position - arc.position).length() < 1e-5);
            prop_assert!((straight.rotation - arc.rotation).abs() < 1e-5);
        }
    }
}
