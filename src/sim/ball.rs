//! The ball and its two-state behavior controller
//!
//! The ball never integrates on its own. Each tick the controller first runs
//! its transition, which may redirect the ball, and then executes whichever
//! state it ended up in:
//!
//! - `Rolling`: decelerate by cube-root friction, then move straight
//! - `Reflecting`: move with the speed and heading the bounce produced
//!
//! A bumper hit sends `Rolling` to `Reflecting`. On the following tick
//! `Reflecting` bounces off whatever the ball is touching on that tick, if
//! anything, and always returns to `Rolling`.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::collision::{CollisionTarget, Contact};
use super::geometry::Pose;
use crate::cartesian_to_polar;
use crate::config::SimConfig;
use crate::consts::ANGULAR_EPSILON;

/// Ball controller state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallState {
    /// Free rolling. `first_activation` resets the friction counter on the
    /// first execute after a bounce (or a fresh match).
    Rolling { first_activation: bool },
    /// Bouncing. `trigger` is the contact that started it.
    Reflecting { trigger: Contact },
}

impl Default for BallState {
    fn default() -> Self {
        BallState::Rolling {
            first_activation: false,
        }
    }
}

impl BallState {
    pub fn name(&self) -> &'static str {
        match self {
            BallState::Rolling { .. } => "Rolling",
            BallState::Reflecting { .. } => "Reflecting",
        }
    }
}

/// Speed/heading override produced by a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Redirect {
    pub linear_speed: f32,
    pub rotation: f32,
}

/// Transition phase of the controller
///
/// Pure: reads the ball's current kinematics and this tick's contact, returns
/// the next state and any speed/heading override to apply before executing.
pub fn transition(state: BallState, ball: &Agent) -> (BallState, Option<Redirect>) {
    match state {
        BallState::Rolling { .. } if ball.contact.bumper => (
            BallState::Reflecting {
                trigger: ball.contact,
            },
            None,
        ),
        BallState::Rolling { .. } => (state, None),
        BallState::Reflecting { .. } => {
            let redirect = if ball.contact.bumper {
                reflect(ball, &ball.contact)
            } else {
                None
            };
            (
                BallState::Rolling {
                    first_activation: ball.contact.bumper,
                },
                redirect,
            )
        }
    }
}

/// Bounce geometry for a contact
///
/// Left/right walls mirror the x component of the travel direction, top/bottom
/// walls the y component. Player contacts take the precomputed impulse result.
pub fn reflect(ball: &Agent, contact: &Contact) -> Option<Redirect> {
    let travel = travel_direction(ball);
    let rotation = match contact.target? {
        CollisionTarget::Wall(wall) if wall.is_vertical_line() => {
            if ball.pose.rotation.abs() < ANGULAR_EPSILON {
                PI
            } else {
                cartesian_to_polar(Vec2::new(-travel.x, travel.y)).1
            }
        }
        CollisionTarget::Wall(_) => cartesian_to_polar(Vec2::new(travel.x, -travel.y)).1,
        CollisionTarget::Player(_) => {
            let (linear_speed, rotation) = contact.counterpart;
            return Some(Redirect {
                linear_speed,
                rotation,
            });
        }
    };
    Some(Redirect {
        linear_speed: ball.linear_speed,
        rotation,
    })
}

/// Velocity direction, falling back to the heading when the ball is at rest
fn travel_direction(ball: &Agent) -> Vec2 {
    let v = ball.velocity();
    if v == Vec2::ZERO {
        ball.pose.heading_vector()
    } else {
        v
    }
}

/// The match ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub agent: Agent,
    /// Ticks rolled since the last bounce
    pub friction_counter: u32,
    pub state: BallState,
}

impl Ball {
    pub fn new(pose: Pose, max_linear_speed: f32, max_angular_speed: f32, radius: f32) -> Self {
        Self {
            agent: Agent::new(pose, max_linear_speed, max_angular_speed, radius),
            friction_counter: 0,
            state: BallState::default(),
        }
    }

    /// Ball with the configured limits and radius
    pub fn from_config(pose: Pose, config: &SimConfig) -> Self {
        Self::new(
            pose,
            config.ball_max_linear_speed,
            config.ball_max_angular_speed,
            config.ball_radius,
        )
    }

    /// Run one controller step: transition, then execute
    pub fn update(&mut self, config: &SimConfig) {
        let (next, redirect) = transition(self.state, &self.agent);
        if next.name() != self.state.name() {
            log::trace!("ball {} -> {}", self.state.name(), next.name());
        }
        if let Some(redirect) = redirect {
            self.agent.linear_speed = redirect.linear_speed;
            self.agent.pose.rotation = redirect.rotation;
        }
        self.state = next;
        self.execute(config);
    }

    fn execute(&mut self, config: &SimConfig) {
        match self.state {
            BallState::Rolling { first_activation } => {
                if first_activation {
                    self.friction_counter = 0;
                } else {
                    self.friction_counter = self.friction_counter.saturating_add(1);
                }
                self.state = BallState::Rolling {
                    first_activation: false,
                };

                let drag = (config.friction_factor() * (self.friction_counter as f32).cbrt()).abs();
                let speed = (self.agent.linear_speed.abs() - drag).max(0.0);
                self.agent.set_velocity(speed, 0.0);
                self.agent.advance(config.dt);
            }
            BallState::Reflecting { .. } => self.agent.advance(config.dt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Wall;
    use std::f32::consts::FRAC_PI_4;

    fn rolling_ball(speed: f32, rotation: f32) -> Ball {
        let mut ball = Ball::from_config(Pose::new(5.0, 3.0, rotation), &SimConfig::default());
        ball.agent.linear_speed = speed;
        ball
    }

    #[test]
    fn test_rolling_friction_step() {
        let config = SimConfig::default();
        let mut ball = rolling_ball(1.0, 0.0);
        ball.update(&config);

        assert_eq!(ball.friction_counter, 1);
        let expected = 1.0 - config.friction_factor();
        assert!((ball.agent.linear_speed - expected).abs() < 1e-6);
        assert!((ball.agent.pose.position.x - (5.0 + expected * config.dt)).abs() < 1e-6);
        assert_eq!(ball.agent.angular_speed, 0.0);
    }

    #[test]
    fn test_friction_grows_with_cube_root() {
        let config = SimConfig::default();
        let mut ball = rolling_ball(1.0, 0.0);
        ball.friction_counter = 7;
        ball.update(&config);
        let expected = 1.0 - config.friction_factor() * 2.0;
        assert!((ball.agent.linear_speed - expected).abs() < 1e-6);
    }

    #[test]
    fn test_rolling_speed_floors_at_zero() {
        let config = SimConfig::default();
        let mut ball = rolling_ball(1.0e-5, 0.0);
        ball.friction_counter = 1000;
        ball.update(&config);
        assert_eq!(ball.agent.linear_speed, 0.0);
        assert_eq!(ball.agent.pose.position, Vec2::new(5.0, 3.0));
    }

    #[test]
    fn test_first_activation_resets_counter() {
        let config = SimConfig::default();
        let mut ball = rolling_ball(0.5, 0.0);
        ball.friction_counter = 40;
        ball.state = BallState::Rolling {
            first_activation: true,
        };
        ball.update(&config);
        assert_eq!(ball.friction_counter, 0);
        assert_eq!(ball.agent.linear_speed, 0.5);
        assert_eq!(
            ball.state,
            BallState::Rolling {
                first_activation: false
            }
        );
    }

    #[test]
    fn test_bumper_enters_reflecting_without_friction() {
        let config = SimConfig::default();
        let mut ball = rolling_ball(0.6, 0.0);
        ball.agent.contact = Contact::wall(Wall::Right);
        ball.update(&config);

        assert_eq!(
            ball.state,
            BallState::Reflecting {
                trigger: Contact::wall(Wall::Right)
            }
        );
        assert_eq!(ball.agent.linear_speed, 0.6);
        assert!((ball.agent.pose.position.x - (5.0 + 0.6 * config.dt)).abs() < 1e-6);
    }

    #[test]
    fn test_side_wall_bounce_reverses_heading() {
        let config = SimConfig::default();
        let mut ball = rolling_ball(0.6, 0.0);
        ball.state = BallState::Reflecting {
            trigger: Contact::wall(Wall::Right),
        };
        ball.agent.contact = Contact::wall(Wall::Right);
        ball.update(&config);

        assert_eq!(ball.agent.pose.rotation, PI);
        assert_eq!(ball.friction_counter, 0);
        assert!(ball.agent.pose.position.x < 5.0);
    }

    #[test]
    fn test_wall_mirror_geometry() {
        let mut agent = Agent::new(Pose::new(5.0, 3.0, FRAC_PI_4), 1.0, 100.0, 0.05);
        agent.linear_speed = 1.0;

        let left = reflect(&agent, &Contact::wall(Wall::Left)).unwrap();
        assert!((left.rotation - 3.0 * FRAC_PI_4).abs() < 1e-5);
        assert_eq!(left.linear_speed, 1.0);

        let top = reflect(&agent, &Contact::wall(Wall::Top)).unwrap();
        assert!((top.rotation + FRAC_PI_4).abs() < 1e-5);

        assert_eq!(reflect(&agent, &Contact::none()), None);
    }

    #[test]
    fn test_player_bounce_uses_impulse() {
        let agent = Agent::new(Pose::new(5.0, 3.0, 0.0), 1.0, 100.0, 0.05);
        let redirect = reflect(&agent, &Contact::player(1, (1.9, 2.5))).unwrap();
        assert_eq!(
            redirect,
            Redirect {
                linear_speed: 1.9,
                rotation: 2.5
            }
        );
    }

    #[test]
    fn test_reflecting_without_contact_keeps_heading() {
        let config = SimConfig::default();
        let mut ball = rolling_ball(0.6, 0.0);
        ball.friction_counter = 5;
        // Kicked last tick, already clear of the kicker
        ball.state = BallState::Reflecting {
            trigger: Contact::player(0, (1.2, PI)),
        };
        ball.update(&config);
        assert_eq!(ball.friction_counter, 6);
        assert_eq!(ball.agent.pose.rotation, 0.0);
        assert!(ball.agent.pose.position.x > 5.0);
    }

    #[test]
    fn test_reflecting_bounces_off_current_contact() {
        let config = SimConfig::default();
        let mut ball = rolling_ball(0.6, FRAC_PI_4);
        ball.state = BallState::Reflecting {
            trigger: Contact::player(0, (1.2, PI)),
        };
        ball.agent.contact = Contact::wall(Wall::Top);
        ball.update(&config);
        assert!((ball.agent.pose.rotation + FRAC_PI_4).abs() < 1e-5);
        assert_eq!(ball.friction_counter, 0);
    }

    #[test]
    fn test_friction_counter_saturates() {
        let config = SimConfig::default();
        let mut ball = rolling_ball(0.0, 0.0);
        ball.friction_counter = u32::MAX;
        ball.update(&config);
        assert_eq!(ball.friction_counter, u32::MAX);
    }
}
