//! Collision detection and response
//!
//! Three tests run per agent per tick, in precedence order: field walls,
//! player-player overlap, and ball-player contact. Walls clamp the agent back
//! inside the field; overlaps only raise the bumper. Ball-player contacts also
//! precompute the ball's post-impulse velocity for the ball controller.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::agent::{Agent, Player};
use super::geometry::{direction, normalize_or_x};
use crate::cartesian_to_polar;
use crate::config::SimConfig;

/// Outgoing velocities shorter than this have no meaningful heading
const DEGENERATE_SPEED: f32 = 1.0e-6;

/// A field boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wall {
    Left,
    Right,
    Top,
    Bottom,
}

impl Wall {
    pub fn as_str(&self) -> &'static str {
        match self {
            Wall::Left => "left",
            Wall::Right => "right",
            Wall::Top => "top",
            Wall::Bottom => "bottom",
        }
    }

    /// Left/right walls mirror the x velocity, top/bottom the y velocity
    pub fn is_vertical_line(&self) -> bool {
        matches!(self, Wall::Left | Wall::Right)
    }
}

/// What an agent hit this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionTarget {
    Wall(Wall),
    /// Index into the match's player list
    Player(usize),
}

/// Per-tick collision report stored on each agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub bumper: bool,
    pub target: Option<CollisionTarget>,
    /// Ball-player contacts: post-impulse (speed, heading) for the ball.
    /// Zero for every other kind of contact.
    pub counterpart: (f32, f32),
}

impl Contact {
    pub fn none() -> Self {
        Self {
            bumper: false,
            target: None,
            counterpart: (0.0, 0.0),
        }
    }

    pub fn wall(wall: Wall) -> Self {
        Self {
            bumper: true,
            target: Some(CollisionTarget::Wall(wall)),
            counterpart: (0.0, 0.0),
        }
    }

    pub fn player(index: usize, counterpart: (f32, f32)) -> Self {
        Self {
            bumper: true,
            target: Some(CollisionTarget::Player(index)),
            counterpart,
        }
    }
}

impl Default for Contact {
    fn default() -> Self {
        Self::none()
    }
}

/// Clamp an agent back inside the field if its bounding box breaches a wall
///
/// Walls are tested left, right, top, bottom; only the first breach is
/// resolved and reported.
pub fn wall_collision(agent: &mut Agent, width: f32, height: f32) -> Option<Wall> {
    let r = agent.radius;
    let pos = &mut agent.pose.position;

    if pos.x - r <= 0.0 {
        pos.x = r;
        Some(Wall::Left)
    } else if pos.x + r >= width {
        pos.x = width - r;
        Some(Wall::Right)
    } else if pos.y - r <= 0.0 {
        pos.y = r;
        Some(Wall::Top)
    } else if pos.y + r >= height {
        pos.y = height - r;
        Some(Wall::Bottom)
    } else {
        None
    }
}

/// Player `index` overlapping any other player (last overlap wins)
pub fn player_player_collision(players: &[Player], index: usize) -> Option<usize> {
    let me = &players[index].agent;
    players
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .filter(|(_, other)| me.pose.distance(&other.agent.pose) <= me.radius + other.agent.radius)
        .map(|(i, _)| i)
        .last()
}

/// Full collision pass for one player
pub fn check_player(
    players: &mut [Player],
    index: usize,
    config: &SimConfig,
    shockable: bool,
) -> Contact {
    if let Some(wall) = wall_collision(
        &mut players[index].agent,
        config.field_width,
        config.field_height,
    ) {
        return Contact::wall(wall);
    }

    if !shockable {
        return Contact::none();
    }

    match player_player_collision(players, index) {
        Some(other) => {
            log::debug!("player {index} bumped player {other}");
            Contact::player(other, (0.0, 0.0))
        }
        None => Contact::none(),
    }
}

/// True if the ball and player are touching and closing on each other
///
/// The ball counts while it travels toward the player, so a ball leaving a
/// bounce is not caught again. A ball slower than `capture_speed` also counts
/// when the player drives into it.
pub fn ball_player_closing(ball: &Agent, player: &Agent, capture_speed: f32) -> bool {
    if ball.pose.distance(&player.pose) > ball.radius + player.radius {
        return false;
    }
    let dir = normalize_or_x(direction(ball.pose.position, player.pose.position));
    ball.velocity().dot(dir) < 0.0
        || (ball.linear_speed.abs() < capture_speed && player.velocity().dot(dir) > 0.0)
}

/// 1-D elastic collision along the line of centers
///
/// `dir` is the unit vector from the player toward the ball. Returns the
/// ball's new (speed, heading), scaled by the configured bounce factor.
pub fn elastic_impulse(
    ball_velocity: Vec2,
    player_velocity: Vec2,
    dir: Vec2,
    config: &SimConfig,
) -> (f32, f32) {
    let (mb, mp) = (config.ball_mass, config.player_mass);

    let u1 = ball_velocity.dot(dir);
    let u1_normal = ball_velocity - u1 * dir;
    let u2 = player_velocity.dot(dir);

    let v1 = ((mb - mp) * u1 + 2.0 * mb * u2) / (mb + mp);
    let v_final = u1_normal + v1 * dir;

    let scaled = config.bounce_factor * v_final;
    let (speed, mut heading) = cartesian_to_polar(scaled);
    // An approaching ball with no usable outgoing direction turns straight back
    if u1 < 0.0 && heading.abs() < 1.0e-2 && scaled.length() < DEGENERATE_SPEED {
        heading = PI;
    }
    (speed, heading)
}

/// Post-collision ball velocity against `player`
///
/// A ball slower than the capture speed first takes the player's speed.
pub fn ball_bounce(ball: &mut Agent, player: &Agent, config: &SimConfig) -> (f32, f32) {
    if ball.linear_speed < config.capture_speed {
        ball.linear_speed = player.linear_speed;
    }
    let dir = normalize_or_x(direction(ball.pose.position, player.pose.position));
    elastic_impulse(ball.velocity(), player.velocity(), dir, config)
}

/// Full collision pass for the ball
pub fn check_ball(ball: &mut Agent, players: &[Player], config: &SimConfig) -> Contact {
    if let Some(wall) = wall_collision(ball, config.field_width, config.field_height) {
        log::debug!("ball hit {} wall", wall.as_str());
        return Contact::wall(wall);
    }

    let hit = players
        .iter()
        .enumerate()
        .filter(|(_, p)| ball_player_closing(&*ball, &p.agent, config.capture_speed))
        .map(|(i, _)| i)
        .last();

    match hit {
        Some(index) => {
            let counterpart = ball_bounce(ball, &players[index].agent, config);
            log::debug!(
                "ball hit player {index}: speed {:.3} heading {:.3}",
                counterpart.0,
                counterpart.1
            );
            Contact::player(index, counterpart)
        }
        None => Contact::none(),
    }
}
