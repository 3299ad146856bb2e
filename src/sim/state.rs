//! Match state and its boundary API
//!
//! A `Match` owns every agent, the scoreboard and the kickoff poses. External
//! controllers push velocity commands in, call `tick`, and read poses, bumpers,
//! sensor readings and the score back out.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::agent::Player;
use super::ball::Ball;
use super::collision::CollisionTarget;
use super::geometry::Pose;
use super::score::Scoreboard;
use crate::clock::{Clock, MonotonicClock};
use crate::config::SimConfig;
use crate::consts::PLAYER_RADIUS;
use crate::error::SimError;

/// Construction parameters for one player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub pose: Pose,
    pub max_linear_speed: f32,
    pub max_angular_speed: f32,
    pub radius: f32,
}

/// Builds a `Match`; options are fixed for the match's lifetime
#[derive(Debug, Clone)]
pub struct MatchBuilder<C = MonotonicClock> {
    config: SimConfig,
    players: Vec<PlayerSpec>,
    ball_pose: Option<Pose>,
    shockable: bool,
    full_vision: bool,
    clock: C,
}

impl MatchBuilder<MonotonicClock> {
    pub fn new() -> Self {
        Self {
            config: SimConfig::default(),
            players: Vec::new(),
            ball_pose: None,
            shockable: true,
            full_vision: false,
            clock: MonotonicClock::new(),
        }
    }
}

impl Default for MatchBuilder<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MatchBuilder<C> {
    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    pub fn player(
        mut self,
        pose: Pose,
        max_linear_speed: f32,
        max_angular_speed: f32,
        radius: f32,
    ) -> Self {
        self.players.push(PlayerSpec {
            pose,
            max_linear_speed,
            max_angular_speed,
            radius,
        });
        self
    }

    /// Ball kickoff pose (defaults to a quarter of the way across, mid height)
    pub fn ball_pose(mut self, pose: Pose) -> Self {
        self.ball_pose = Some(pose);
        self
    }

    /// Enable player-player collision detection
    pub fn shockable(mut self, shockable: bool) -> Self {
        self.shockable = shockable;
        self
    }

    /// Bypass the sensor cone test for every player
    pub fn full_vision(mut self, full_vision: bool) -> Self {
        self.full_vision = full_vision;
        self
    }

    pub fn clock<D: Clock>(self, clock: D) -> MatchBuilder<D> {
        MatchBuilder {
            config: self.config,
            players: self.players,
            ball_pose: self.ball_pose,
            shockable: self.shockable,
            full_vision: self.full_vision,
            clock,
        }
    }

    /// Two players facing each other across the ball's half
    pub fn demo_layout(self) -> Self {
        let (w, h) = (self.config.field_width, self.config.field_height);
        self.player(Pose::new(w / 3.0, h / 2.0, 0.0), 1.0, 2.0, PLAYER_RADIUS)
            .player(
                Pose::new(2.0 * w / 3.0, h / 2.0, std::f32::consts::PI),
                1.0,
                2.0,
                PLAYER_RADIUS,
            )
    }

    pub fn build(self) -> Result<Match<C>, SimError> {
        self.config.validate()?;
        if self.players.is_empty() {
            return Err(SimError::NoPlayers);
        }
        if let Some((i, spec)) = self
            .players
            .iter()
            .enumerate()
            .find(|(_, s)| !(s.radius.is_finite() && s.radius > 0.0))
        {
            return Err(SimError::InvalidConfig(format!(
                "player {i} radius must be positive, got {}",
                spec.radius
            )));
        }

        let config = self.config;
        let ball_pose = self.ball_pose.unwrap_or_else(|| {
            Pose::new(config.field_width / 4.0, config.field_height / 2.0, 0.0)
        });
        let ball = Ball::from_config(ball_pose, &config);

        let players: Vec<Player> = self
            .players
            .iter()
            .map(|s| {
                let mut player = Player::new(
                    s.pose,
                    s.max_linear_speed,
                    s.max_angular_speed,
                    s.radius,
                    &config,
                );
                player.sensor.set_full_vision(self.full_vision);
                player
            })
            .collect();

        let mut initial_poses = Vec::with_capacity(players.len() + 1);
        initial_poses.push(ball.agent.pose);
        initial_poses.extend(players.iter().map(|p| p.agent.pose));

        let kickoff = self.clock.now_secs();
        log::info!(
            "Match ready: {} players, shockable={}, full_vision={}",
            players.len(),
            self.shockable,
            self.full_vision
        );

        Ok(Match {
            config,
            players,
            ball,
            scoreboard: Scoreboard::new(kickoff),
            initial_poses,
            shockable: self.shockable,
            clock: self.clock,
            ticks: 0,
        })
    }
}

/// What a renderer needs to draw one agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    pub pose: Pose,
    pub radius: f32,
    pub linear_speed: f32,
    pub angular_speed: f32,
    pub bumper: bool,
    pub target: Option<CollisionTarget>,
}

/// Serializable picture of the whole match after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub ticks: u64,
    pub left_goal: u32,
    pub right_goal: u32,
    pub ball: AgentView,
    pub players: Vec<AgentView>,
}

impl MatchSnapshot {
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A running match
#[derive(Debug)]
pub struct Match<C = MonotonicClock> {
    pub(crate) config: SimConfig,
    pub(crate) players: Vec<Player>,
    pub(crate) ball: Ball,
    pub(crate) scoreboard: Scoreboard,
    /// Kickoff poses: ball first, then players in order
    pub(crate) initial_poses: Vec<Pose>,
    pub(crate) shockable: bool,
    pub(crate) clock: C,
    pub(crate) ticks: u64,
}

impl<C: Clock> Match<C> {
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, index: usize) -> Result<&Player, SimError> {
        self.players.get(index).ok_or(SimError::UnknownPlayer {
            index,
            count: self.players.len(),
        })
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// (left, right) goal counts
    pub fn score(&self) -> (u32, u32) {
        self.scoreboard.score()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn shockable(&self) -> bool {
        self.shockable
    }

    pub fn initial_poses(&self) -> &[Pose] {
        &self.initial_poses
    }

    /// One (linear, angular) command per player, applied before the next tick
    pub fn set_commands(&mut self, commands: &[(f32, f32)]) -> Result<(), SimError> {
        if commands.len() != self.players.len() {
            return Err(SimError::CommandCountMismatch {
                expected: self.players.len(),
                got: commands.len(),
            });
        }
        for (player, &(linear, angular)) in self.players.iter_mut().zip(commands) {
            player.set_velocity(linear, angular);
        }
        Ok(())
    }

    pub fn set_command(&mut self, index: usize, linear: f32, angular: f32) -> Result<(), SimError> {
        let count = self.players.len();
        let player = self
            .players
            .get_mut(index)
            .ok_or(SimError::UnknownPlayer { index, count })?;
        player.set_velocity(linear, angular);
        Ok(())
    }

    /// Sensor readings per player: landmarks, then the ball, then the other
    /// players in index order
    pub fn get_sensors(&self) -> Vec<Vec<Vec2>> {
        self.players
            .iter()
            .enumerate()
            .map(|(i, player)| {
                let others: Vec<Vec2> = std::iter::once(self.ball.agent.pose.position)
                    .chain(
                        self.players
                            .iter()
                            .enumerate()
                            .filter(|(j, _)| *j != i)
                            .map(|(_, p)| p.agent.pose.position),
                    )
                    .collect();
                player.sensor.calculate_distance(&player.agent.pose, &others)
            })
            .collect()
    }

    /// Ball first, then players in order
    pub fn agent_views(&self) -> Vec<AgentView> {
        std::iter::once(&self.ball.agent)
            .chain(self.players.iter().map(|p| &p.agent))
            .map(|a| AgentView {
                pose: a.pose,
                radius: a.radius,
                linear_speed: a.linear_speed,
                angular_speed: a.angular_speed,
                bumper: a.contact.bumper,
                target: a.contact.target,
            })
            .collect()
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        let mut views = self.agent_views();
        let ball = views.remove(0);
        MatchSnapshot {
            ticks: self.ticks,
            left_goal: self.scoreboard.left_goal,
            right_goal: self.scoreboard.right_goal,
            ball,
            players: views,
        }
    }

    /// Drop the ball at `pose` rolling at `linear_speed` (set pieces, drills)
    pub fn place_ball(&mut self, pose: Pose, linear_speed: f32) {
        self.ball.agent.pose = pose;
        self.ball.agent.set_velocity(linear_speed, 0.0);
    }

    /// Put every agent back on its kickoff pose and stop it
    pub fn restart(&mut self) {
        self.ball.agent.pose = self.initial_poses[0];
        self.ball.agent.linear_speed = 0.0;
        for (player, pose) in self.players.iter_mut().zip(&self.initial_poses[1..]) {
            player.agent.pose = *pose;
            player.agent.linear_speed = 0.0;
        }
    }

    pub(crate) fn now(&self) -> f64 {
        self.clock.now_secs()
    }
}
