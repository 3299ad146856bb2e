//! Goal detection and the match scoreboard
//!
//! A goal mouth is a rectangle flush with each short end of the field,
//! vertically centered. The ball scores once its whole extent is past the goal
//! line and inside the mouth's vertical span. Detections are debounced by a
//! wall-clock cooldown since the previous goal (or since kickoff).

use serde::{Deserialize, Serialize};

use super::agent::Agent;
use crate::config::SimConfig;

/// End of the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// Which goal mouth, if any, fully contains the ball
pub fn goal_side(ball: &Agent, config: &SimConfig) -> Option<Side> {
    let p = ball.pose.position;
    let r = ball.radius;

    let mid = config.field_height / 2.0;
    let in_mouth =
        p.y - r >= mid - config.goal_half_height && p.y + r <= mid + config.goal_half_height;
    if !in_mouth {
        return None;
    }

    if p.x - r >= config.field_width - config.goal_depth {
        Some(Side::Right)
    } else if p.x + r <= config.goal_depth {
        Some(Side::Left)
    } else {
        None
    }
}

/// Goal counters plus cooldown bookkeeping (times in clock seconds)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scoreboard {
    pub left_goal: u32,
    pub right_goal: u32,
    /// Cooldown origin: kickoff, then each counted goal
    cooldown_from: f64,
    last_goal_at: Option<f64>,
}

impl Scoreboard {
    pub fn new(kickoff: f64) -> Self {
        Self {
            left_goal: 0,
            right_goal: 0,
            cooldown_from: kickoff,
            last_goal_at: None,
        }
    }

    /// (left, right)
    pub fn score(&self) -> (u32, u32) {
        (self.left_goal, self.right_goal)
    }

    pub fn last_goal_at(&self) -> Option<f64> {
        self.last_goal_at
    }

    /// Count a goal for `side` unless still inside the cooldown window
    pub fn try_score(&mut self, side: Side, now: f64, cooldown_secs: f64) -> bool {
        if now - self.cooldown_from <= cooldown_secs {
            return false;
        }
        match side {
            Side::Left => self.left_goal += 1,
            Side::Right => self.right_goal += 1,
        }
        self.cooldown_from = now;
        self.last_goal_at = Some(now);
        log::info!(
            "GOAL {:?}! score {} - {}",
            side,
            self.left_goal,
            self.right_goal
        );
        true
    }

    /// Whether agents should still be held at kickoff after the last goal
    pub fn holding_restart(&self, now: f64, hold_secs: f64) -> bool {
        self.last_goal_at.is_some_and(|at| now - at < hold_secs)
    }
}
