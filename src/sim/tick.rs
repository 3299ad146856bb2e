//! Fixed timestep simulation tick
//!
//! One call advances the whole match by exactly one `dt`:
//! players (collide, then move), the ball (collide, then controller step),
//! then the goal check. Goals are only ever detected on post-move positions.

use super::collision::{check_ball, check_player};
use super::score::{Side, goal_side};
use super::state::Match;
use crate::clock::Clock;

/// Advance the match by one fixed timestep
pub fn tick<C: Clock>(game: &mut Match<C>) {
    game.ticks += 1;
    let dt = game.config.dt;

    for i in 0..game.players.len() {
        let contact = check_player(&mut game.players, i, &game.config, game.shockable);
        let player = &mut game.players[i];
        player.agent.contact = contact;
        player.update(dt);
    }

    let contact = check_ball(&mut game.ball.agent, &game.players, &game.config);
    game.ball.agent.contact = contact;
    game.ball.update(&game.config);

    check_goal(game);
}

/// Count a goal if the ball is in a mouth and the cooldown has passed, and
/// hold everyone at kickoff for a moment afterwards
fn check_goal<C: Clock>(game: &mut Match<C>) -> Option<Side> {
    let now = game.now();

    let mut scored = None;
    if let Some(side) = goal_side(&game.ball.agent, &game.config) {
        if game
            .scoreboard
            .try_score(side, now, game.config.goal_cooldown_secs)
        {
            scored = Some(side);
        }
    }

    if scored.is_some()
        || game
            .scoreboard
            .holding_restart(now, game.config.restart_hold_secs)
    {
        if scored.is_some() {
            log::info!("Restarting from kickoff after tick {}", game.ticks);
        }
        game.restart();
    }
    scored
}

impl<C: Clock> Match<C> {
    /// Advance by one fixed timestep
    pub fn tick(&mut self) {
        tick(self);
    }

    /// Same as `tick`
    pub fn update(&mut self) {
        tick(self);
    }
}
