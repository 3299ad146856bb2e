//! Simulation module
//!
//! All match logic lives here. It must stay headless and stepped:
//! - Fixed timestep only
//! - Stable iteration order (players by index, ball last)
//! - Wall-clock time only through the injected `Clock`
//! - No rendering or platform dependencies

pub mod agent;
pub mod ball;
pub mod collision;
pub mod geometry;
pub mod score;
pub mod sensor;
pub mod state;
pub mod tick;

pub use agent::{Agent, Player, integrate};
pub use ball::{Ball, BallState, Redirect};
pub use collision::{CollisionTarget, Contact, Wall, elastic_impulse};
pub use geometry::{Pose, direction, normalize_or_x};
pub use score::{Scoreboard, Side, goal_side};
pub use sensor::{NOT_SENSED, Sensor, is_sensed};
pub use state::{AgentView, Match, MatchBuilder, MatchSnapshot, PlayerSpec};
pub use tick::tick;
