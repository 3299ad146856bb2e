//! Errors raised at the match boundary
//!
//! Numerical edge cases inside the physics are handled by policy and never
//! surface here; only caller contract violations do.

/// Match construction and command errors
#[derive(thiserror::Error, Debug)]
pub enum SimError {
    #[error("expected {expected} commands (one per player), got {got}")]
    CommandCountMismatch { expected: usize, got: usize },

    #[error("player index {index} out of range ({count} players)")]
    UnknownPlayer { index: usize, count: usize },

    #[error("a match needs at least one player")]
    NoPlayers,

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config parse failed: {0}")]
    Config(#[from] serde_json::Error),
}
