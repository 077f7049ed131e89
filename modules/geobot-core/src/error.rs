//! Typed errors for game operations.
//!
//! A closed taxonomy the adapter matches exhaustively to pick its reply
//! wording. The engine never renders user-facing text; these messages are
//! for logs.

use thiserror::Error;

/// Result type alias for game operations.
pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Debug, Error)]
pub enum GameError {
    /// An explicitly supplied tag collides with a currently active round.
    #[error("tag `{0}` already names an active image")]
    DuplicateTag(String),

    /// The tag bank found no unused word within the attempt bound.
    #[error("no unused tag available in the word bank")]
    TagExhausted,

    /// The referenced tag names no active round — closed and never-existed
    /// look identical to the caller; `active_tags` is the only signal.
    #[error("`{tag}` is not the tag of an active image")]
    UnknownTag {
        tag: String,
        active_tags: Vec<String>,
    },

    /// A non-positive or non-finite map scale was requested.
    #[error("map scale must be a positive finite number, got {0}")]
    InvalidScale(f64),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
