//! Core types for the geo guessing game.
//!
//! Entity model (rounds, guesses, message locators), the haversine
//! distance/scoring functions, the closed error taxonomy, and env-backed
//! configuration. Everything stateful lives in `geobot-engine`; this crate
//! is pure data and pure functions.

pub mod config;
pub mod error;
pub mod geo;
pub mod types;

pub use config::AppConfig;
pub use error::{GameError, Result};
pub use geo::{guess_score, haversine_distance_meters, WORLD_MAXDIST_METERS};
pub use types::{Coordinate, Guess, ImageGame, MessageRef, SurfaceId, UserId};
