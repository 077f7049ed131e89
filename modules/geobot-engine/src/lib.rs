//! Game-state engine for the geo guessing game.
//!
//! The engine is the single in-process authority over subscriptions, rounds,
//! guesses, and scores. It persists the full state after every mutation and
//! reloads it at construction, so a restart picks up exactly where the last
//! successful save left off.
//!
//! The chat platform sits behind the collaborator traits in [`traits`]:
//! the engine never talks to a network and never renders user-facing text.

pub mod engine;
pub mod images;
pub mod persist;
pub mod registry;
pub mod tagbank;
pub mod traits;

pub use engine::{GameEngine, GameState, GuessResult, NewImage};
pub use images::{DirImageStore, MemoryImageStore};
pub use persist::{JsonStateStore, MemoryStateStore, Snapshot};
pub use registry::RoundRegistry;
pub use tagbank::TagBank;
pub use traits::{Attachment, ImageStore, Messenger, StateStore};
