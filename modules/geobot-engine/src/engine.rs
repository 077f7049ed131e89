//! The game engine facade.
//!
//! One engine instance is the single authority over game state. Every
//! operation is a read-modify-write-persist unit: the mutation and the save
//! succeed together or the in-memory state rolls back. `&mut self` enforces
//! the single-writer model in-process; callers dispatching from concurrent
//! contexts must serialize operations behind one lock or actor.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use geobot_core::config::AppConfig;
use geobot_core::error::{GameError, Result};
use geobot_core::geo::{guess_score, haversine_distance_meters, WORLD_MAXDIST_METERS};
use geobot_core::types::{Coordinate, Guess, ImageGame, MessageRef, SurfaceId, UserId};

use crate::images::DirImageStore;
use crate::persist::{JsonStateStore, Snapshot};
use crate::registry::RoundRegistry;
use crate::tagbank::TagBank;
use crate::traits::{ImageStore, Messenger, StateStore};

// ---------------------------------------------------------------------------
// GameState — the root aggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub subscribed: BTreeSet<SurfaceId>,
    pub admins: BTreeSet<SurfaceId>,
    pub rounds: RoundRegistry,
    pub scores: BTreeMap<UserId, i64>,
    pub maxdist: f64,
}

impl GameState {
    /// Fresh state for a first boot: no subscribers, the owner surface as
    /// the sole admin, world-scale scoring.
    fn fresh(owner: SurfaceId) -> Self {
        Self {
            subscribed: BTreeSet::new(),
            admins: BTreeSet::from([owner]),
            rounds: RoundRegistry::new(),
            scores: BTreeMap::new(),
            maxdist: WORLD_MAXDIST_METERS,
        }
    }

    fn snapshot(&self) -> Snapshot {
        let rounds = self.rounds.clone();
        let (images, closed_images) = rounds.into_parts();
        Snapshot {
            subscribed: self.subscribed.clone(),
            admins: self.admins.clone(),
            images,
            closed_images,
            scores: self.scores.clone(),
            maxdist: self.maxdist,
        }
    }

    fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            subscribed: snapshot.subscribed,
            admins: snapshot.admins,
            rounds: RoundRegistry::from_parts(snapshot.images, snapshot.closed_images),
            scores: snapshot.scores,
            maxdist: snapshot.maxdist,
        }
    }
}

// ---------------------------------------------------------------------------
// Operation inputs and outputs
// ---------------------------------------------------------------------------

/// An uploaded image ready to become a round.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub bytes: Bytes,
    /// File extension without the dot, e.g. `png`.
    pub extension: String,
}

/// Per-participant outcome of a closed round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuessResult {
    pub distance_meters: f64,
    pub score: i64,
}

// ---------------------------------------------------------------------------
// GameEngine
// ---------------------------------------------------------------------------

pub struct GameEngine {
    state: GameState,
    tags: TagBank,
    store: Arc<dyn StateStore>,
    images: Arc<dyn ImageStore>,
    messenger: Arc<dyn Messenger>,
}

impl GameEngine {
    /// Construct the engine, loading saved state from `store`. A store with
    /// no snapshot yields fresh state with `owner` as the seed admin.
    pub fn new(
        tags: TagBank,
        store: Arc<dyn StateStore>,
        images: Arc<dyn ImageStore>,
        messenger: Arc<dyn Messenger>,
        owner: SurfaceId,
    ) -> Result<Self> {
        let state = match store.load()? {
            Some(snapshot) => GameState::from_snapshot(snapshot),
            None => GameState::fresh(owner),
        };
        Ok(Self {
            state,
            tags,
            store,
            images,
            messenger,
        })
    }

    /// Wire up the production collaborators from config: JSON file state,
    /// directory image store, word list from disk.
    pub fn from_config(config: &AppConfig, messenger: Arc<dyn Messenger>) -> Result<Self> {
        let tags = TagBank::from_file(&config.words_file)?;
        let store = Arc::new(JsonStateStore::new(config.state_file()));
        let images = Arc::new(DirImageStore::new(config.images_dir()));
        Self::new(tags, store, images, messenger, config.owner_surface)
    }

    /// Run a state mutation and persist the result. If the mutation or the
    /// save fails, the previous state is restored and the error propagates —
    /// an unpersisted change never survives in memory.
    fn commit<T>(&mut self, op: impl FnOnce(&mut GameState) -> Result<T>) -> Result<T> {
        let before = self.state.clone();
        let result = op(&mut self.state)
            .and_then(|value| {
                self.store.save(&self.state.snapshot())?;
                Ok(value)
            });
        if result.is_err() {
            self.state = before;
        }
        result
    }

    // -- subscriptions ------------------------------------------------------

    /// Add a surface to the announcement list. Returns whether membership
    /// changed; re-subscribing is a persisted no-op, not an error.
    pub fn subscribe(&mut self, surface: SurfaceId) -> Result<bool> {
        let added = self.commit(|state| Ok(state.subscribed.insert(surface)))?;
        if added {
            info!(surface, "Surface subscribed");
        }
        Ok(added)
    }

    /// Remove a surface from the announcement list. Returns whether it was
    /// a member; the adapter decides how to word "already unsubscribed".
    pub fn unsubscribe(&mut self, surface: SurfaceId) -> Result<bool> {
        let removed = self.commit(|state| Ok(state.subscribed.remove(&surface)))?;
        if removed {
            info!(surface, "Surface unsubscribed");
        }
        Ok(removed)
    }

    // -- rounds -------------------------------------------------------------

    /// Open a new round. An explicit `tag` is validated against the active
    /// set; with `None` the bank draws one. Image bytes are stored as
    /// `<tag>.<extension>` before the round enters the registry.
    pub async fn open_round(
        &mut self,
        location: Coordinate,
        image: NewImage,
        image_messages: Vec<MessageRef>,
        guesshint_messages: Vec<MessageRef>,
        tag: Option<String>,
    ) -> Result<String> {
        let tag = match tag {
            Some(tag) if self.state.rounds.is_active(&tag) => {
                return Err(GameError::DuplicateTag(tag))
            }
            Some(tag) => tag,
            None => {
                let taken: BTreeSet<String> = self.state.rounds.active_tags().into_iter().collect();
                self.tags.draw(&taken)?
            }
        };

        let filename = format!("{tag}.{}", image.extension);
        self.images.save(&filename, &image.bytes).await?;

        let round = ImageGame::new(
            location,
            tag.clone(),
            filename,
            image_messages,
            guesshint_messages,
        );
        self.commit(|state| state.rounds.open(round))?;

        info!(%tag, "Round opened");
        Ok(tag)
    }

    /// Record a guess against an active round, replacing any earlier guess
    /// by the same participant. Returns the stored guess for confirmation.
    pub fn submit_guess(
        &mut self,
        tag: &str,
        user: UserId,
        location: Coordinate,
        message: MessageRef,
    ) -> Result<Guess> {
        let guess = Guess::new(location, message);
        self.commit(|state| state.rounds.submit_guess(tag, user, guess))
    }

    /// Close a round: freeze its guesses, score each one against the ground
    /// truth, fold the scores into the running totals, and persist — all
    /// before any collaborator I/O. The stored image bytes are then deleted;
    /// a deletion failure is logged and does not unwind the close.
    pub async fn close_round(
        &mut self,
        tag: &str,
    ) -> Result<(ImageGame, BTreeMap<UserId, GuessResult>)> {
        let (round, results) = self.commit(|state| {
            let round = state.rounds.close(tag)?;
            let mut results = BTreeMap::new();
            for (user, guess) in &round.guesses {
                let distance_meters =
                    haversine_distance_meters(guess.location(), round.location());
                let score = guess_score(distance_meters, state.maxdist);
                *state.scores.entry(*user).or_insert(0) += score;
                results.insert(
                    *user,
                    GuessResult {
                        distance_meters,
                        score,
                    },
                );
            }
            Ok((round, results))
        })?;

        if let Err(e) = self.images.delete(&round.filename).await {
            warn!(tag, error = %e, "Failed to delete image bytes for closed round");
        }

        info!(tag, guesses = round.guesses.len(), "Round closed");
        Ok((round, results))
    }

    /// Post-close notification phase: flip every guess prompt to the
    /// adapter's closed wording and reply to every announcement with the
    /// results text. The close is already persisted; messaging failures are
    /// logged and never unwind it.
    pub async fn announce_close(
        &self,
        round: &ImageGame,
        prompt_content: &str,
        results_content: &str,
    ) {
        for target in &round.guesshint_messages {
            if let Err(e) = self.messenger.edit_message(target, prompt_content).await {
                warn!(
                    tag = %round.tag,
                    channel = target.channel,
                    error = %e,
                    "Failed to edit guess prompt for closed round"
                );
            }
        }
        for target in &round.image_messages {
            if let Err(e) = self.messenger.reply_to_message(target, results_content).await {
                warn!(
                    tag = %round.tag,
                    channel = target.channel,
                    error = %e,
                    "Failed to post round results"
                );
            }
        }
    }

    // -- scores and scale ---------------------------------------------------

    /// Clear the running score totals. Rounds, active and closed, stay put.
    pub fn reset_scores(&mut self) -> Result<()> {
        self.commit(|state| {
            state.scores.clear();
            Ok(())
        })?;
        info!("Scores reset");
        Ok(())
    }

    /// Set the scoring distance normalizer. `None` resets to the world
    /// constant; non-positive or non-finite values fail `InvalidScale`
    /// without touching state.
    pub fn set_map_scale(&mut self, maxdist: Option<f64>) -> Result<()> {
        let value = maxdist.unwrap_or(WORLD_MAXDIST_METERS);
        if !value.is_finite() || value <= 0.0 {
            return Err(GameError::InvalidScale(value));
        }
        self.commit(|state| {
            state.maxdist = value;
            Ok(())
        })?;
        info!(maxdist = value, "Map scale set");
        Ok(())
    }

    // -- read-only accessors ------------------------------------------------

    pub fn subscribed(&self) -> &BTreeSet<SurfaceId> {
        &self.state.subscribed
    }

    pub fn admins(&self) -> &BTreeSet<SurfaceId> {
        &self.state.admins
    }

    pub fn is_subscribed(&self, surface: SurfaceId) -> bool {
        self.state.subscribed.contains(&surface)
    }

    pub fn is_admin(&self, surface: SurfaceId) -> bool {
        self.state.admins.contains(&surface)
    }

    pub fn rounds(&self) -> &RoundRegistry {
        &self.state.rounds
    }

    pub fn active_tags(&self) -> Vec<String> {
        self.state.rounds.active_tags()
    }

    pub fn scores(&self) -> &BTreeMap<UserId, i64> {
        &self.state.scores
    }

    pub fn map_scale(&self) -> f64 {
        self.state.maxdist
    }

    /// The state exactly as it would be persisted right now.
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }
}
