//! The round registry — active and closed rounds, nothing else.
//!
//! Pure state: no I/O, no scoring (scoring needs the map scale, which the
//! engine owns). A round moves from active to closed exactly once and is
//! never copied; closed rounds may coincidentally repeat tag values.

use std::collections::BTreeMap;

use geobot_core::error::{GameError, Result};
use geobot_core::types::{Guess, ImageGame, UserId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundRegistry {
    active: BTreeMap<String, ImageGame>,
    closed: Vec<ImageGame>,
}

impl RoundRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(active: BTreeMap<String, ImageGame>, closed: Vec<ImageGame>) -> Self {
        Self { active, closed }
    }

    /// Insert a newly opened round into the active set.
    pub fn open(&mut self, round: ImageGame) -> Result<()> {
        if self.active.contains_key(&round.tag) {
            return Err(GameError::DuplicateTag(round.tag));
        }
        self.active.insert(round.tag.clone(), round);
        Ok(())
    }

    /// Record a guess against an active round, replacing any earlier guess
    /// by the same participant. Returns the stored guess for confirmation.
    pub fn submit_guess(&mut self, tag: &str, user: UserId, guess: Guess) -> Result<Guess> {
        let round = match self.active.get_mut(tag) {
            Some(round) => round,
            None => return Err(self.unknown_tag(tag)),
        };
        round.guesses.insert(user, guess);
        Ok(guess)
    }

    /// Move a round from the active set to the closed history and return it
    /// with its final, frozen guess map.
    pub fn close(&mut self, tag: &str) -> Result<ImageGame> {
        let round = match self.active.remove(tag) {
            Some(round) => round,
            None => return Err(self.unknown_tag(tag)),
        };
        self.closed.push(round.clone());
        Ok(round)
    }

    pub fn is_active(&self, tag: &str) -> bool {
        self.active.contains_key(tag)
    }

    /// Sorted snapshot of the currently active tags.
    pub fn active_tags(&self) -> Vec<String> {
        self.active.keys().cloned().collect()
    }

    pub fn get(&self, tag: &str) -> Option<&ImageGame> {
        self.active.get(tag)
    }

    pub fn active(&self) -> &BTreeMap<String, ImageGame> {
        &self.active
    }

    pub fn closed(&self) -> &[ImageGame] {
        &self.closed
    }

    pub(crate) fn into_parts(self) -> (BTreeMap<String, ImageGame>, Vec<ImageGame>) {
        (self.active, self.closed)
    }

    fn unknown_tag(&self, tag: &str) -> GameError {
        GameError::UnknownTag {
            tag: tag.to_string(),
            active_tags: self.active_tags(),
        }
    }
}
