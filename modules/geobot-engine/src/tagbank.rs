//! Tag allocation from a static word list.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use rand::Rng;

use geobot_core::error::{GameError, Result};

/// Resample bound before giving up on finding an unused word.
const MAX_DRAW_ATTEMPTS: u32 = 1000;

/// A fixed bank of candidate round tags, loaded once at startup.
#[derive(Debug, Clone)]
pub struct TagBank {
    words: Vec<String>,
}

impl TagBank {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    /// Load a word list from disk: one token per line, blank lines skipped.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read word list: {}", path.display()))?;
        let words = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Self::new(words))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Draw a uniformly random word not in `exclude`, resampling on
    /// collision up to the attempt bound.
    pub fn draw(&self, exclude: &BTreeSet<String>) -> Result<String> {
        if self.words.is_empty() {
            return Err(GameError::TagExhausted);
        }
        let mut rng = rand::rng();
        for _ in 0..MAX_DRAW_ATTEMPTS {
            let word = &self.words[rng.random_range(0..self.words.len())];
            if !exclude.contains(word) {
                return Ok(word.clone());
            }
        }
        Err(GameError::TagExhausted)
    }
}
