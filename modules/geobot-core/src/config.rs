use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::types::SurfaceId;

/// Surface that receives admin privileges when no saved state exists.
const DEFAULT_OWNER_SURFACE: SurfaceId = 1373110407249657958;

/// Application configuration loaded from environment variables.
///
/// Everything is optional with sensible defaults; a bare process gets a
/// `data/` directory next to the working directory and the built-in owner
/// surface.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Root data directory (`DATA_DIR`, default `data`). Holds the state
    /// file, stored images, and the default word list.
    pub data_dir: PathBuf,
    /// Seed admin surface for fresh state (`GEOBOT_OWNER_SURFACE`).
    pub owner_surface: SurfaceId,
    /// Tag word list, one token per line (`GEOBOT_WORDS_FILE`,
    /// default `<data_dir>/WORDS.txt`).
    pub words_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let data_dir =
            PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));

        let owner_surface = match std::env::var("GEOBOT_OWNER_SURFACE") {
            Ok(raw) => raw
                .parse()
                .context("GEOBOT_OWNER_SURFACE must be a numeric surface id")?,
            Err(_) => DEFAULT_OWNER_SURFACE,
        };

        let words_file = std::env::var("GEOBOT_WORDS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("WORDS.txt"));

        let config = Self {
            data_dir,
            owner_surface,
            words_file,
        };

        info!(
            data_dir = %config.data_dir.display(),
            words_file = %config.words_file.display(),
            owner_surface = config.owner_surface,
            "Config loaded"
        );
        Ok(config)
    }

    /// Path of the persisted game state file.
    pub fn state_file(&self) -> PathBuf {
        self.data_dir.join("data.json")
    }

    /// Directory holding stored image bytes for active rounds.
    pub fn images_dir(&self) -> PathBuf {
        self.data_dir.join("images")
    }
}
