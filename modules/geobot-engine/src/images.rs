//! ImageStore implementations.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::traits::ImageStore;

// ---------------------------------------------------------------------------
// DirImageStore (production — files under the data directory)
// ---------------------------------------------------------------------------

/// Stores each image as a file in one flat directory.
pub struct DirImageStore {
    dir: PathBuf,
}

impl DirImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ImageStore for DirImageStore {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create images dir: {}", self.dir.display()))?;
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write image: {}", path.display()))?;
        Ok(())
    }

    async fn delete(&self, filename: &str) -> Result<()> {
        let path = self.dir.join(filename);
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to delete image: {}", path.display()))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryImageStore (tests)
// ---------------------------------------------------------------------------

/// In-memory image store for testing. Thread-safe.
#[derive(Default)]
pub struct MemoryImageStore {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filenames currently held (for test assertions).
    pub fn filenames(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(filename.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn delete(&self, filename: &str) -> Result<()> {
        self.files
            .lock()
            .unwrap()
            .remove(filename)
            .with_context(|| format!("No stored image named {filename}"))?;
        Ok(())
    }
}
