//! Collaborator seams between the engine and its adapter.
//!
//! The engine owns game state; everything that touches the outside world —
//! stored image bytes, outward chat messages, the durable state record —
//! goes through one of these traits so tests can substitute in-memory
//! doubles and the chat adapter can plug in its platform client.

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use geobot_core::types::{MessageRef, SurfaceId};

use crate::persist::Snapshot;

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Durable store for the full engine state.
///
/// Implemented by `JsonStateStore` (single file on disk) and
/// `MemoryStateStore` (tests). Every mutating engine operation rewrites the
/// whole snapshot; re-saving identical state is always safe.
pub trait StateStore: Send + Sync {
    /// Load the saved snapshot. `Ok(None)` means no state has ever been
    /// saved — first boot, not an error.
    fn load(&self) -> Result<Option<Snapshot>>;

    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Image bytes
// ---------------------------------------------------------------------------

/// Stored image bytes, keyed by filename.
///
/// Bytes live only while the round is active; the engine deletes them on
/// close and keeps the round metadata.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<()>;

    async fn delete(&self, filename: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Outward messaging
// ---------------------------------------------------------------------------

/// An image attached to an outward post.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Bytes,
}

/// Outward chat messaging, implemented by the platform adapter.
///
/// Content strings are produced by the adapter; the engine passes them
/// through and never renders user-facing text itself.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Post `content` to each surface in order. Returns one locator per
    /// surface, in the same order.
    async fn post_to_surfaces(
        &self,
        surfaces: &[SurfaceId],
        content: &str,
        attachment: Option<&Attachment>,
    ) -> Result<Vec<MessageRef>>;

    async fn edit_message(&self, target: &MessageRef, content: &str) -> Result<()>;

    async fn reply_to_message(&self, target: &MessageRef, content: &str) -> Result<()>;
}
