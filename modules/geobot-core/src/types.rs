use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Chat surface (channel-like target) identifier.
pub type SurfaceId = u64;

/// Participant identifier, used as the scoring key.
pub type UserId = u64;

// ---------------------------------------------------------------------------
// Geo
// ---------------------------------------------------------------------------

/// A lat/lng pair in floating-point degrees.
///
/// Values are carried as-is: nothing here normalizes longitudes or rejects
/// out-of-range latitudes. Garbage in, garbage distance out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

// ---------------------------------------------------------------------------
// Message locators
// ---------------------------------------------------------------------------

/// The information needed to uniquely locate a previously sent chat message.
///
/// Opaque round-trip data: the engine stores these so the adapter can later
/// edit or reply to its own posts. The engine never interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    pub channel: SurfaceId,
    pub message: u64,
}

impl MessageRef {
    pub fn new(channel: SurfaceId, message: u64) -> Self {
        Self { channel, message }
    }
}

// ---------------------------------------------------------------------------
// Guesses and rounds
// ---------------------------------------------------------------------------

/// A participant's guess for one round. Last write wins; no history kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guess {
    pub latitude: f64,
    pub longitude: f64,
    /// The message the guess was submitted through, for confirmation replies.
    pub message: MessageRef,
}

impl Guess {
    pub fn new(location: Coordinate, message: MessageRef) -> Self {
        Self {
            latitude: location.latitude,
            longitude: location.longitude,
            message,
        }
    }

    pub fn location(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// One image-guessing round, identified by its tag.
///
/// Lives in the active set from open until close, then moves (never copies)
/// into the closed history. While closed, the image bytes are gone but the
/// metadata and the final guess map are retained permanently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGame {
    /// Stored image filename, `<tag>.<ext>`.
    pub filename: String,
    /// Ground truth. Never exposed to participants before closing.
    pub latitude: f64,
    pub longitude: f64,
    /// Unique among currently active rounds only.
    pub tag: String,
    /// One announcement post per subscribed surface, in post order.
    pub image_messages: Vec<MessageRef>,
    /// The matching guess prompts, edited by the adapter when the round closes.
    pub guesshint_messages: Vec<MessageRef>,
    pub guesses: BTreeMap<UserId, Guess>,
}

impl ImageGame {
    pub fn new(
        location: Coordinate,
        tag: String,
        filename: String,
        image_messages: Vec<MessageRef>,
        guesshint_messages: Vec<MessageRef>,
    ) -> Self {
        Self {
            filename,
            latitude: location.latitude,
            longitude: location.longitude,
            tag,
            image_messages,
            guesshint_messages,
            guesses: BTreeMap::new(),
        }
    }

    pub fn location(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_game_wire_format() {
        let mut game = ImageGame::new(
            Coordinate::new(48.8584, 2.2945),
            "alpha".into(),
            "alpha.png".into(),
            vec![MessageRef::new(10, 100)],
            vec![MessageRef::new(10, 101)],
        );
        game.guesses.insert(
            42,
            Guess::new(Coordinate::new(48.0, 2.0), MessageRef::new(10, 102)),
        );

        let json = serde_json::to_value(&game).unwrap();
        assert_eq!(json["filename"], "alpha.png");
        assert_eq!(json["tag"], "alpha");
        assert_eq!(json["image_messages"][0]["channel"], 10);
        assert_eq!(json["image_messages"][0]["message"], 100);
        // Map keys serialize as strings in JSON.
        assert_eq!(json["guesses"]["42"]["latitude"], 48.0);
        assert_eq!(json["guesses"]["42"]["message"]["message"], 102);

        let back: ImageGame = serde_json::from_value(json).unwrap();
        assert_eq!(back, game);
    }
}
