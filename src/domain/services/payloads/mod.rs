//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Notification payloads pushed to live viewers of a match.
//
// | Component            | Description                                                  |
// |----------------------|--------------------------------------------------------------|
// | Payload              | Tagged record sent on the wire (`score_update`/`match_event`)|
// | ScoreUpdate          | Score line and status of a match                             |
// | MatchEventPayload    | Normalized in-match event with kind-specific extension      |
// | EventPayloadBuilder  | Resolves names/teams through the record store                |
// | PayloadError         | Errors raised while building an event payload                |
//--------------------------------------------------------------------------------------------------

mod event_payload;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::types::{
    CardColor, EventKind, EventValidationError, Match, MatchStatus,
};
use crate::outbounds::record_store::RecordStoreError;

pub use event_payload::EventPayloadBuilder;

/// Serialized payload shared by every subscriber of one publish.
pub type Frame = Arc<str>;

/// Errors that can occur while building a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The event entity itself is invalid.
    #[error(transparent)]
    InvalidEvent(#[from] EventValidationError),

    /// A referenced player or team could not be resolved.
    #[error("Failed to resolve event references: {0}")]
    Lookup(#[from] RecordStoreError),
}

/// A notification delivered to the subscribers of a match.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
    ScoreUpdate(ScoreUpdate),
    MatchEvent(MatchEventPayload),
}

impl Payload {
    /// Serializes the payload once into an immutable frame.
    pub fn to_frame(&self) -> Result<Frame, serde_json::Error> {
        serde_json::to_string(self).map(Frame::from)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ScoreUpdate(_) => "score_update",
            Self::MatchEvent(_) => "match_event",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreUpdate {
    pub match_id: Uuid,
    /// "H-A", or "TBD" while a score is unknown.
    pub score: String,
    pub status: MatchStatus,
}

/// Builds the score/status payload for a match snapshot.
pub fn score_update(snapshot: &Match) -> Payload {
    Payload::ScoreUpdate(ScoreUpdate {
        match_id: snapshot.id,
        score: snapshot.score_line(),
        status: snapshot.status,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamRef {
    pub id: Uuid,
    pub name: String,
}

/// A recorded event, normalized for viewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchEventPayload {
    pub event_id: Uuid,
    pub match_id: Uuid,
    pub event_type: EventKind,
    pub minute: i32,
    pub player: PlayerRef,
    /// Team inferred from the acting player's roster.
    pub team: TeamRef,
    #[serde(flatten)]
    pub details: Option<EventDetails>,
}

/// Kind-specific fields, flattened next to the base fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EventDetails {
    Goal { assistant: Option<PlayerRef> },
    Card { card_color: CardColor },
    Substitution { sub_in: PlayerRef, sub_out: PlayerRef },
}
