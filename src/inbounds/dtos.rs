use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::types::{
    CardColor, EventKind, EventValidationError, Match, MatchEvent, MatchStatus, ValidationError,
};
use crate::domain::services::{broadcast::PublishReport, match_lifecycle::MatchSavedOutcome};

/// +----------------------------------------------------------+
/// | STRUCTS | TRAITS | ENUMS | FUNCTIONS                     |
/// +----------+-------+-------+------------------------------+
/// | Structs:                                                 |
/// |   - MatchSavedRequest                                    |
/// |   - MatchEventRequest                                    |
/// |   - MatchSavedResponse                                   |
/// |   - MatchEventResponse                                   |
/// | Implementations:                                         |
/// |   - TryFrom<MatchSavedRequest> for Match                 |
/// |   - TryFrom<MatchEventRequest> for MatchEvent            |
/// +----------------------------------------------------------+

/// Request to create or update a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSavedRequest {
    /// ID of the match; a new one is assigned when absent.
    #[serde(default)]
    pub id: Option<Uuid>,

    pub league_id: Uuid,

    pub home_team_id: Uuid,

    pub away_team_id: Uuid,

    /// Kick-off time; defaults to now.
    #[serde(default = "Utc::now")]
    pub scheduled_at: DateTime<Utc>,

    #[serde(default)]
    pub venue: String,

    #[serde(default)]
    pub status: MatchStatus,

    /// Home score as entered; negative values are rejected.
    #[serde(default)]
    pub home_score: Option<i32>,

    /// Away score as entered; negative values are rejected.
    #[serde(default)]
    pub away_score: Option<i32>,
}

/// Request to record a new event within a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchEventRequest {
    pub match_id: Uuid,

    pub minute: i32,

    pub event_type: EventKind,

    /// The acting player.
    pub player_id: Uuid,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assisting_player_id: Option<Uuid>,

    /// Required for card events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_color: Option<CardColor>,

    /// Required for substitutions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_in: Option<Uuid>,

    /// Required for substitutions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_out: Option<Uuid>,
}

/// Response to a match save: the snapshot as written plus what it triggered.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSavedResponse {
    #[serde(rename = "match")]
    pub snapshot: Match,

    #[serde(flatten)]
    pub outcome: MatchSavedOutcome,
}

/// Response to a recorded event.
#[derive(Debug, Clone, Serialize)]
pub struct MatchEventResponse {
    pub event: MatchEvent,

    pub broadcast: PublishReport,
}

impl TryFrom<MatchSavedRequest> for Match {
    type Error = ValidationError;

    fn try_from(req: MatchSavedRequest) -> Result<Self, Self::Error> {
        let mut snapshot = Match::new(
            req.league_id,
            req.home_team_id,
            req.away_team_id,
            req.scheduled_at,
            req.venue,
        )
        .with_status(req.status);

        if let Some(id) = req.id {
            snapshot.id = id;
        }
        snapshot.home_score = req.home_score;
        snapshot.away_score = req.away_score;
        snapshot.victor = snapshot.resolve_victor();

        snapshot.validate()?;
        Ok(snapshot)
    }
}

impl TryFrom<MatchEventRequest> for MatchEvent {
    type Error = EventValidationError;

    fn try_from(req: MatchEventRequest) -> Result<Self, Self::Error> {
        let mut event = MatchEvent::new(req.match_id, req.minute, req.event_type, req.player_id);
        event.assisting_player_id = req.assisting_player_id;
        event.card_color = req.card_color;
        event.sub_in = req.sub_in;
        event.sub_out = req.sub_out;

        event.validate()?;
        Ok(event)
    }
}
