//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module defines the core data types used throughout the league engine,
// including matches, in-match events and the reference data they point at.
//
// | Section            | Description                                                      |
// |--------------------|------------------------------------------------------------------|
// | ENUMS              | Discrete sets of values (MatchStatus, EventKind, CardColor...).  |
// | STRUCTS            | Matches, events, teams, players and leagues.                     |
// | Potential Errors   | Validation errors raised before a mutation is applied.           |
// | TESTS              | Contains unit tests for the defined types.                       |
//--------------------------------------------------------------------------------------------------

//--------------------------------------------------------------------------------------------------
//  ENUMS
//--------------------------------------------------------------------------------------------------
// | Name          | Description                                         |
// |---------------|-----------------------------------------------------|
// | MatchStatus   | Lifecycle status of a match (Upcoming/Live/Finished)|
// | EventKind     | Kind of an in-match event.                          |
// | CardColor     | Colour of a disciplinary card.                      |
// | Side          | Home or away side of a fixture.                     |
//--------------------------------------------------------------------------------------------------
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Represents the lifecycle status of a match.
///
/// Transitions are monotonic: Upcoming -> Live -> Finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchStatus {
    /// The match is scheduled but has not started.
    Upcoming,
    /// The match is in progress.
    Live,
    /// The match is over and its result is final.
    Finished,
}

impl Default for MatchStatus {
    fn default() -> Self {
        Self::Upcoming
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Upcoming => "UPCOMING",
            Self::Live => "LIVE",
            Self::Finished => "FINISHED",
        };
        f.write_str(label)
    }
}

/// The kind of an in-match event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Goal,
    Card,
    Substitution,
    Injury,
    Shot,
    Penalty,
    PeriodEnd,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Goal => "goal",
            Self::Card => "card",
            Self::Substitution => "substitution",
            Self::Injury => "injury",
            Self::Shot => "shot",
            Self::Penalty => "penalty",
            Self::PeriodEnd => "period_end",
        };
        f.write_str(label)
    }
}

/// Colour of a card shown to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardColor {
    Green,
    Yellow,
    Red,
}

/// One side of a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("home"),
            Self::Away => f.write_str("away"),
        }
    }
}

//--------------------------------------------------------------------------------------------------
//  STRUCTS
//--------------------------------------------------------------------------------------------------
// | Name          | Description                                         | Key Methods        |
// |---------------|-----------------------------------------------------|--------------------|
// | Match         | A scheduled fixture and its persisted result        | validate           |
// |               |                                                     | resolve_victor     |
// |               |                                                     | score_line         |
// | MatchEvent    | A recorded in-match occurrence                      | validate           |
// | League        | Competition reference data                          |                    |
// | Team          | Team reference data                                 |                    |
// | Player        | Player reference data                               | display_name       |
//--------------------------------------------------------------------------------------------------

/// A single scheduled fixture between two teams within a league.
///
/// Scores are stored as signed integers the way the record store holds them;
/// `validate` rejects negative values before a mutation reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    pub league_id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub venue: String,
    pub status: MatchStatus,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    /// Winning team, `None` for a draw or while the score is not known.
    pub victor: Option<Uuid>,
}

/// The persisted field values of a match at a point in time.
pub type MatchSnapshot = Match;

impl Match {
    /// Creates an upcoming match with no score.
    pub fn new(
        league_id: Uuid,
        home_team_id: Uuid,
        away_team_id: Uuid,
        scheduled_at: DateTime<Utc>,
        venue: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            league_id,
            home_team_id,
            away_team_id,
            scheduled_at,
            venue: venue.into(),
            status: MatchStatus::Upcoming,
            home_score: None,
            away_score: None,
            victor: None,
        }
    }

    /// Returns a copy with the given score applied and the victor re-derived.
    pub fn with_score(mut self, home: i32, away: i32) -> Self {
        self.home_score = Some(home);
        self.away_score = Some(away);
        self.victor = self.resolve_victor();
        self
    }

    /// Returns a copy with the given status.
    pub fn with_status(mut self, status: MatchStatus) -> Self {
        self.status = status;
        self
    }

    /// Both scores, when both are set.
    pub fn final_score(&self) -> Option<(i32, i32)> {
        match (self.home_score, self.away_score) {
            (Some(home), Some(away)) => Some((home, away)),
            _ => None,
        }
    }

    /// Derives the victor from the scores.
    ///
    /// # Returns
    /// The id of the strictly higher scorer, or `None` for a draw or a missing score
    pub fn resolve_victor(&self) -> Option<Uuid> {
        let (home, away) = self.final_score()?;
        if home > away {
            Some(self.home_team_id)
        } else if away > home {
            Some(self.away_team_id)
        } else {
            None
        }
    }

    /// Renders the score as "H-A", or "TBD" while either side is unknown.
    pub fn score_line(&self) -> String {
        match self.final_score() {
            Some((home, away)) => format!("{}-{}", home, away),
            None => "TBD".to_string(),
        }
    }

    /// Checks the match invariants before the mutation is applied.
    ///
    /// # Returns
    /// * `Ok(())` - If the snapshot is well formed
    /// * `Err(ValidationError)` - If a score is negative, both sides are the same team,
    ///   or the stored victor disagrees with the scores
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.home_team_id == self.away_team_id {
            return Err(ValidationError::SameTeams(self.home_team_id));
        }
        if let Some(score) = self.home_score.filter(|s| *s < 0) {
            return Err(ValidationError::NegativeScore { side: Side::Home, score });
        }
        if let Some(score) = self.away_score.filter(|s| *s < 0) {
            return Err(ValidationError::NegativeScore { side: Side::Away, score });
        }
        let expected = self.resolve_victor();
        if self.victor != expected {
            return Err(ValidationError::InconsistentVictor {
                match_id: self.id,
                victor: self.victor,
                expected,
            });
        }
        Ok(())
    }
}

/// A recorded in-match occurrence.
///
/// Kind-specific fields are optional here; `validate` enforces that card events
/// carry a colour and substitutions carry both players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub id: Uuid,
    pub match_id: Uuid,
    pub minute: i32,
    pub kind: EventKind,
    pub player_id: Uuid,
    pub assisting_player_id: Option<Uuid>,
    pub card_color: Option<CardColor>,
    pub sub_in: Option<Uuid>,
    pub sub_out: Option<Uuid>,
}

impl MatchEvent {
    /// Creates an event with no kind-specific fields set.
    pub fn new(match_id: Uuid, minute: i32, kind: EventKind, player_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            match_id,
            minute,
            kind,
            player_id,
            assisting_player_id: None,
            card_color: None,
            sub_in: None,
            sub_out: None,
        }
    }

    pub fn with_assist(mut self, player_id: Uuid) -> Self {
        self.assisting_player_id = Some(player_id);
        self
    }

    pub fn with_card(mut self, color: CardColor) -> Self {
        self.card_color = Some(color);
        self
    }

    pub fn with_substitution(mut self, sub_in: Uuid, sub_out: Uuid) -> Self {
        self.sub_in = Some(sub_in);
        self.sub_out = Some(sub_out);
        self
    }

    /// Checks the event is a valid entity before it is persisted.
    ///
    /// # Returns
    /// * `Ok(())` - If every field required by the event kind is present
    /// * `Err(EventValidationError)` - If the minute is negative or a required field is missing
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.minute < 0 {
            return Err(ValidationError::NegativeMinute(self.minute).into());
        }
        match self.kind {
            EventKind::Card if self.card_color.is_none() => {
                Err(EventValidationError::MissingRequiredField {
                    kind: self.kind,
                    field: "card_color",
                })
            }
            EventKind::Substitution if self.sub_in.is_none() => {
                Err(EventValidationError::MissingRequiredField {
                    kind: self.kind,
                    field: "sub_in",
                })
            }
            EventKind::Substitution if self.sub_out.is_none() => {
                Err(EventValidationError::MissingRequiredField {
                    kind: self.kind,
                    field: "sub_out",
                })
            }
            _ => Ok(()),
        }
    }

    /// Players a payload for this event names, other than the acting player.
    pub fn supporting_players(&self) -> Vec<Uuid> {
        match self.kind {
            EventKind::Goal => self.assisting_player_id.into_iter().collect(),
            EventKind::Substitution => self.sub_in.into_iter().chain(self.sub_out).collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for MatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} at {}'", self.player_id, self.kind, self.minute)
    }
}

/// A competition season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub id: Uuid,
    pub name: String,
    pub season: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A team, consumed by id and name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub short_name: String,
}

impl Team {
    pub fn new(name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            short_name: short_name.into(),
        }
    }
}

/// A rostered player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub jersey_no: u16,
    pub team_id: Uuid,
}

impl Player {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        jersey_no: u16,
        team_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            jersey_no,
            team_id,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

//--------------------------------------------------------------------------------------------------
//  ERRORS
//--------------------------------------------------------------------------------------------------

/// A malformed value rejected before the mutation is applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{side} score cannot be negative (got {score})")]
    NegativeScore { side: Side, score: i32 },

    #[error("Event minute cannot be negative (got {0})")]
    NegativeMinute(i32),

    #[error("Team {0} cannot play itself")]
    SameTeams(Uuid),

    #[error("Victor {victor:?} of match {match_id} does not match the score (expected {expected:?})")]
    InconsistentVictor {
        match_id: Uuid,
        victor: Option<Uuid>,
        expected: Option<Uuid>,
    },
}

/// Errors raised when an event entity is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventValidationError {
    /// A field required by the event kind is absent.
    #[error("{kind} event is missing required field `{field}`")]
    MissingRequiredField { kind: EventKind, field: &'static str },

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

//--------------------------------------------------------------------------------------------------
//  TESTS
//--------------------------------------------------------------------------------------------------
