//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The coordinating component of the engine. The record store / API layer calls it at two entry
// points after it persists a mutation:
//
// - on_match_saved: change detection, score/status broadcast, standings recompute
// - on_match_event_created: event payload build and broadcast
//
// Both run inside the caller's unit of work; the mutation is acknowledged only after
// broadcasting (and any recompute) has been attempted.
//--------------------------------------------------------------------------------------------------

pub mod match_lifecycle_service;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::{
    standing::Standing,
    types::{EventValidationError, MatchEvent, MatchSnapshot, ValidationError},
};
use crate::domain::services::{
    broadcast::PublishReport,
    change_detector::ChangeSet,
    payloads::PayloadError,
};
use crate::outbounds::record_store::RecordStoreError;

pub use match_lifecycle_service::MatchLifecycleServiceImpl;

/// Errors surfaced to the caller of an entry point. Nothing was broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// Malformed match snapshot or event value.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An event misses a field its kind requires.
    #[error(transparent)]
    MissingRequiredField(EventValidationError),

    /// The event references a match the record store does not know.
    #[error("Match {0} not found")]
    UnknownMatch(Uuid),

    /// A player or team referenced by an event could not be resolved.
    #[error("Lookup failed: {0}")]
    Lookup(#[from] RecordStoreError),
}

impl From<EventValidationError> for LifecycleError {
    fn from(err: EventValidationError) -> Self {
        match err {
            EventValidationError::Invalid(inner) => Self::Validation(inner),
            missing @ EventValidationError::MissingRequiredField { .. } => {
                Self::MissingRequiredField(missing)
            }
        }
    }
}

impl From<PayloadError> for LifecycleError {
    fn from(err: PayloadError) -> Self {
        match err {
            PayloadError::InvalidEvent(inner) => inner.into(),
            PayloadError::Lookup(inner) => Self::Lookup(inner),
        }
    }
}

/// What happened to the league table as a consequence of a match save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "rows", rename_all = "snake_case")]
pub enum StandingsStatus {
    NotTriggered,
    Recomputed(Vec<Standing>),
    /// A concurrent run already included this result.
    Superseded,
    /// The aggregation attempt was abandoned; the save itself still succeeded.
    Failed(String),
}

/// Result of `on_match_saved`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSavedOutcome {
    pub changes: ChangeSet,
    /// Present when a score/status payload was published.
    pub broadcast: Option<PublishReport>,
    pub standings: StandingsStatus,
}

/// Entry points invoked by the record store / API layer after persisting a mutation.
#[async_trait]
pub trait MatchLifecycleService: Send + Sync {
    /// Reacts to a persisted match mutation.
    ///
    /// # Arguments
    /// * `previous` - Snapshot read before the write, `None` on first save
    /// * `next` - Snapshot as written
    ///
    /// # Returns
    /// * `Ok(MatchSavedOutcome)` - Detected changes, broadcast and standings results
    /// * `Err(LifecycleError)` - If `next` is malformed; nothing is broadcast
    async fn on_match_saved(
        &self,
        previous: Option<&MatchSnapshot>,
        next: &MatchSnapshot,
    ) -> Result<MatchSavedOutcome, LifecycleError>;

    /// Reacts to a newly recorded match event.
    ///
    /// # Returns
    /// * `Ok(PublishReport)` - Delivery counts for the event's match
    /// * `Err(LifecycleError)` - If the event is invalid or its references cannot be resolved
    async fn on_match_event_created(&self, event: &MatchEvent) -> Result<PublishReport, LifecycleError>;
}
