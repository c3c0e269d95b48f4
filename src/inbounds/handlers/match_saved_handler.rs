use tracing::{error, info};

use crate::domain::{
    models::types::Match,
    services::match_lifecycle::{LifecycleError, MatchLifecycleService},
};
use crate::outbounds::in_memory_store::InMemoryRecordStore;

use super::super::dtos::{MatchSavedRequest, MatchSavedResponse};

/// +----------------------------------------------------------+
/// | STRUCTS | TRAITS | ENUMS | FUNCTIONS                     |
/// +----------+-------+-------+------------------------------+
/// | Functions:                                               |
/// |   - handle_match_saved                                   |
/// +----------------------------------------------------------+

/// Processes a match create/update request.
///
/// # Arguments
///
/// * `request` - The match fields as submitted
/// * `store` - The record store the match is persisted to
/// * `lifecycle` - The orchestrator notified after the write
///
/// # Flow
///
/// 1. Converts the request into a `Match`, rejecting malformed values
/// 2. Persists it, capturing the snapshot it replaced
/// 3. Hands both snapshots to the lifecycle orchestrator
///
/// # Error Handling
///
/// * Validation errors are returned before anything is written
/// * Broadcast and standings failures are reported in the outcome, not as errors
pub async fn handle_match_saved(
    request: MatchSavedRequest,
    store: &InMemoryRecordStore,
    lifecycle: &dyn MatchLifecycleService,
) -> Result<MatchSavedResponse, LifecycleError> {
    let snapshot = Match::try_from(request)?;

    info!("Saving match {}: {} ({})", snapshot.id, snapshot.score_line(), snapshot.status);
    let previous = store.save_match(snapshot.clone());

    let outcome = lifecycle
        .on_match_saved(previous.as_ref(), &snapshot)
        .await
        .map_err(|e| {
            error!("Error processing saved match {}: {e:?}", snapshot.id);
            e
        })?;

    Ok(MatchSavedResponse { snapshot, outcome })
}
