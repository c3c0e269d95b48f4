use tracing::{error, info};

use crate::domain::{
    models::types::MatchEvent,
    services::match_lifecycle::{LifecycleError, MatchLifecycleService},
};
use crate::outbounds::{in_memory_store::InMemoryRecordStore, record_store::RecordStore};

use super::super::dtos::{MatchEventRequest, MatchEventResponse};

/// +----------------------------------------------------------+
/// | STRUCTS | TRAITS | ENUMS | FUNCTIONS                     |
/// +----------+-------+-------+------------------------------+
/// | Functions:                                               |
/// |   - handle_match_event                                   |
/// +----------------------------------------------------------+

/// Processes a newly recorded match event.
///
/// # Flow
///
/// 1. Checks the referenced match exists
/// 2. Converts the request into a `MatchEvent`, enforcing kind-specific fields
/// 3. Resolves every player the event names
/// 4. Persists the event and hands it to the lifecycle orchestrator
///
/// # Error Handling
///
/// * Unknown matches, invalid events and unresolvable players are rejected before
///   anything is written; the latter surface as `LifecycleError::Lookup`
pub async fn handle_match_event(
    request: MatchEventRequest,
    store: &InMemoryRecordStore,
    lifecycle: &dyn MatchLifecycleService,
) -> Result<MatchEventResponse, LifecycleError> {
    if store.get_match(request.match_id).is_none() {
        return Err(LifecycleError::UnknownMatch(request.match_id));
    }

    let event = MatchEvent::try_from(request)?;

    store.lookup_player_team(event.player_id).await.map_err(|e| {
        error!("Rejecting match event {}: {e}", event.id);
        LifecycleError::Lookup(e)
    })?;
    for player_id in event.supporting_players() {
        store.lookup_player(player_id).await.map_err(|e| {
            error!("Rejecting match event {}: {e}", event.id);
            LifecycleError::Lookup(e)
        })?;
    }

    info!("Recording match event: {}", event);
    store.record_event(event.clone());

    let broadcast = lifecycle.on_match_event_created(&event).await.map_err(|e| {
        error!("Error broadcasting match event {}: {e:?}", event.id);
        e
    })?;

    Ok(MatchEventResponse { event, broadcast })
}
