//! Implementation of the match lifecycle orchestrator that turns persisted
//! mutations into broadcasts and standings recomputes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::models::types::{MatchEvent, MatchSnapshot};
use crate::domain::services::{
    broadcast::{Broadcaster, PublishReport},
    change_detector::detect,
    payloads::{score_update, EventPayloadBuilder, Payload},
    standings::{RecomputeOutcome, StandingsAggregator},
};
use crate::outbounds::record_store::RecordStore;

use super::{LifecycleError, MatchLifecycleService, MatchSavedOutcome, StandingsStatus};

/// Orchestrator wiring the change detector, payload builder, broadcaster and
/// standings aggregator together.
pub struct MatchLifecycleServiceImpl {
    broadcaster: Broadcaster,
    payload_builder: EventPayloadBuilder,
    aggregator: Arc<StandingsAggregator>,
}

impl MatchLifecycleServiceImpl {
    /// Creates the orchestrator.
    ///
    /// # Arguments
    /// * `store` - Record store used for name lookups and standings
    /// * `broadcaster` - Fan-out over the shared subscription registry
    /// * `aggregation_attempts` - Full upsert passes tried before a recompute is abandoned
    pub fn new(store: Arc<dyn RecordStore>, broadcaster: Broadcaster, aggregation_attempts: u32) -> Self {
        Self {
            broadcaster,
            payload_builder: EventPayloadBuilder::new(Arc::clone(&store)),
            aggregator: Arc::new(StandingsAggregator::new(store, aggregation_attempts)),
        }
    }

    pub fn aggregator(&self) -> &Arc<StandingsAggregator> {
        &self.aggregator
    }

    /// Publishes and swallows failures; broadcasting never fails a mutation.
    async fn publish(&self, match_id: Uuid, payload: &Payload) -> Option<PublishReport> {
        match self.broadcaster.publish(match_id, payload).await {
            Ok(report) => Some(report),
            Err(e) => {
                error!("Failed to publish {} for match {}: {}", payload.type_name(), match_id, e);
                None
            }
        }
    }

    async fn refresh_standings(&self, league_id: Uuid) -> StandingsStatus {
        match self.aggregator.recompute(league_id).await {
            Ok(RecomputeOutcome::Recomputed(rows)) => StandingsStatus::Recomputed(rows),
            Ok(RecomputeOutcome::Superseded) => StandingsStatus::Superseded,
            Err(e) => {
                warn!("Standings for league {} not updated: {}", league_id, e);
                StandingsStatus::Failed(e.to_string())
            }
        }
    }
}

#[async_trait]
impl MatchLifecycleService for MatchLifecycleServiceImpl {
    async fn on_match_saved(
        &self,
        previous: Option<&MatchSnapshot>,
        next: &MatchSnapshot,
    ) -> Result<MatchSavedOutcome, LifecycleError> {
        next.validate()?;

        let changes = detect(previous, next);

        let broadcast = if changes.is_broadcast_worthy() {
            self.publish(next.id, &score_update(next)).await
        } else {
            None
        };

        let standings = if changes.needs_standings() {
            self.refresh_standings(next.league_id).await
        } else {
            StandingsStatus::NotTriggered
        };

        info!(
            "Match {} saved: score {} status {} (changes: {:?})",
            next.id,
            next.score_line(),
            next.status,
            changes
        );

        Ok(MatchSavedOutcome { changes, broadcast, standings })
    }

    async fn on_match_event_created(&self, event: &MatchEvent) -> Result<PublishReport, LifecycleError> {
        let payload = self.payload_builder.build(event).await?;
        let report = self.publish(event.match_id, &payload).await.unwrap_or_default();

        info!("Match event {} broadcast to {} subscribers", event, report.delivered);
        Ok(report)
    }
}
