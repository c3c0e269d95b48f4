use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::models::standing::Standing;
use crate::outbounds::record_store::{RecordStore, RecordStoreError};

use super::{compute_table, LeagueLocks, RecomputeOutcome, StandingsError};

/// Rebuilds and persists league tables.
///
/// Requests for one league are serialized through `LeagueLocks`; the persisted
/// rows are upserted keyed by (league, team), so repeating a run with unchanged
/// inputs rewrites identical rows.
pub struct StandingsAggregator {
    store: Arc<dyn RecordStore>,
    locks: LeagueLocks,
    max_attempts: u32,
}

impl StandingsAggregator {
    /// Creates an aggregator.
    ///
    /// # Arguments
    /// * `store` - Record store providing inputs and receiving rows
    /// * `max_attempts` - How many times the full upsert pass is tried (at least once)
    pub fn new(store: Arc<dyn RecordStore>, max_attempts: u32) -> Self {
        Self {
            store,
            locks: LeagueLocks::new(),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Recomputes the standings of a league.
    ///
    /// Waits behind any aggregation of the same league already in flight.
    ///
    /// # Returns
    /// * `Ok(RecomputeOutcome::Recomputed)` - The ordered rows that were persisted
    /// * `Ok(RecomputeOutcome::Superseded)` - A later run already covered this request
    /// * `Err(StandingsError)` - The attempt was abandoned
    pub async fn recompute(&self, league_id: Uuid) -> Result<RecomputeOutcome, StandingsError> {
        let outcome = self
            .locks
            .run_exclusive(league_id, || self.sweep(league_id))
            .await?;

        Ok(match outcome {
            Some(rows) => RecomputeOutcome::Recomputed(rows),
            None => RecomputeOutcome::Superseded,
        })
    }

    async fn sweep(&self, league_id: Uuid) -> Result<Vec<Standing>, StandingsError> {
        let fetch_failed = |source| StandingsError::Fetch { league_id, source };
        let teams = self
            .store
            .fetch_enrolled_teams(league_id)
            .await
            .map_err(fetch_failed)?;
        let matches = self
            .store
            .fetch_finished_matches(league_id)
            .await
            .map_err(fetch_failed)?;

        let table = compute_table(league_id, &teams, &matches);
        self.persist(league_id, &table).await?;

        info!(
            "Recomputed standings for league {} ({} teams, {} finished matches)",
            league_id,
            table.len(),
            matches.len()
        );
        Ok(table)
    }

    /// Writes the whole table, retrying the full pass rather than resuming it.
    async fn persist(&self, league_id: Uuid, table: &[Standing]) -> Result<(), StandingsError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.upsert_all(table).await {
                Ok(()) => return Ok(()),
                Err(source) if attempt >= self.max_attempts => {
                    error!(
                        "Aborting standings for league {} after {} attempts: {}",
                        league_id, attempt, source
                    );
                    return Err(StandingsError::Aborted { league_id, attempts: attempt, source });
                }
                Err(e) => {
                    warn!(
                        "Standings upsert for league {} failed on attempt {}: {}; retrying full pass",
                        league_id, attempt, e
                    );
                }
            }
        }
    }

    async fn upsert_all(&self, table: &[Standing]) -> Result<(), RecordStoreError> {
        for row in table {
            self.store.upsert_standing(row).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::types::{Match, MatchStatus, Team};
    use crate::outbounds::in_memory_store::InMemoryRecordStore;
    use crate::outbounds::record_store::MockRecordStore;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn seeded_store() -> (Arc<InMemoryRecordStore>, Uuid, Team, Team) {
        let store = Arc::new(InMemoryRecordStore::new());
        let league_id = Uuid::new_v4();
        let home = Team::new("Harbour Hawks", "HAW");
        let away = Team::new("Valley Foxes", "FOX");
        for team in [&home, &away] {
            store.add_team(team.clone());
            store.enroll(league_id, team.id);
        }
        store.save_match(
            Match::new(league_id, home.id, away.id, Utc::now(), "Field")
                .with_status(MatchStatus::Finished)
                .with_score(3, 1),
        );
        (store, league_id, home, away)
    }

    #[tokio::test]
    async fn test_recompute_persists_rows() {
        let (store, league_id, home, away) = seeded_store();
        let aggregator = StandingsAggregator::new(store.clone(), 3);

        let RecomputeOutcome::Recomputed(rows) = aggregator.recompute(league_id).await.unwrap() else {
            panic!("expected a recompute");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].team_id, home.id);
        assert_eq!(rows[0].points, 3);
        assert_eq!(rows[1].team_id, away.id);
        assert_eq!(store.standings(league_id), rows);
    }

    #[tokio::test]
    async fn test_recompute_is_idempotent() {
        let (store, league_id, _, _) = seeded_store();
        let aggregator = StandingsAggregator::new(store.clone(), 3);

        aggregator.recompute(league_id).await.unwrap();
        let first = serde_json::to_vec(&store.standings(league_id)).unwrap();
        aggregator.recompute(league_id).await.unwrap();
        let second = serde_json::to_vec(&store.standings(league_id)).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fetch_failure_writes_nothing() {
        let league_id = Uuid::new_v4();
        let mut store = MockRecordStore::new();
        store
            .expect_fetch_enrolled_teams()
            .returning(|_| Err(RecordStoreError::Unavailable("connection refused".to_string())));
        store.expect_fetch_finished_matches().never();
        store.expect_upsert_standing().never();

        let aggregator = StandingsAggregator::new(Arc::new(store), 3);
        assert!(matches!(
            aggregator.recompute(league_id).await,
            Err(StandingsError::Fetch { .. })
        ));
    }

    #[tokio::test]
    async fn test_upsert_pass_is_retried_as_a_whole() {
        let league_id = Uuid::new_v4();
        let teams = vec![Team::new("A", "A"), Team::new("B", "B")];
        let calls = Arc::new(AtomicUsize::new(0));

        let mut store = MockRecordStore::new();
        let enrolled = teams.clone();
        store
            .expect_fetch_enrolled_teams()
            .times(1)
            .returning(move |_| Ok(enrolled.clone()));
        store
            .expect_fetch_finished_matches()
            .times(1)
            .returning(|_| Ok(Vec::new()));
        let counter = Arc::clone(&calls);
        store.expect_upsert_standing().returning(move |_| {
            // Second row of the first pass fails; the retry starts again from row one.
            if counter.fetch_add(1, Ordering::SeqCst) == 1 {
                Err(RecordStoreError::Unavailable("timeout".to_string()))
            } else {
                Ok(())
            }
        });

        let aggregator = StandingsAggregator::new(Arc::new(store), 3);
        let outcome = aggregator.recompute(league_id).await.unwrap();
        assert!(matches!(outcome, RecomputeOutcome::Recomputed(rows) if rows.len() == 2));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let league_id = Uuid::new_v4();
        let mut store = MockRecordStore::new();
        store
            .expect_fetch_enrolled_teams()
            .returning(|_| Ok(vec![Team::new("A", "A")]));
        store.expect_fetch_finished_matches().returning(|_| Ok(Vec::new()));
        store
            .expect_upsert_standing()
            .times(2)
            .returning(|_| Err(RecordStoreError::Unavailable("down".to_string())));

        let aggregator = StandingsAggregator::new(Arc::new(store), 2);
        assert_eq!(
            aggregator.recompute(league_id).await,
            Err(StandingsError::Aborted {
                league_id,
                attempts: 2,
                source: RecordStoreError::Unavailable("down".to_string()),
            })
        );
    }
}
