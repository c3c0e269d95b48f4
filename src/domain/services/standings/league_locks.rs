use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;
use uuid::Uuid;

/// Serialization state for one league.
#[derive(Default)]
struct LeagueSlot {
    /// Held for the whole duration of a run.
    gate: AsyncMutex<()>,
    /// Tickets handed out so far.
    requested: AtomicU64,
    /// Highest ticket whose data a completed run is known to have read.
    covered: AtomicU64,
}

/// Per-league mutual exclusion with coalescing of stale requests.
///
/// At most one run per league is in flight; runs for different leagues proceed
/// in parallel. A request that waited behind a run which started after the
/// request was issued is already covered by that run and is skipped.
#[derive(Default)]
pub struct LeagueLocks {
    slots: Mutex<HashMap<Uuid, Arc<LeagueSlot>>>,
}

impl LeagueLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, league_id: Uuid) -> Arc<LeagueSlot> {
        Arc::clone(self.slots.lock().entry(league_id).or_default())
    }

    /// Runs `work` exclusively for `league_id`.
    ///
    /// # Returns
    /// * `Ok(Some(T))` - The work ran and succeeded
    /// * `Ok(None)` - A later run already covered this request; nothing ran
    /// * `Err(E)` - The work ran and failed; the request stays uncovered
    pub async fn run_exclusive<F, Fut, T, E>(&self, league_id: Uuid, work: F) -> Result<Option<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let slot = self.slot(league_id);
        let ticket = slot.requested.fetch_add(1, Ordering::SeqCst) + 1;

        let _gate = slot.gate.lock().await;
        if slot.covered.load(Ordering::SeqCst) >= ticket {
            debug!("League {} request {} superseded by a later run", league_id, ticket);
            return Ok(None);
        }

        // Every ticket up to here was issued before this run reads its inputs.
        let horizon = slot.requested.load(Ordering::SeqCst);
        let output = work().await?;
        slot.covered.store(horizon, Ordering::SeqCst);
        Ok(Some(output))
    }
}
