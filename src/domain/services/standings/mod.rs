//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module rebuilds league tables from finished results. Every run is a full sweep so that
// corrections to past results are reflected no matter the order they arrive in.
//
// | Component            | Description                                                  |
// |----------------------|--------------------------------------------------------------|
// | compute_table        | Pure aggregation and ordering                                |
// | StandingsAggregator  | Fetches inputs, computes and persists a league's table       |
// | LeagueLocks          | At-most-one in-flight aggregation per league                 |
// | RecomputeOutcome     | Result of a recompute request                                |
// | StandingsError       | Errors that abandon an aggregation attempt                   |
//--------------------------------------------------------------------------------------------------

mod aggregator;
mod league_locks;
mod table;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::standing::Standing;
use crate::outbounds::record_store::RecordStoreError;

pub use aggregator::StandingsAggregator;
pub use league_locks::LeagueLocks;
pub use table::{compare_rows, compute_table, POINTS_FOR_DRAW, POINTS_FOR_WIN};

/// Result of a recompute request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecomputeOutcome {
    /// The table was rebuilt and persisted.
    Recomputed(Vec<Standing>),
    /// A run that started after this request already rebuilt the table.
    Superseded,
}

/// Errors that abandon an aggregation attempt. None of them is fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StandingsError {
    /// Inputs could not be read; nothing was written.
    #[error("Failed to load results for league {league_id}: {source}")]
    Fetch {
        league_id: Uuid,
        #[source]
        source: RecordStoreError,
    },

    /// Every attempt to persist the full table failed.
    #[error("Gave up persisting standings for league {league_id} after {attempts} attempts: {source}")]
    Aborted {
        league_id: Uuid,
        attempts: u32,
        #[source]
        source: RecordStoreError,
    },
}
