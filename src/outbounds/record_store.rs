//--------------------------------------------------------------------------------------------------
// STRUCTS & TRAITS
//--------------------------------------------------------------------------------------------------
// | Name              | Description                                       | Key Methods            |
// |-------------------|---------------------------------------------------|------------------------|
// | RecordStore       | Port to the collaborator that persists entities   | fetch_enrolled_teams   |
// |                   |                                                   | fetch_finished_matches |
// |                   |                                                   | upsert_standing        |
// |                   |                                                   | lookup_player          |
// |                   |                                                   | lookup_player_team     |
// | RecordStoreError  | Failures reported by the record store             |                        |
//--------------------------------------------------------------------------------------------------

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::{
    standing::Standing,
    types::{Match, Player, Team},
};

/// Errors that can occur when talking to the record store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordStoreError {
    /// The requested entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// The store could not serve the request.
    #[error("Record store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound port to the record-keeping collaborator.
///
/// The engine only reads reference data and finished results through this
/// trait, and writes nothing but standings rows.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every team formally enrolled in the league.
    async fn fetch_enrolled_teams(&self, league_id: Uuid) -> Result<Vec<Team>, RecordStoreError>;

    /// Every Finished match of the league.
    async fn fetch_finished_matches(&self, league_id: Uuid) -> Result<Vec<Match>, RecordStoreError>;

    /// Inserts or overwrites the row keyed by (league, team).
    async fn upsert_standing(&self, standing: &Standing) -> Result<(), RecordStoreError>;

    async fn lookup_player(&self, player_id: Uuid) -> Result<Player, RecordStoreError>;

    /// The team whose roster the player belongs to.
    async fn lookup_player_team(&self, player_id: Uuid) -> Result<Team, RecordStoreError>;
}

#[cfg(test)]
use mockall::*;

#[cfg(test)]
mock! {
    pub RecordStore {}

    #[async_trait]
    impl RecordStore for RecordStore {
        async fn fetch_enrolled_teams(&self, league_id: Uuid) -> Result<Vec<Team>, RecordStoreError>;

        async fn fetch_finished_matches(&self, league_id: Uuid) -> Result<Vec<Match>, RecordStoreError>;

        async fn upsert_standing(&self, standing: &Standing) -> Result<(), RecordStoreError>;

        async fn lookup_player(&self, player_id: Uuid) -> Result<Player, RecordStoreError>;

        async fn lookup_player_team(&self, player_id: Uuid) -> Result<Team, RecordStoreError>;
    }
}
