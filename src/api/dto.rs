//--------------------------------------------------------------------------------------------------
// STRUCTS
//--------------------------------------------------------------------------------------------------
// | Name                 | Description                               | Key Methods         |
// |----------------------|-------------------------------------------|---------------------|
// | StandingsResponse    | Persisted table of a league               | -                   |
// | HealthResponse       | Liveness plus subscription counters       | -                   |
//--------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::standing::Standing;

/// Response for a league table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsResponse {
    pub league_id: Uuid,
    /// League name when the league is registered
    pub league_name: Option<String>,
    /// Rows ordered by position
    pub standings: Vec<Standing>,
}

/// Response for the health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Matches with at least one live subscriber
    pub watched_matches: usize,
}
