use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A team's aggregated record within a league.
///
/// Fully derived from finished results; the aggregator rebuilds every row from
/// scratch and the record store overwrites them keyed by (league, team).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub league_id: Uuid,
    pub team_id: Uuid,
    pub team_name: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u64,
    pub goals_against: u64,
    pub points: u32,
    /// 1-based rank in the table.
    pub position: u32,
}

impl Standing {
    /// Creates a zero-valued row for a team, not yet ranked.
    pub fn zeroed(league_id: Uuid, team_id: Uuid, team_name: impl Into<String>) -> Self {
        Self {
            league_id,
            team_id,
            team_name: team_name.into(),
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            points: 0,
            position: 0,
        }
    }

    /// Clamped to the `i64` range.
    pub fn goal_difference(&self) -> i64 {
        let diff = i128::from(self.goals_for) - i128::from(self.goals_against);
        i64::try_from(diff).unwrap_or(if diff < 0 { i64::MIN } else { i64::MAX })
    }
}
