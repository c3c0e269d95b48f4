//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// In-process adapter for the RecordStore port. Used by the binary and by tests to stand in for
// the external record-keeping collaborator.
//
// | Name                | Description                                     | Key Methods        |
// |---------------------|-------------------------------------------------|--------------------|
// | InMemoryRecordStore | RwLock-guarded maps of leagues, teams, matches  | save_match         |
// |                     |                                                 | record_event       |
// |                     |                                                 | standings          |
//--------------------------------------------------------------------------------------------------

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::models::{
    standing::Standing,
    types::{League, Match, MatchEvent, MatchStatus, Player, Team},
};

use super::record_store::{RecordStore, RecordStoreError};

#[derive(Default)]
struct StoreState {
    leagues: HashMap<Uuid, League>,
    teams: HashMap<Uuid, Team>,
    enrolments: HashMap<Uuid, BTreeSet<Uuid>>,
    players: HashMap<Uuid, Player>,
    matches: HashMap<Uuid, Match>,
    events: HashMap<Uuid, MatchEvent>,
    standings: HashMap<(Uuid, Uuid), Standing>,
}

/// Record store kept entirely in memory.
pub struct InMemoryRecordStore {
    state: RwLock<StoreState>,
    /// When false every port call fails with `Unavailable`.
    available: AtomicBool,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulates the collaborator going away (or coming back).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), RecordStoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RecordStoreError::Unavailable("in-memory store switched off".to_string()))
        }
    }

    pub fn add_league(&self, league: League) {
        self.state.write().leagues.insert(league.id, league);
    }

    pub fn league(&self, league_id: Uuid) -> Option<League> {
        self.state.read().leagues.get(&league_id).cloned()
    }

    pub fn add_team(&self, team: Team) {
        self.state.write().teams.insert(team.id, team);
    }

    /// Enrols a team in a league; enrolling twice is a no-op.
    pub fn enroll(&self, league_id: Uuid, team_id: Uuid) {
        self.state
            .write()
            .enrolments
            .entry(league_id)
            .or_default()
            .insert(team_id);
    }

    pub fn add_player(&self, player: Player) {
        self.state.write().players.insert(player.id, player);
    }

    /// Persists a match and returns the snapshot it replaced.
    ///
    /// The previous snapshot is read under the same write lock, so it is exactly
    /// the state the write overwrote.
    pub fn save_match(&self, next: Match) -> Option<Match> {
        let previous = self.state.write().matches.insert(next.id, next);
        debug!("Saved match (had previous snapshot: {})", previous.is_some());
        previous
    }

    pub fn get_match(&self, match_id: Uuid) -> Option<Match> {
        self.state.read().matches.get(&match_id).cloned()
    }

    pub fn record_event(&self, event: MatchEvent) {
        self.state.write().events.insert(event.id, event);
    }

    /// Events of a match ordered by minute.
    pub fn events_for_match(&self, match_id: Uuid) -> Vec<MatchEvent> {
        let mut events: Vec<MatchEvent> = self
            .state
            .read()
            .events
            .values()
            .filter(|e| e.match_id == match_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.minute, e.id));
        events
    }

    /// Persisted standings of a league ordered by position.
    pub fn standings(&self, league_id: Uuid) -> Vec<Standing> {
        let mut rows: Vec<Standing> = self
            .state
            .read()
            .standings
            .values()
            .filter(|s| s.league_id == league_id)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.position);
        rows
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn fetch_enrolled_teams(&self, league_id: Uuid) -> Result<Vec<Team>, RecordStoreError> {
        self.ensure_available()?;
        let state = self.state.read();
        let Some(team_ids) = state.enrolments.get(&league_id) else {
            return Ok(Vec::new());
        };
        team_ids
            .iter()
            .map(|id| {
                state
                    .teams
                    .get(id)
                    .cloned()
                    .ok_or(RecordStoreError::NotFound { entity: "Team", id: *id })
            })
            .collect()
    }

    async fn fetch_finished_matches(&self, league_id: Uuid) -> Result<Vec<Match>, RecordStoreError> {
        self.ensure_available()?;
        let mut matches: Vec<Match> = self
            .state
            .read()
            .matches
            .values()
            .filter(|m| m.league_id == league_id && m.status == MatchStatus::Finished)
            .cloned()
            .collect();
        matches.sort_by_key(|m| (m.scheduled_at, m.id));
        Ok(matches)
    }

    async fn upsert_standing(&self, standing: &Standing) -> Result<(), RecordStoreError> {
        self.ensure_available()?;
        self.state
            .write()
            .standings
            .insert((standing.league_id, standing.team_id), standing.clone());
        Ok(())
    }

    async fn lookup_player(&self, player_id: Uuid) -> Result<Player, RecordStoreError> {
        self.ensure_available()?;
        self.state
            .read()
            .players
            .get(&player_id)
            .cloned()
            .ok_or(RecordStoreError::NotFound { entity: "Player", id: player_id })
    }

    async fn lookup_player_team(&self, player_id: Uuid) -> Result<Team, RecordStoreError> {
        self.ensure_available()?;
        let state = self.state.read();
        let player = state
            .players
            .get(&player_id)
            .ok_or(RecordStoreError::NotFound { entity: "Player", id: player_id })?;
        state
            .teams
            .get(&player.team_id)
            .cloned()
            .ok_or(RecordStoreError::NotFound { entity: "Team", id: player.team_id })
    }
}
