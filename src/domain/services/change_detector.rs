//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Decides whether a persisted match mutation is worth announcing to live viewers.
//
// | Name          | Description                                       | Key Methods          |
// |---------------|---------------------------------------------------|----------------------|
// | ChangeSet     | Flags describing a match state transition         | is_broadcast_worthy  |
// |               |                                                   | needs_standings      |
// | detect        | Compares two snapshots of the same match          |                      |
//--------------------------------------------------------------------------------------------------

use serde::Serialize;

use crate::domain::models::types::{MatchSnapshot, MatchStatus};

/// Broadcast-worthy transitions detected between two snapshots of a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    /// The (home, away) score pair differs. Unset compares unequal to every set value.
    pub score_changed: bool,
    /// The status differs.
    pub status_changed: bool,
    /// The match moved into Finished from any other status.
    pub became_finished: bool,
    /// The next snapshot is Finished.
    pub is_finished: bool,
}

impl ChangeSet {
    /// Whether subscribers must be told about this mutation.
    pub fn is_broadcast_worthy(&self) -> bool {
        self.score_changed || self.status_changed
    }

    /// Whether this mutation invalidates the league table.
    ///
    /// True when the result just became final, or when an already finished
    /// result had its score corrected.
    pub fn needs_standings(&self) -> bool {
        self.became_finished || (self.is_finished && self.score_changed)
    }
}

/// Compares the previous and next persisted state of a match.
///
/// # Arguments
/// * `previous` - Snapshot fetched before the write, `None` on first save
/// * `next` - Snapshot as persisted by the write
///
/// # Returns
/// The detected transitions; an empty set when `previous` is absent
pub fn detect(previous: Option<&MatchSnapshot>, next: &MatchSnapshot) -> ChangeSet {
    let Some(previous) = previous else {
        return ChangeSet::default();
    };

    let score_changed =
        (previous.home_score, previous.away_score) != (next.home_score, next.away_score);
    let status_changed = previous.status != next.status;
    let is_finished = next.status == MatchStatus::Finished;

    ChangeSet {
        score_changed,
        status_changed,
        became_finished: previous.status != MatchStatus::Finished && is_finished,
        is_finished,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::types::Match;
    use chrono::Utc;
    use uuid::Uuid;

    fn create_test_match() -> Match {
        Match::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Utc::now(), "Arena")
    }

    #[test]
    fn test_first_save_produces_nothing() {
        let next = create_test_match().with_status(MatchStatus::Finished).with_score(2, 1);
        let changes = detect(None, &next);
        assert_eq!(changes, ChangeSet::default());
        assert!(!changes.is_broadcast_worthy());
        assert!(!changes.needs_standings());
    }

    #[test]
    fn test_unchanged_snapshots_are_quiet() {
        let fixtures = vec![
            create_test_match(),
            create_test_match().with_status(MatchStatus::Live).with_score(1, 0),
            create_test_match().with_status(MatchStatus::Finished).with_score(2, 2),
        ];
        for m in fixtures {
            let mut renamed = m.clone();
            renamed.venue = "Somewhere else".to_string();
            let changes = detect(Some(&m), &renamed);
            assert!(!changes.is_broadcast_worthy());
            assert!(!changes.needs_standings());
        }
    }

    #[test]
    fn test_score_change() {
        let prev = create_test_match().with_status(MatchStatus::Live).with_score(0, 0);
        let next = prev.clone().with_score(1, 0);
        let changes = detect(Some(&prev), &next);
        assert!(changes.score_changed);
        assert!(!changes.status_changed);
        assert!(changes.is_broadcast_worthy());
        assert!(!changes.needs_standings());
    }

    #[test]
    fn test_unset_score_differs_from_zero() {
        let prev = create_test_match().with_status(MatchStatus::Live);
        let next = prev.clone().with_score(0, 0);
        assert!(detect(Some(&prev), &next).score_changed);
    }

    #[test]
    fn test_became_finished() {
        let prev = create_test_match().with_status(MatchStatus::Live).with_score(2, 1);
        let next = prev.clone().with_status(MatchStatus::Finished);
        let changes = detect(Some(&prev), &next);
        assert!(changes.status_changed);
        assert!(changes.became_finished);
        assert!(!changes.score_changed);
        assert!(changes.needs_standings());
    }

    #[test]
    fn test_post_hoc_correction_needs_standings() {
        let prev = create_test_match().with_status(MatchStatus::Finished).with_score(2, 1);
        let next = prev.clone().with_score(2, 2);
        let changes = detect(Some(&prev), &next);
        assert!(!changes.became_finished);
        assert!(changes.score_changed);
        assert!(changes.needs_standings());
    }

    #[test]
    fn test_backward_transition_is_not_finishing() {
        let prev = create_test_match().with_status(MatchStatus::Finished).with_score(1, 0);
        let next = prev.clone().with_status(MatchStatus::Live);
        let changes = detect(Some(&prev), &next);
        assert!(changes.status_changed);
        assert!(!changes.became_finished);
        assert!(!changes.needs_standings());
    }
}
