//--------------------------------------------------------------------------------------------------
// FUNCTIONS
//--------------------------------------------------------------------------------------------------
// | Name            | Description                                          | Return Type     |
// |-----------------|------------------------------------------------------|-----------------|
// | compute_table   | Aggregates finished results into a ranked table      | Vec<Standing>   |
// | compare_rows    | Table order: points, goal difference, goals, name    | Ordering        |
//--------------------------------------------------------------------------------------------------

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::warn;
use uuid::Uuid;

use crate::domain::models::{
    standing::Standing,
    types::{Match, MatchStatus, Team},
};

/// Points awarded for a win.
pub const POINTS_FOR_WIN: u32 = 3;
/// Points awarded to each side for a draw.
pub const POINTS_FOR_DRAW: u32 = 1;

/// Recomputes a league table from scratch.
///
/// Only Finished matches of `league_id` with both scores present count. Results
/// are attributed to enrolled teams only; a side that is not enrolled is skipped.
///
/// # Arguments
/// * `league_id` - The league being aggregated
/// * `teams` - Every team enrolled in the league
/// * `matches` - Candidate results; anything that does not qualify is ignored
///
/// # Returns
/// One row per enrolled team, sorted and with positions assigned from 1
pub fn compute_table(league_id: Uuid, teams: &[Team], matches: &[Match]) -> Vec<Standing> {
    let mut rows: HashMap<Uuid, Standing> = teams
        .iter()
        .map(|team| (team.id, Standing::zeroed(league_id, team.id, team.name.clone())))
        .collect();

    for m in matches {
        if m.league_id != league_id || m.status != MatchStatus::Finished {
            continue;
        }
        let Some((home, away)) = m.final_score() else {
            continue;
        };
        let (Ok(home), Ok(away)) = (u32::try_from(home), u32::try_from(away)) else {
            warn!("Skipping match {} with negative score {}", m.id, m.score_line());
            continue;
        };

        if let Some(row) = rows.get_mut(&m.home_team_id) {
            record_result(row, home, away);
        }
        if let Some(row) = rows.get_mut(&m.away_team_id) {
            record_result(row, away, home);
        }
    }

    let mut table: Vec<Standing> = rows.into_values().collect();
    table.sort_by(compare_rows);
    for (index, row) in table.iter_mut().enumerate() {
        row.position = index as u32 + 1;
    }
    table
}

fn record_result(row: &mut Standing, scored: u32, conceded: u32) {
    row.played += 1;
    row.goals_for = row.goals_for.saturating_add(u64::from(scored));
    row.goals_against = row.goals_against.saturating_add(u64::from(conceded));
    match scored.cmp(&conceded) {
        Ordering::Greater => {
            row.wins += 1;
            row.points += POINTS_FOR_WIN;
        }
        Ordering::Equal => {
            row.draws += 1;
            row.points += POINTS_FOR_DRAW;
        }
        Ordering::Less => row.losses += 1,
    }
}

/// Orders rows by points, goal difference and goals scored (all descending),
/// then team name ascending. Team id settles rows with identical names.
pub fn compare_rows(a: &Standing, b: &Standing) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
        .then_with(|| a.team_name.cmp(&b.team_name))
        .then_with(|| a.team_id.cmp(&b.team_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn finished(league_id: Uuid, home: &Team, away: &Team, score: (i32, i32)) -> Match {
        Match::new(league_id, home.id, away.id, Utc::now(), "Field")
            .with_status(MatchStatus::Finished)
            .with_score(score.0, score.1)
    }

    fn row<'a>(table: &'a [Standing], team: &Team) -> &'a Standing {
        table.iter().find(|s| s.team_id == team.id).unwrap()
    }

    #[test]
    fn test_points_per_result() {
        let league_id = Uuid::new_v4();
        for (score, expected) in [((3, 1), (3, 0)), ((1, 1), (1, 1)), ((0, 2), (0, 3))] {
            let home = Team::new("Home", "HOM");
            let away = Team::new("Away", "AWY");
            let table = compute_table(
                league_id,
                &[home.clone(), away.clone()],
                &[finished(league_id, &home, &away, score)],
            );
            assert_eq!(row(&table, &home).points, expected.0);
            assert_eq!(row(&table, &away).points, expected.1);
        }
    }

    #[test]
    fn test_three_team_scenario() {
        let league_id = Uuid::new_v4();
        let a = Team::new("A", "A");
        let b = Team::new("B", "B");
        let c = Team::new("C", "C");
        let unplayed = Match::new(league_id, a.id, c.id, Utc::now(), "Field");
        let matches = vec![
            finished(league_id, &a, &b, (2, 1)),
            finished(league_id, &b, &c, (0, 0)),
            unplayed,
        ];

        let table = compute_table(league_id, &[a.clone(), b.clone(), c.clone()], &matches);

        let ra = row(&table, &a);
        assert_eq!((ra.played, ra.points, ra.goal_difference()), (1, 3, 1));
        let rb = row(&table, &b);
        assert_eq!((rb.played, rb.points, rb.goal_difference()), (2, 1, -1));
        assert_eq!((rb.wins, rb.draws, rb.losses), (0, 1, 1));
        let rc = row(&table, &c);
        assert_eq!((rc.played, rc.points, rc.goal_difference()), (1, 1, 0));

        // Table order is points, then goal difference, then goals for: C (GD 0) ranks above B (GD -1).
        let order: Vec<&str> = table.iter().map(|s| s.team_name.as_str()).collect();
        assert_eq!(order, vec!["A", "C", "B"]);
        let positions: Vec<u32> = table.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn test_goals_for_breaks_equal_goal_difference() {
        let league_id = Uuid::new_v4();
        let a = Team::new("Alpha", "ALP");
        let b = Team::new("Bravo", "BRA");
        let c = Team::new("Charlie", "CHA");
        let d = Team::new("Delta", "DEL");
        let matches = vec![
            finished(league_id, &b, &a, (3, 3)),
            finished(league_id, &c, &d, (1, 1)),
        ];
        let table = compute_table(league_id, &[a, b, c, d], &matches);
        let order: Vec<&str> = table.iter().map(|s| s.team_name.as_str()).collect();
        assert_eq!(order, vec!["Alpha", "Bravo", "Charlie", "Delta"]);
    }

    #[test]
    fn test_name_breaks_full_tie() {
        let league_id = Uuid::new_v4();
        let zulu = Team::new("Zulu", "ZUL");
        let echo = Team::new("Echo", "ECH");
        let matches = vec![finished(league_id, &zulu, &echo, (2, 2))];
        let table = compute_table(league_id, &[zulu, echo], &matches);
        assert_eq!(table[0].team_name, "Echo");
        assert_eq!(table[1].team_name, "Zulu");
    }

    #[test]
    fn test_ignores_unqualified_results() {
        let league_id = Uuid::new_v4();
        let a = Team::new("A", "A");
        let b = Team::new("B", "B");
        let outsider = Team::new("Outsider", "OUT");

        let mut missing_score = finished(league_id, &a, &b, (1, 0));
        missing_score.away_score = None;
        let live = finished(league_id, &a, &b, (4, 0)).with_status(MatchStatus::Live);
        let other_league = finished(Uuid::new_v4(), &a, &b, (5, 0));
        let against_outsider = finished(league_id, &outsider, &b, (0, 1));

        let table = compute_table(
            league_id,
            &[a.clone(), b.clone()],
            &[missing_score, live, other_league, against_outsider],
        );

        assert_eq!(table.len(), 2);
        assert_eq!(row(&table, &a).played, 0);
        let rb = row(&table, &b);
        assert_eq!((rb.played, rb.wins, rb.points), (1, 1, 3));
    }

    #[test]
    fn test_goal_totals_hold_maximum_scores() {
        let league_id = Uuid::new_v4();
        let a = Team::new("A", "A");
        let b = Team::new("B", "B");
        let matches: Vec<Match> = (0..3)
            .map(|_| finished(league_id, &a, &b, (i32::MAX, 0)))
            .collect();
        assert!(matches.iter().all(|m| m.validate().is_ok()));

        let table = compute_table(league_id, &[a.clone(), b.clone()], &matches);

        let expected = 3 * u64::from(i32::MAX as u32);
        let ra = row(&table, &a);
        assert_eq!((ra.played, ra.points, ra.goals_for), (3, 9, expected));
        assert_eq!(ra.goal_difference(), expected as i64);
        let rb = row(&table, &b);
        assert_eq!((rb.losses, rb.goals_against), (3, expected));
        assert_eq!(rb.goal_difference(), -(expected as i64));
        assert_eq!(table[0].team_name, "A");
    }

    #[test]
    fn test_goal_difference_is_clamped() {
        let mut standing = Standing::zeroed(Uuid::new_v4(), Uuid::new_v4(), "Wall");
        standing.goals_against = u64::MAX;
        assert_eq!(standing.goal_difference(), i64::MIN);
        standing.goals_for = u64::MAX;
        standing.goals_against = 0;
        assert_eq!(standing.goal_difference(), i64::MAX);
    }

    #[test]
    fn test_empty_league() {
        assert!(compute_table(Uuid::new_v4(), &[], &[]).is_empty());
    }
}
