use std::collections::HashSet;

use anyhow::Result;
use log::info;
use serde::Serialize;

use crate::config::settings::AppConfig;
use crate::database::{ratings, sessions, DbConn};
use crate::domain::{AthleteId, Boat, Piece, RatingType, TeamId};
use crate::rating::rankings::{get_team_rankings, RankingEntry};
use crate::rating::RatingEngine;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculationSummary {
    pub sessions_processed: usize,
    pub races_processed: usize,
    pub athletes_rated: usize,
    pub final_rankings: Vec<RankingEntry>,
}

/// Rebuilds one rating series for a team from the full session history.
///
/// Ratings are never patched incrementally: the existing rows are deleted
/// and every session is replayed in date order. Elo is path-dependent, so
/// the chronological replay is what makes two runs over the same history
/// produce identical ratings. Not reentrant for a given (team, rating
/// type); the caller serializes concurrent recalculations.
pub struct RecalculationService {
    config: AppConfig,
}

impl RecalculationService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(
        &self,
        conn: &mut DbConn,
        team_id: TeamId,
        rating_type: RatingType,
    ) -> Result<RecalculationSummary> {
        info!(
            "=== Recalculating {} ratings for team {} ===",
            rating_type.as_str(),
            team_id
        );

        let deleted = ratings::delete_for_team(conn, team_id, rating_type.as_str())?;
        info!("  → Cleared {} existing rating rows", deleted);

        let history = sessions::list_for_team(conn, team_id)?;
        info!("  → Replaying {} sessions in date order", history.len());

        let engine = RatingEngine::new(self.config.rating.clone());
        let mut races_processed = 0;
        let mut athletes: HashSet<AthleteId> = HashSet::new();

        for session in &history {
            for piece in &session.pieces {
                races_processed +=
                    self.replay_piece(conn, &engine, team_id, rating_type, piece, &mut athletes)?;
            }
        }

        let final_rankings = get_team_rankings(conn, team_id, rating_type, 0)?;
        info!(
            "=== Recalculation complete: {} sessions, {} races, {} athletes ===",
            history.len(),
            races_processed,
            athletes.len()
        );

        Ok(RecalculationSummary {
            sessions_processed: history.len(),
            races_processed,
            athletes_rated: athletes.len(),
            final_rankings,
        })
    }

    /// Replays every unordered boat pair of one piece, updating ratings for
    /// each unambiguous single-athlete swap. Returns the race count.
    fn replay_piece(
        &self,
        conn: &mut DbConn,
        engine: &RatingEngine,
        team_id: TeamId,
        rating_type: RatingType,
        piece: &Piece,
        athletes: &mut HashSet<AthleteId>,
    ) -> Result<usize> {
        let mut races = 0;

        for (boat_a, boat_b) in boat_pair_combinations(&piece.boats) {
            // A boat without a recorded finish time is a valid "no data"
            // state, not an error.
            let (Some(time_a), Some(time_b)) = (boat_a.adjusted_time(), boat_b.adjusted_time())
            else {
                continue;
            };

            let unique_a = athletes_unique_to(boat_a, boat_b);
            let unique_b = athletes_unique_to(boat_b, boat_a);

            // Only exactly one-for-one swaps attribute a rating change;
            // ambiguous multi-athlete differences are skipped.
            let (&[athlete_a], &[athlete_b]) = (unique_a.as_slice(), unique_b.as_slice()) else {
                continue;
            };

            // Lower adjusted time is faster: positive favors athlete A.
            let performance_diff = time_b - time_a;
            engine.update_ratings(
                conn,
                team_id,
                athlete_a,
                athlete_b,
                performance_diff,
                rating_type,
                1.0,
            )?;

            races += 1;
            athletes.insert(athlete_a);
            athletes.insert(athlete_b);
        }

        Ok(races)
    }
}

fn boat_pair_combinations(boats: &[Boat]) -> Vec<(&Boat, &Boat)> {
    let mut pairs = Vec::new();
    for i in 0..boats.len() {
        for j in (i + 1)..boats.len() {
            pairs.push((&boats[i], &boats[j]));
        }
    }
    pairs
}

fn athletes_unique_to(boat: &Boat, other: &Boat) -> Vec<AthleteId> {
    boat.athletes
        .iter()
        .filter(|a| !other.athletes.contains(a))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{athletes as db_athletes, connection, sessions as db_sessions, setup};
    use chrono::NaiveDate;

    fn test_conn() -> DbConn {
        let pool = connection::create_memory_pool().unwrap();
        let mut conn = connection::get_connection(&pool).unwrap();
        setup::reset_database(&mut conn).unwrap();
        conn
    }

    fn service() -> RecalculationService {
        RecalculationService::new(AppConfig::new())
    }

    fn date(day: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, day)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap()
    }

    fn seed_athletes(conn: &mut DbConn, team_id: i64, count: usize) -> Vec<i64> {
        (0..count)
            .map(|i| {
                db_athletes::insert(conn, team_id, &format!("Athlete {}", i + 1), None)
                    .unwrap()
                    .id
            })
            .collect()
    }

    /// One session, one piece: boats differing by exactly one athlete.
    fn seed_single_swap_piece(
        conn: &mut DbConn,
        team_id: i64,
        day: u32,
        athlete_a: i64,
        athlete_b: i64,
        shared: &[i64],
        time_a: f64,
        time_b: f64,
    ) {
        let session = db_sessions::insert_session(conn, team_id, date(day)).unwrap();
        let piece = db_sessions::insert_piece(conn, session.id, 1).unwrap();
        let boat_a = db_sessions::insert_boat(conn, piece.id, "A", Some(time_a), 0.0).unwrap();
        let boat_b = db_sessions::insert_boat(conn, piece.id, "B", Some(time_b), 0.0).unwrap();

        db_sessions::insert_assignment(conn, boat_a.id, athlete_a).unwrap();
        db_sessions::insert_assignment(conn, boat_b.id, athlete_b).unwrap();
        for &athlete in shared {
            db_sessions::insert_assignment(conn, boat_a.id, athlete).unwrap();
            db_sessions::insert_assignment(conn, boat_b.id, athlete).unwrap();
        }
    }

    #[test]
    fn empty_history_yields_zero_summary() {
        let mut conn = test_conn();

        let summary = service().run(&mut conn, 1, RatingType::Combined).unwrap();

        assert_eq!(summary.sessions_processed, 0);
        assert_eq!(summary.races_processed, 0);
        assert_eq!(summary.athletes_rated, 0);
        assert!(summary.final_rankings.is_empty());
    }

    #[test]
    fn single_swap_race_moves_the_faster_athlete_up() {
        let mut conn = test_conn();
        let ids = seed_athletes(&mut conn, 1, 3);
        // Athlete in boat A is 3s faster.
        seed_single_swap_piece(&mut conn, 1, 1, ids[0], ids[1], &ids[2..], 360.0, 363.0);

        let summary = service().run(&mut conn, 1, RatingType::Combined).unwrap();

        assert_eq!(summary.sessions_processed, 1);
        assert_eq!(summary.races_processed, 1);
        assert_eq!(summary.athletes_rated, 2);
        assert_eq!(summary.final_rankings.len(), 2);
        assert_eq!(summary.final_rankings[0].athlete_id, ids[0]);
        assert!((summary.final_rankings[0].rating_value - 1025.6).abs() < 1e-9);
        assert!((summary.final_rankings[1].rating_value - 974.4).abs() < 1e-9);
        assert_eq!(summary.final_rankings[0].rank, 1);
        assert_eq!(summary.final_rankings[1].rank, 2);
    }

    #[test]
    fn recalculation_is_deterministic() {
        let mut conn = test_conn();
        let ids = seed_athletes(&mut conn, 1, 4);
        seed_single_swap_piece(&mut conn, 1, 1, ids[0], ids[1], &[], 360.0, 363.0);
        seed_single_swap_piece(&mut conn, 1, 2, ids[1], ids[2], &[], 361.0, 362.0);
        seed_single_swap_piece(&mut conn, 1, 3, ids[2], ids[3], &[], 365.0, 358.0);

        let first = service().run(&mut conn, 1, RatingType::Combined).unwrap();
        let second = service().run(&mut conn, 1, RatingType::Combined).unwrap();

        assert_eq!(first.races_processed, second.races_processed);
        for (a, b) in first.final_rankings.iter().zip(&second.final_rankings) {
            assert_eq!(a.athlete_id, b.athlete_id);
            assert_eq!(a.rating_value, b.rating_value);
            assert_eq!(a.races_count, b.races_count);
        }
    }

    #[test]
    fn replay_order_changes_final_ratings() {
        // Same two results, opposite chronology, in two separate teams.
        let mut conn = test_conn();
        let team1 = seed_athletes(&mut conn, 1, 3);
        let team2 = seed_athletes(&mut conn, 2, 3);

        // Team 1: blowout first, close race second.
        seed_single_swap_piece(&mut conn, 1, 1, team1[0], team1[1], &[], 350.0, 360.0);
        seed_single_swap_piece(&mut conn, 1, 2, team1[0], team1[2], &[], 360.0, 361.0);
        // Team 2: same races dated in reverse order.
        seed_single_swap_piece(&mut conn, 2, 2, team2[0], team2[1], &[], 350.0, 360.0);
        seed_single_swap_piece(&mut conn, 2, 1, team2[0], team2[2], &[], 360.0, 361.0);

        let svc = service();
        let first = svc.run(&mut conn, 1, RatingType::Combined).unwrap();
        let second = svc.run(&mut conn, 2, RatingType::Combined).unwrap();

        let rating = |summary: &RecalculationSummary, athlete: i64| {
            summary
                .final_rankings
                .iter()
                .find(|e| e.athlete_id == athlete)
                .unwrap()
                .rating_value
        };

        // Athlete 0's final rating depends on which result came first.
        assert!((rating(&first, team1[0]) - rating(&second, team2[0])).abs() > 1e-9);
    }

    #[test]
    fn boats_without_finish_times_are_skipped() {
        let mut conn = test_conn();
        let ids = seed_athletes(&mut conn, 1, 2);

        let session = db_sessions::insert_session(&mut conn, 1, date(1)).unwrap();
        let piece = db_sessions::insert_piece(&mut conn, session.id, 1).unwrap();
        let boat_a = db_sessions::insert_boat(&mut conn, piece.id, "A", Some(360.0), 0.0).unwrap();
        let boat_b = db_sessions::insert_boat(&mut conn, piece.id, "B", None, 0.0).unwrap();
        db_sessions::insert_assignment(&mut conn, boat_a.id, ids[0]).unwrap();
        db_sessions::insert_assignment(&mut conn, boat_b.id, ids[1]).unwrap();

        let summary = service().run(&mut conn, 1, RatingType::Combined).unwrap();

        assert_eq!(summary.sessions_processed, 1);
        assert_eq!(summary.races_processed, 0);
        assert_eq!(summary.athletes_rated, 0);
    }

    #[test]
    fn ambiguous_multi_athlete_swaps_are_skipped() {
        let mut conn = test_conn();
        let ids = seed_athletes(&mut conn, 1, 4);

        let session = db_sessions::insert_session(&mut conn, 1, date(1)).unwrap();
        let piece = db_sessions::insert_piece(&mut conn, session.id, 1).unwrap();
        let boat_a = db_sessions::insert_boat(&mut conn, piece.id, "A", Some(360.0), 0.0).unwrap();
        let boat_b = db_sessions::insert_boat(&mut conn, piece.id, "B", Some(363.0), 0.0).unwrap();
        // Two athletes unique to each boat: no single swap to credit.
        db_sessions::insert_assignment(&mut conn, boat_a.id, ids[0]).unwrap();
        db_sessions::insert_assignment(&mut conn, boat_a.id, ids[1]).unwrap();
        db_sessions::insert_assignment(&mut conn, boat_b.id, ids[2]).unwrap();
        db_sessions::insert_assignment(&mut conn, boat_b.id, ids[3]).unwrap();

        let summary = service().run(&mut conn, 1, RatingType::Combined).unwrap();

        assert_eq!(summary.races_processed, 0);
        assert!(summary.final_rankings.is_empty());
    }

    #[test]
    fn handicaps_can_turn_a_loss_into_a_draw() {
        let mut conn = test_conn();
        let ids = seed_athletes(&mut conn, 1, 2);

        let session = db_sessions::insert_session(&mut conn, 1, date(1)).unwrap();
        let piece = db_sessions::insert_piece(&mut conn, session.id, 1).unwrap();
        // B finishes 3s behind but carries a 3s handicap.
        let boat_a = db_sessions::insert_boat(&mut conn, piece.id, "A", Some(360.0), 0.0).unwrap();
        let boat_b = db_sessions::insert_boat(&mut conn, piece.id, "B", Some(363.0), 3.0).unwrap();
        db_sessions::insert_assignment(&mut conn, boat_a.id, ids[0]).unwrap();
        db_sessions::insert_assignment(&mut conn, boat_b.id, ids[1]).unwrap();

        let summary = service().run(&mut conn, 1, RatingType::Combined).unwrap();

        assert_eq!(summary.races_processed, 1);
        // Adjusted times are equal: a draw between equal ratings moves nothing.
        for entry in &summary.final_rankings {
            assert!((entry.rating_value - 1000.0).abs() < 1e-12);
        }
    }
}
