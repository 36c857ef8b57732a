use log::warn;

use super::piece_pair::analyze_piece_pair;
use crate::config::settings::AnalysisSettings;
use crate::domain::{PiecePairAnalysis, Session};

/// Analyzes every piece pair in a session.
///
/// Pieces pair up as (0,1), (2,3), ...; a trailing unpaired piece is
/// ignored. Pairs with an empty piece are skipped silently, pairs that fail
/// with too few boats are skipped with a warning. A session with some
/// malformed pairs still yields results for the valid ones.
pub fn analyze_session(session: &Session, settings: &AnalysisSettings) -> Vec<PiecePairAnalysis> {
    let mut results = Vec::new();

    for pair_start in (0..session.pieces.len().saturating_sub(1)).step_by(2) {
        let piece1 = &session.pieces[pair_start];
        let piece2 = &session.pieces[pair_start + 1];

        if piece1.boats.is_empty() || piece2.boats.is_empty() {
            continue;
        }

        match analyze_piece_pair(&piece1.boats, &piece2.boats, None, settings) {
            Ok(mut analysis) => {
                analysis.piece1_index = pair_start;
                analysis.piece2_index = pair_start + 1;
                results.push(analysis);
            }
            Err(e) => {
                warn!(
                    "Skipping pieces {}/{} of session {}: {}",
                    pair_start,
                    pair_start + 1,
                    session.id,
                    e
                );
            }
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AthleteId, Boat, Piece};
    use chrono::NaiveDate;

    fn boat(name: &str, time: f64, athletes: &[AthleteId]) -> Boat {
        Boat {
            name: name.to_string(),
            finish_time_seconds: Some(time),
            handicap_seconds: 0.0,
            athletes: athletes.to_vec(),
        }
    }

    fn piece(order: i32, boats: Vec<Boat>) -> Piece {
        Piece {
            sequence_order: order,
            boats,
        }
    }

    fn session(pieces: Vec<Piece>) -> Session {
        Session {
            id: 1,
            team_id: 1,
            date: NaiveDate::from_ymd_opt(2026, 4, 12)
                .unwrap()
                .and_hms_opt(7, 0, 0)
                .unwrap(),
            pieces,
        }
    }

    #[test]
    fn pairs_pieces_in_order_and_records_indices() {
        let s = session(vec![
            piece(1, vec![boat("A", 360.0, &[1]), boat("B", 365.0, &[2])]),
            piece(2, vec![boat("A", 363.0, &[2]), boat("B", 362.0, &[1])]),
            piece(3, vec![boat("A", 358.0, &[1]), boat("B", 361.0, &[2])]),
            piece(4, vec![boat("A", 359.0, &[2]), boat("B", 360.0, &[1])]),
        ]);

        let results = analyze_session(&s, &AnalysisSettings::default());

        assert_eq!(results.len(), 2);
        assert_eq!((results[0].piece1_index, results[0].piece2_index), (0, 1));
        assert_eq!((results[1].piece1_index, results[1].piece2_index), (2, 3));
    }

    #[test]
    fn trailing_unpaired_piece_is_ignored() {
        let s = session(vec![
            piece(1, vec![boat("A", 360.0, &[1]), boat("B", 365.0, &[2])]),
            piece(2, vec![boat("A", 363.0, &[2]), boat("B", 362.0, &[1])]),
            piece(3, vec![boat("A", 358.0, &[1]), boat("B", 361.0, &[2])]),
        ]);

        let results = analyze_session(&s, &AnalysisSettings::default());
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn single_boat_pair_is_skipped_without_error() {
        let s = session(vec![
            piece(1, vec![boat("A", 360.0, &[1])]),
            piece(2, vec![boat("A", 363.0, &[1]), boat("B", 362.0, &[2])]),
            piece(3, vec![boat("A", 358.0, &[1]), boat("B", 361.0, &[2])]),
            piece(4, vec![boat("A", 359.0, &[2]), boat("B", 360.0, &[1])]),
        ]);

        let results = analyze_session(&s, &AnalysisSettings::default());

        // The malformed first pair is dropped, the second still analyzes.
        assert_eq!(results.len(), 1);
        assert_eq!((results[0].piece1_index, results[0].piece2_index), (2, 3));
    }

    #[test]
    fn empty_piece_pair_is_skipped_silently() {
        let s = session(vec![
            piece(1, vec![]),
            piece(2, vec![boat("A", 363.0, &[1]), boat("B", 362.0, &[2])]),
        ]);

        let results = analyze_session(&s, &AnalysisSettings::default());
        assert!(results.is_empty());
    }

    #[test]
    fn empty_session_yields_no_results() {
        let s = session(vec![]);
        assert!(analyze_session(&s, &AnalysisSettings::default()).is_empty());
    }
}
