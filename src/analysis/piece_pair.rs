use thiserror::Error;

use super::margin::{margin, performance_diff, swing};
use super::swaps::detect_swaps;
use crate::config::settings::AnalysisSettings;
use crate::domain::{Boat, PiecePairAnalysis, SwapReport};

#[derive(Debug, Error)]
#[error("piece {piece} of the pair has {boats} boat(s), need at least 2")]
pub struct InsufficientBoatsError {
    /// Which piece of the pair (1 or 2) lacked boats.
    pub piece: usize,
    pub boats: usize,
}

/// Analyzes one baseline/swap piece pair.
///
/// Boats are sorted by name so that the two lowest-named boats of each piece
/// form a deterministic boat1/boat2 reference pairing; the margin sign then
/// stays meaningful even when boats arrive in arbitrary order. When `swaps`
/// is None the swap report is computed from the rosters.
pub fn analyze_piece_pair(
    piece1_boats: &[Boat],
    piece2_boats: &[Boat],
    swaps: Option<SwapReport>,
    settings: &AnalysisSettings,
) -> Result<PiecePairAnalysis, InsufficientBoatsError> {
    if piece1_boats.len() < 2 {
        return Err(InsufficientBoatsError {
            piece: 1,
            boats: piece1_boats.len(),
        });
    }
    if piece2_boats.len() < 2 {
        return Err(InsufficientBoatsError {
            piece: 2,
            boats: piece2_boats.len(),
        });
    }

    let p1 = sorted_by_name(piece1_boats);
    let p2 = sorted_by_name(piece2_boats);

    let margin1 = reference_margin(p1[0], p1[1]);
    let margin2 = reference_margin(p2[0], p2[1]);
    let swing = swing(margin1, margin2);
    let performance_diff = performance_diff(swing);

    let swaps = swaps.unwrap_or_else(|| detect_swaps(piece1_boats, piece2_boats));

    let boat1_name = p1[0].name.clone();
    let boat2_name = p1[1].name.clone();

    let interpretation = interpret(
        &boat1_name,
        &boat2_name,
        margin1,
        margin2,
        swing,
        performance_diff,
        &swaps,
        settings,
    );

    Ok(PiecePairAnalysis {
        piece1_index: 0,
        piece2_index: 1,
        boat1_name,
        boat2_name,
        margin1,
        margin2,
        swing,
        performance_diff,
        swapped_athletes: swaps.swapped,
        unchanged_athletes: swaps.unchanged,
        interpretation,
    })
}

fn sorted_by_name(boats: &[Boat]) -> Vec<&Boat> {
    let mut sorted: Vec<&Boat> = boats.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
}

fn reference_margin(boat1: &Boat, boat2: &Boat) -> f64 {
    // Analysis is a lenient read model: a missing finish time reads as 0.0
    // here, unlike the recalculation engine which skips such boats.
    margin(
        boat1.finish_time_seconds.unwrap_or(0.0),
        boat2.finish_time_seconds.unwrap_or(0.0),
        boat1.handicap_seconds,
        boat2.handicap_seconds,
    )
}

#[allow(clippy::too_many_arguments)]
fn interpret(
    boat1: &str,
    boat2: &str,
    margin1: f64,
    margin2: f64,
    swing: f64,
    performance_diff: f64,
    swaps: &SwapReport,
    settings: &AnalysisSettings,
) -> String {
    let mut lines = Vec::new();

    lines.push(piece_result_line(1, boat1, boat2, margin1));
    lines.push(piece_result_line(2, boat1, boat2, margin2));
    lines.push(swing_line(boat1, boat2, swing, settings));

    if let Some(line) = performance_line(boat1, boat2, swing, performance_diff, swaps, settings) {
        lines.push(line);
    }

    lines.join(" ")
}

fn piece_result_line(piece: usize, boat1: &str, boat2: &str, margin: f64) -> String {
    // Ties go to boat 1. Deliberate sign-convention quirk, kept as-is.
    let winner = if margin >= 0.0 { boat1 } else { boat2 };
    format!("Piece {}: {} won by {:.2}s.", piece, winner, margin.abs())
}

fn swing_line(boat1: &str, boat2: &str, swing: f64, settings: &AnalysisSettings) -> String {
    if swing.abs() < settings.negligible_seconds {
        return "Negligible swing between pieces.".to_string();
    }
    let toward = if swing > 0.0 { boat1 } else { boat2 };
    format!("Swing of {:.2}s toward {}.", swing.abs(), toward)
}

fn performance_line(
    boat1: &str,
    boat2: &str,
    swing: f64,
    performance_diff: f64,
    swaps: &SwapReport,
    settings: &AnalysisSettings,
) -> Option<String> {
    if swaps.swapped.is_empty() {
        return None;
    }

    if performance_diff.abs() < settings.negligible_seconds {
        return Some("No significant difference between the swapped athletes.".to_string());
    }

    let into_boat1: Vec<_> = swaps.swapped.iter().filter(|s| s.to_boat == boat1).collect();
    let into_boat2: Vec<_> = swaps.swapped.iter().filter(|s| s.to_boat == boat2).collect();

    if into_boat1.len() == 1 && into_boat2.len() == 1 {
        // The better performer moved into the boat whose margin improved.
        let (better, worse) = if swing > 0.0 {
            (into_boat1[0], into_boat2[0])
        } else {
            (into_boat2[0], into_boat1[0])
        };
        return Some(format!(
            "Athlete {} outperformed athlete {} by {:.2}s per piece.",
            better.athlete,
            worse.athlete,
            performance_diff.abs()
        ));
    }

    Some(format!(
        "Estimated performance difference of {:.2}s per swapped athlete.",
        performance_diff.abs()
    ))
}
