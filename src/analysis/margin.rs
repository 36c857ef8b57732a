/// Handicap-adjusted time margin between two boats in one piece.
///
/// Positive means boat 1 was faster (won) after each boat's handicap is
/// subtracted from its finish time.
pub fn margin(boat1_time: f64, boat2_time: f64, boat1_handicap: f64, boat2_handicap: f64) -> f64 {
    (boat2_time - boat2_handicap) - (boat1_time - boat1_handicap)
}

/// Change in margin between two paired pieces. Positive means the margin
/// moved in boat 1's favor.
pub fn swing(margin1: f64, margin2: f64) -> f64 {
    margin2 - margin1
}

/// Each swapped athlete's estimated marginal contribution.
///
/// A two-athlete swap produces a swing attributable jointly to both swapped
/// athletes; absent other information the swing is split evenly.
pub fn performance_diff(swing: f64) -> f64 {
    swing / 2.0
}
