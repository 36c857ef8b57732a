use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub type AthleteId = i64;
pub type TeamId = i64;

/// Rowing side an athlete occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Port,
    Starboard,
    Cox,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Port => "port",
            Side::Starboard => "starboard",
            Side::Cox => "cox",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "port" => Some(Side::Port),
            "starboard" => Some(Side::Starboard),
            "cox" => Some(Side::Cox),
            _ => None,
        }
    }
}

/// A rating series for an athlete: overall or qualified by rowing side.
///
/// The string forms ("combined", "combined_port", ...) exist only at the
/// persistence and API boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingType {
    Combined,
    CombinedSide(Side),
}

impl RatingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RatingType::Combined => "combined",
            RatingType::CombinedSide(Side::Port) => "combined_port",
            RatingType::CombinedSide(Side::Starboard) => "combined_starboard",
            RatingType::CombinedSide(Side::Cox) => "combined_cox",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "combined" => Some(RatingType::Combined),
            "combined_port" => Some(RatingType::CombinedSide(Side::Port)),
            "combined_starboard" => Some(RatingType::CombinedSide(Side::Starboard)),
            "combined_cox" => Some(RatingType::CombinedSide(Side::Cox)),
            _ => None,
        }
    }
}

/// One boat's result within a piece.
///
/// `finish_time_seconds` is None when no time was recorded; such boats are
/// skipped by the recalculation engine's pairwise comparison.
#[derive(Debug, Clone)]
pub struct Boat {
    pub name: String,
    pub finish_time_seconds: Option<f64>,
    pub handicap_seconds: f64,
    pub athletes: Vec<AthleteId>,
}

impl Boat {
    /// Finish time with the handicap subtracted, if a time was recorded.
    pub fn adjusted_time(&self) -> Option<f64> {
        self.finish_time_seconds.map(|t| t - self.handicap_seconds)
    }
}

#[derive(Debug, Clone)]
pub struct Piece {
    pub sequence_order: i32,
    pub boats: Vec<Boat>,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: i64,
    pub team_id: TeamId,
    pub date: NaiveDateTime,
    pub pieces: Vec<Piece>,
}

/// An athlete who moved between boats across a piece pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwappedAthlete {
    pub athlete: AthleteId,
    pub from_boat: String,
    pub to_boat: String,
}

/// Output of the swap detector over one piece pair.
#[derive(Debug, Clone, Default)]
pub struct SwapReport {
    pub swapped: Vec<SwappedAthlete>,
    pub unchanged: Vec<AthleteId>,
}

/// Analysis of one baseline/swap piece pair. Derived on demand, never stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PiecePairAnalysis {
    pub piece1_index: usize,
    pub piece2_index: usize,
    pub boat1_name: String,
    pub boat2_name: String,
    pub margin1: f64,
    pub margin2: f64,
    pub swing: f64,
    pub performance_diff: f64,
    pub swapped_athletes: Vec<SwappedAthlete>,
    pub unchanged_athletes: Vec<AthleteId>,
    pub interpretation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_type_round_trips_through_strings() {
        for rt in [
            RatingType::Combined,
            RatingType::CombinedSide(Side::Port),
            RatingType::CombinedSide(Side::Starboard),
            RatingType::CombinedSide(Side::Cox),
        ] {
            assert_eq!(RatingType::parse(rt.as_str()), Some(rt));
        }
        assert_eq!(RatingType::parse("combined_bow"), None);
    }

    #[test]
    fn adjusted_time_subtracts_handicap() {
        let boat = Boat {
            name: "A".to_string(),
            finish_time_seconds: Some(360.0),
            handicap_seconds: 4.5,
            athletes: vec![],
        };
        assert_eq!(boat.adjusted_time(), Some(355.5));
    }

    #[test]
    fn adjusted_time_is_none_without_finish() {
        let boat = Boat {
            name: "A".to_string(),
            finish_time_seconds: None,
            handicap_seconds: 4.5,
            athletes: vec![],
        };
        assert_eq!(boat.adjusted_time(), None);
    }
}
