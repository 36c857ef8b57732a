pub mod elo;
pub mod engine;
pub mod rankings;
pub mod types;

pub use elo::{compute_exchange, confidence_score, expected_score, margin_factor};
pub use engine::{RatingEngine, SeatRaceOptions, SideDetectionUpdate};
pub use rankings::{
    get_athlete_side_ratings, get_team_rankings, get_team_rankings_by_side, RankingEntry,
    SideRatingEntry,
};
pub use types::{AthleteRating, AthleteUpdate, RatingsUpdate};
