use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::{AthleteId, RatingType, TeamId};

/// One athlete's rating record for one rating series.
#[derive(Debug, Clone)]
pub struct AthleteRating {
    pub athlete_id: AthleteId,
    pub team_id: TeamId,
    pub rating_type: RatingType,
    pub rating_value: f64,
    pub races_count: i64,
    pub confidence_score: f64,
    pub last_calculated_at: NaiveDateTime,
}

/// One athlete's half of a rating update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteUpdate {
    pub athlete_id: AthleteId,
    pub old_rating: f64,
    pub new_rating: f64,
    pub races_count: i64,
    pub confidence_score: f64,
}

/// Outcome of one two-athlete rating update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingsUpdate {
    pub athlete_a: AthleteUpdate,
    pub athlete_b: AthleteUpdate,
    pub performance_diff: f64,
    pub margin_factor: f64,
    pub adjusted_k: f64,
}
