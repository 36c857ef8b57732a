use serde::{Deserialize, Serialize};

use crate::domain::PiecePairAnalysis;
use crate::rating::rankings::{RankingEntry, SideRatingEntry};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingsResponse {
    pub team_id: i64,
    pub rating_type: String,
    pub rankings: Vec<RankingEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SideRatingsResponse {
    pub athlete_id: i64,
    pub ratings: Vec<SideRatingEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAnalysisResponse {
    pub session_id: i64,
    pub results: Vec<PiecePairAnalysis>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatRaceRequest {
    pub team_id: i64,
    pub athlete_a_id: i64,
    pub athlete_b_id: i64,
    /// Positive means athlete A was faster, in seconds.
    pub performance_diff_seconds: f64,
    /// Explicit rating series; when omitted, sides recorded on both
    /// athletes trigger a side-aware update.
    pub rating_type: Option<String>,
    pub weight: Option<f64>,
}
