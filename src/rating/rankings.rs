use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Serialize;

use crate::database::ratings;
use crate::domain::{AthleteId, RatingType, Side, TeamId};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub rank: usize,
    pub athlete_id: AthleteId,
    pub athlete_name: String,
    pub rating_value: f64,
    pub races_count: i64,
    pub confidence_score: f64,
    pub last_calculated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SideRatingEntry {
    pub rating_type: String,
    pub rating_value: f64,
    pub races_count: i64,
    pub confidence_score: f64,
    pub last_calculated_at: NaiveDateTime,
}

/// Team rankings for one rating series, best first, 1-based ranks. Ties
/// keep the store's insertion order.
pub fn get_team_rankings(
    conn: &Connection,
    team_id: TeamId,
    rating_type: RatingType,
    min_races: i64,
) -> Result<Vec<RankingEntry>> {
    let rows = ratings::team_rankings(conn, team_id, rating_type.as_str(), min_races)
        .context("Failed to load team rankings")?;

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| RankingEntry {
            rank: i + 1,
            athlete_id: row.athlete_id,
            athlete_name: row.athlete_name,
            rating_value: row.rating_value,
            races_count: row.races_count,
            confidence_score: row.confidence_score,
            last_calculated_at: row.last_calculated_at,
        })
        .collect())
}

/// Rankings over the side-qualified series only; athletes without a rating
/// record for that side are absent entirely.
pub fn get_team_rankings_by_side(
    conn: &Connection,
    team_id: TeamId,
    side: Side,
) -> Result<Vec<RankingEntry>> {
    get_team_rankings(conn, team_id, RatingType::CombinedSide(side), 0)
}

/// Every side-qualified rating series one athlete has accumulated.
pub fn get_athlete_side_ratings(
    conn: &Connection,
    athlete_id: AthleteId,
) -> Result<Vec<SideRatingEntry>> {
    let rows = ratings::side_ratings_for_athlete(conn, athlete_id)
        .context("Failed to load athlete side ratings")?;

    Ok(rows
        .into_iter()
        .map(|row| SideRatingEntry {
            rating_type: row.rating_type,
            rating_value: row.rating_value,
            races_count: row.races_count,
            confidence_score: row.confidence_score,
            last_calculated_at: row.last_calculated_at,
        })
        .collect())
}
