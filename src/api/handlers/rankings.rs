use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, RankingParams};
use crate::api::models::{RankingsResponse, SideRatingsResponse};
use crate::domain::{RatingType, Side};
use crate::rating::rankings;

pub async fn get_team_rankings(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<i64>,
    Query(params): Query<RankingParams>,
) -> impl IntoResponse {
    let rating_type = match parse_rating_type(params.rating_type.as_deref()) {
        Ok(rt) => rt,
        Err(response) => return response,
    };
    let min_races = params.min_races.unwrap_or(0);

    let conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match rankings::get_team_rankings(&conn, team_id, rating_type, min_races) {
        Ok(entries) => Json(RankingsResponse {
            team_id,
            rating_type: rating_type.as_str().to_string(),
            rankings: entries,
        })
        .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e)).into_response(),
    }
}

pub async fn get_team_rankings_by_side(
    State(state): State<Arc<AppState>>,
    Path((team_id, side)): Path<(i64, String)>,
) -> impl IntoResponse {
    let Some(side) = Side::parse(&side) else {
        return (StatusCode::BAD_REQUEST, format!("Unknown side: {}", side)).into_response();
    };

    let conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match rankings::get_team_rankings_by_side(&conn, team_id, side) {
        Ok(entries) => Json(RankingsResponse {
            team_id,
            rating_type: RatingType::CombinedSide(side).as_str().to_string(),
            rankings: entries,
        })
        .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e)).into_response(),
    }
}

pub async fn get_athlete_side_ratings(
    State(state): State<Arc<AppState>>,
    Path(athlete_id): Path<i64>,
) -> impl IntoResponse {
    let conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match rankings::get_athlete_side_ratings(&conn, athlete_id) {
        Ok(ratings) => Json(SideRatingsResponse {
            athlete_id,
            ratings,
        })
        .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e)).into_response(),
    }
}

fn parse_rating_type(raw: Option<&str>) -> Result<RatingType, axum::response::Response> {
    match raw {
        None => Ok(RatingType::Combined),
        Some(s) => RatingType::parse(s).ok_or_else(|| {
            (StatusCode::BAD_REQUEST, format!("Unknown rating type: {}", s)).into_response()
        }),
    }
}
