use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, RankingParams};
use crate::domain::RatingType;
use crate::services::RecalculationService;

/// Full-history rebuild of one rating series. Destructive, so it requires
/// the admin token and only one recalculation may be in flight at a time.
/// The replay is blocking SQLite work, so it runs off the async workers.
pub async fn admin_recalculate(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<i64>,
    Query(params): Query<RankingParams>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let rating_type = match params.rating_type.as_deref() {
        None => RatingType::Combined,
        Some(s) => match RatingType::parse(s) {
            Some(rt) => rt,
            None => {
                return (StatusCode::BAD_REQUEST, format!("Unknown rating type: {}", s))
                    .into_response()
            }
        },
    };

    let Ok(_guard) = state.recalculation_lock.try_lock() else {
        return (StatusCode::CONFLICT, "Recalculation already in progress").into_response();
    };

    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let service = RecalculationService::new(state.config.clone());
    let result =
        tokio::task::spawn_blocking(move || service.run(&mut conn, team_id, rating_type)).await;

    match result {
        Ok(Ok(summary)) => Json(summary).into_response(),
        Ok(Err(e)) => {
            log::error!("Recalculation failed for team {}: {:?}", team_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Recalculation Error: {}", e))
                .into_response()
        }
        Err(e) => {
            log::error!("Recalculation task for team {} panicked: {:?}", team_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Recalculation task failed").into_response()
        }
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    let expected = std::env::var("ADMIN_TOKEN").unwrap_or_else(|_| "secret".to_string());
    let auth_header = headers.get("Authorization").and_then(|h| h.to_str().ok());
    auth_header == Some(format!("Bearer {}", expected).as_str())
}
