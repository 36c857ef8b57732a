use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::AppState;
use crate::analysis::analyze_session;
use crate::api::models::SessionAnalysisResponse;
use crate::database::sessions;

pub async fn get_session_analysis(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<i64>,
) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let session = match sessions::find_by_id(&mut conn, session_id) {
        Ok(Some(session)) => session,
        Ok(None) => return (StatusCode::NOT_FOUND, "Session not found").into_response(),
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    };

    let results = analyze_session(&session, &state.config.analysis);

    Json(SessionAnalysisResponse {
        session_id,
        results,
    })
    .into_response()
}
