use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    admin::admin_recalculate,
    rankings::{get_athlete_side_ratings, get_team_rankings, get_team_rankings_by_side},
    seat_races::post_seat_race,
    sessions::get_session_analysis,
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/teams/:team_id/rankings", get(get_team_rankings))
        .route(
            "/api/teams/:team_id/rankings/side/:side",
            get(get_team_rankings_by_side),
        )
        .route(
            "/api/athletes/:athlete_id/side-ratings",
            get(get_athlete_side_ratings),
        )
        .route("/api/sessions/:session_id/analysis", get(get_session_analysis))
        .route("/api/seat-races", post(post_seat_race))
        .route("/api/admin/recalculate/:team_id", post(admin_recalculate))
        .with_state(state)
}
