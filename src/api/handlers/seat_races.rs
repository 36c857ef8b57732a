use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::AppState;
use crate::api::models::SeatRaceRequest;
use crate::database::athletes;
use crate::domain::RatingType;
use crate::rating::{RatingEngine, SeatRaceOptions};

/// Applies one observed seat-race result.
///
/// With an explicit rating type (or weight) the update goes to that single
/// series; otherwise, when both athletes have a recorded side, the update
/// is side-aware and also feeds the combined series.
pub async fn post_seat_race(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SeatRaceRequest>,
) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let rating_type = match request.rating_type.as_deref() {
        None => None,
        Some(s) => match RatingType::parse(s) {
            Some(rt) => Some(rt),
            None => {
                return (StatusCode::BAD_REQUEST, format!("Unknown rating type: {}", s))
                    .into_response()
            }
        },
    };

    // A negative weight would flip the sign of the exchange; weights live
    // in [0, inf).
    if let Some(weight) = request.weight {
        if !weight.is_finite() || weight < 0.0 {
            return (StatusCode::BAD_REQUEST, format!("Invalid weight: {}", weight))
                .into_response();
        }
    }

    let engine = RatingEngine::new(state.config.rating.clone());

    if rating_type.is_none() && request.weight.is_none() {
        let side_a = match athletes::find_by_id(&mut conn, request.athlete_a_id) {
            Ok(athlete) => athlete.and_then(|a| a.side),
            Err(e) => {
                return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                    .into_response()
            }
        };
        let side_b = match athletes::find_by_id(&mut conn, request.athlete_b_id) {
            Ok(athlete) => athlete.and_then(|a| a.side),
            Err(e) => {
                return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                    .into_response()
            }
        };

        if let (Some(side_a), Some(side_b)) = (side_a, side_b) {
            return match engine.update_ratings_with_side_detection(
                &mut conn,
                request.team_id,
                request.athlete_a_id,
                request.athlete_b_id,
                side_a,
                side_b,
                request.performance_diff_seconds,
            ) {
                Ok(update) => Json(serde_json::json!({
                    "sideA": update.side_a,
                    "sideB": update.side_b,
                    "combined": update.combined,
                }))
                .into_response(),
                Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Update Error: {}", e))
                    .into_response(),
            };
        }
    }

    let options = SeatRaceOptions {
        rating_type: rating_type.unwrap_or(RatingType::Combined),
        weight: request.weight.unwrap_or(1.0),
    };

    match engine.update_ratings_from_seat_race(
        &mut conn,
        request.team_id,
        request.athlete_a_id,
        request.athlete_b_id,
        request.performance_diff_seconds,
        options,
    ) {
        Ok(update) => Json(update).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Update Error: {}", e))
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::AppConfig;
    use crate::database::{connection, setup};
    use axum::http::StatusCode;

    fn test_state() -> Arc<AppState> {
        let pool = connection::create_memory_pool().unwrap();
        {
            let mut conn = connection::get_connection(&pool).unwrap();
            setup::reset_database(&mut conn).unwrap();
            // Athletes 1 and 2 on team 1, satisfying the ratings foreign key.
            athletes::insert(&mut conn, 1, "Athlete 1", None).unwrap();
            athletes::insert(&mut conn, 1, "Athlete 2", None).unwrap();
        }
        Arc::new(AppState {
            pool,
            config: AppConfig::new(),
            recalculation_lock: tokio::sync::Mutex::new(()),
        })
    }

    fn request(weight: Option<f64>) -> SeatRaceRequest {
        SeatRaceRequest {
            team_id: 1,
            athlete_a_id: 1,
            athlete_b_id: 2,
            performance_diff_seconds: 3.0,
            rating_type: Some("combined".to_string()),
            weight,
        }
    }

    #[tokio::test]
    async fn negative_weight_is_a_bad_request() {
        let state = test_state();

        let response = post_seat_race(State(state), Json(request(Some(-0.5))))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_finite_weight_is_a_bad_request() {
        let state = test_state();

        let response = post_seat_race(State(state), Json(request(Some(f64::NAN))))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn zero_weight_is_accepted() {
        let state = test_state();

        let response = post_seat_race(State(state), Json(request(Some(0.0))))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
