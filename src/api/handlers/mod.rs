use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use serde::Deserialize;

use crate::config::settings::AppConfig;

pub mod admin;
pub mod rankings;
pub mod seat_races;
pub mod sessions;

pub struct AppState {
    pub pool: Pool<SqliteConnectionManager>,
    pub config: AppConfig,
    /// Recalculation is destructive per (team, rating type) and must never
    /// run twice concurrently.
    pub recalculation_lock: tokio::sync::Mutex<()>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingParams {
    pub rating_type: Option<String>,
    pub min_races: Option<i64>,
}
