use chrono::NaiveDateTime;

use crate::domain::Side;

#[derive(Debug, Clone)]
pub struct DbAthlete {
    pub id: i64,
    pub team_id: i64,
    pub name: String,
    pub side: Option<Side>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct DbSession {
    pub id: i64,
    pub team_id: i64,
    pub date: NaiveDateTime,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct DbPiece {
    pub id: i64,
    pub session_id: i64,
    pub sequence_order: i32,
}

#[derive(Debug, Clone)]
pub struct DbBoat {
    pub id: i64,
    pub piece_id: i64,
    pub name: String,
    pub finish_time_seconds: Option<f64>,
    pub handicap_seconds: f64,
}

#[derive(Debug, Clone)]
pub struct DbRating {
    pub id: i64,
    pub athlete_id: i64,
    pub team_id: i64,
    pub rating_type: String,
    pub rating_value: f64,
    pub races_count: i64,
    pub confidence_score: f64,
    pub last_calculated_at: NaiveDateTime,
    pub created_at: Option<NaiveDateTime>,
}

/// One row of a team ranking query, before ranks are assigned.
#[derive(Debug, Clone)]
pub struct RankedAthleteRow {
    pub athlete_id: i64,
    pub athlete_name: String,
    pub rating_value: f64,
    pub races_count: i64,
    pub confidence_score: f64,
    pub last_calculated_at: NaiveDateTime,
}
