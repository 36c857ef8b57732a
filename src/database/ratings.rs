use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{DbRating, RankedAthleteRow};

// These functions take a bare `Connection` rather than a pooled `DbConn` so
// the rating engine can run them inside a transaction; a two-athlete update
// must be both-or-neither.

const RATING_COLUMNS: &str = "id, athlete_id, team_id, rating_type, rating_value, races_count, confidence_score, last_calculated_at, created_at";

pub fn find(
    conn: &Connection,
    athlete_id: i64,
    rating_type: &str,
) -> Result<Option<DbRating>> {
    let sql = format!(
        "SELECT {RATING_COLUMNS} FROM athlete_ratings WHERE athlete_id = ?1 AND rating_type = ?2"
    );

    conn.query_row(&sql, params![athlete_id, rating_type], parse_rating_row)
        .optional()
        .context("Failed to query athlete rating")
}

pub fn insert(
    conn: &Connection,
    athlete_id: i64,
    team_id: i64,
    rating_type: &str,
    rating_value: f64,
    calculated_at: NaiveDateTime,
) -> Result<DbRating> {
    let sql = format!(
        "INSERT INTO athlete_ratings (athlete_id, team_id, rating_type, rating_value, races_count, confidence_score, last_calculated_at) \
         VALUES (?1, ?2, ?3, ?4, 0, 0, ?5) RETURNING {RATING_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![athlete_id, team_id, rating_type, rating_value, calculated_at],
        parse_rating_row,
    )
    .context("Failed to insert athlete rating")
}

pub fn update_values(
    conn: &Connection,
    rating_id: i64,
    rating_value: f64,
    races_count: i64,
    confidence_score: f64,
    calculated_at: NaiveDateTime,
) -> Result<()> {
    let sql = "UPDATE athlete_ratings SET rating_value = ?1, races_count = ?2, confidence_score = ?3, last_calculated_at = ?4 WHERE id = ?5";

    let updated = conn
        .execute(
            sql,
            params![rating_value, races_count, confidence_score, calculated_at, rating_id],
        )
        .context("Failed to update athlete rating")?;

    anyhow::ensure!(updated == 1, "Rating row {} not found for update", rating_id);
    Ok(())
}

pub fn delete_for_team(conn: &Connection, team_id: i64, rating_type: &str) -> Result<usize> {
    conn.execute(
        "DELETE FROM athlete_ratings WHERE team_id = ?1 AND rating_type = ?2",
        params![team_id, rating_type],
    )
    .context("Failed to delete team ratings")
}

/// Team rankings, best rating first. Ties keep insertion order (row id), the
/// store's natural ordering.
pub fn team_rankings(
    conn: &Connection,
    team_id: i64,
    rating_type: &str,
    min_races: i64,
) -> Result<Vec<RankedAthleteRow>> {
    let sql = "SELECT r.athlete_id, a.name, r.rating_value, r.races_count, r.confidence_score, r.last_calculated_at \
               FROM athlete_ratings r JOIN athletes a ON a.id = r.athlete_id \
               WHERE r.team_id = ?1 AND r.rating_type = ?2 AND r.races_count >= ?3 \
               ORDER BY r.rating_value DESC, r.id ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![team_id, rating_type, min_races], |row| {
            Ok(RankedAthleteRow {
                athlete_id: row.get(0)?,
                athlete_name: row.get(1)?,
                rating_value: row.get(2)?,
                races_count: row.get(3)?,
                confidence_score: row.get(4)?,
                last_calculated_at: row.get(5)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// All side-qualified rating rows for one athlete.
pub fn side_ratings_for_athlete(conn: &Connection, athlete_id: i64) -> Result<Vec<DbRating>> {
    let sql = format!(
        "SELECT {RATING_COLUMNS} FROM athlete_ratings \
         WHERE athlete_id = ?1 AND rating_type != 'combined' ORDER BY rating_type"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![athlete_id], parse_rating_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_rating_row(row: &rusqlite::Row) -> rusqlite::Result<DbRating> {
    Ok(DbRating {
        id: row.get(0)?,
        athlete_id: row.get(1)?,
        team_id: row.get(2)?,
        rating_type: row.get(3)?,
        rating_value: row.get(4)?,
        races_count: row.get(5)?,
        confidence_score: row.get(6)?,
        last_calculated_at: row.get(7)?,
        created_at: row.get(8)?,
    })
}
