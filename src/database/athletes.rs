use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::DbAthlete;
use crate::domain::Side;

pub fn insert(
    conn: &mut DbConn,
    team_id: i64,
    name: &str,
    side: Option<Side>,
) -> Result<DbAthlete> {
    let sql = "INSERT INTO athletes (team_id, name, side) VALUES (?1, ?2, ?3) RETURNING id, team_id, name, side, created_at";

    conn.query_row(
        sql,
        params![team_id, name, side.map(|s| s.as_str())],
        parse_athlete_row,
    )
    .context("Failed to insert athlete")
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<DbAthlete>> {
    let sql = "SELECT id, team_id, name, side, created_at FROM athletes WHERE id = ?1";

    conn.query_row(sql, params![id], parse_athlete_row)
        .optional()
        .context("Failed to query athlete by id")
}

pub fn list_for_team(conn: &mut DbConn, team_id: i64) -> Result<Vec<DbAthlete>> {
    let sql = "SELECT id, team_id, name, side, created_at FROM athletes WHERE team_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![team_id], parse_athlete_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_athlete_row(row: &rusqlite::Row) -> rusqlite::Result<DbAthlete> {
    let side: Option<String> = row.get(3)?;
    Ok(DbAthlete {
        id: row.get(0)?,
        team_id: row.get(1)?,
        name: row.get(2)?,
        side: side.as_deref().and_then(Side::parse),
        created_at: row.get(4)?,
    })
}
