use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::{DbBoat, DbPiece, DbSession};
use crate::domain::{Boat, Piece, Session};

pub fn insert_session(conn: &mut DbConn, team_id: i64, date: NaiveDateTime) -> Result<DbSession> {
    let sql = "INSERT INTO sessions (team_id, date) VALUES (?1, ?2) RETURNING id, team_id, date, created_at";

    conn.query_row(sql, params![team_id, date], |row| {
        Ok(DbSession {
            id: row.get(0)?,
            team_id: row.get(1)?,
            date: row.get(2)?,
            created_at: row.get(3)?,
        })
    })
    .context("Failed to insert session")
}

pub fn insert_piece(conn: &mut DbConn, session_id: i64, sequence_order: i32) -> Result<DbPiece> {
    let sql = "INSERT INTO pieces (session_id, sequence_order) VALUES (?1, ?2) RETURNING id, session_id, sequence_order";

    conn.query_row(sql, params![session_id, sequence_order], |row| {
        Ok(DbPiece {
            id: row.get(0)?,
            session_id: row.get(1)?,
            sequence_order: row.get(2)?,
        })
    })
    .context("Failed to insert piece")
}

pub fn insert_boat(
    conn: &mut DbConn,
    piece_id: i64,
    name: &str,
    finish_time_seconds: Option<f64>,
    handicap_seconds: f64,
) -> Result<DbBoat> {
    let sql = "INSERT INTO boats (piece_id, name, finish_time_seconds, handicap_seconds) VALUES (?1, ?2, ?3, ?4) RETURNING id, piece_id, name, finish_time_seconds, handicap_seconds";

    conn.query_row(
        sql,
        params![piece_id, name, finish_time_seconds, handicap_seconds],
        |row| {
            Ok(DbBoat {
                id: row.get(0)?,
                piece_id: row.get(1)?,
                name: row.get(2)?,
                finish_time_seconds: row.get(3)?,
                handicap_seconds: row.get(4)?,
            })
        },
    )
    .context("Failed to insert boat")
}

pub fn insert_assignment(conn: &mut DbConn, boat_id: i64, athlete_id: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO assignments (boat_id, athlete_id) VALUES (?1, ?2)",
        params![boat_id, athlete_id],
    )
    .context("Failed to insert assignment")?;
    Ok(())
}

/// Loads every session for a team with its full piece/boat/assignment graph,
/// ordered by session date ascending. The recalculation engine depends on
/// this ordering: ratings are path-dependent.
pub fn list_for_team(conn: &mut DbConn, team_id: i64) -> Result<Vec<Session>> {
    let sql = "SELECT id, team_id, date FROM sessions WHERE team_id = ?1 ORDER BY date ASC, id ASC";

    let headers: Vec<(i64, i64, NaiveDateTime)> = {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params![team_id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows
    };

    let mut sessions = Vec::with_capacity(headers.len());
    for (id, team_id, date) in headers {
        sessions.push(Session {
            id,
            team_id,
            date,
            pieces: load_pieces(conn, id)?,
        });
    }

    Ok(sessions)
}

pub fn find_by_id(conn: &mut DbConn, session_id: i64) -> Result<Option<Session>> {
    let sql = "SELECT id, team_id, date FROM sessions WHERE id = ?1";

    let header: Option<(i64, i64, NaiveDateTime)> = conn
        .query_row(sql, params![session_id], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })
        .optional()
        .context("Failed to query session by id")?;

    match header {
        Some((id, team_id, date)) => Ok(Some(Session {
            id,
            team_id,
            date,
            pieces: load_pieces(conn, id)?,
        })),
        None => Ok(None),
    }
}

fn load_pieces(conn: &mut DbConn, session_id: i64) -> Result<Vec<Piece>> {
    let sql = "SELECT id, sequence_order FROM pieces WHERE session_id = ?1 ORDER BY sequence_order ASC";

    let pieces: Vec<(i64, i32)> = {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params![session_id], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows
    };

    let mut result = Vec::with_capacity(pieces.len());
    for (piece_id, sequence_order) in pieces {
        result.push(Piece {
            sequence_order,
            boats: load_boats(conn, piece_id)?,
        });
    }

    Ok(result)
}

fn load_boats(conn: &mut DbConn, piece_id: i64) -> Result<Vec<Boat>> {
    let sql = "SELECT id, name, finish_time_seconds, handicap_seconds FROM boats WHERE piece_id = ?1 ORDER BY id";

    let boats: Vec<(i64, String, Option<f64>, f64)> = {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params![piece_id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows
    };

    let mut result = Vec::with_capacity(boats.len());
    for (boat_id, name, finish_time_seconds, handicap_seconds) in boats {
        result.push(Boat {
            name,
            finish_time_seconds,
            handicap_seconds,
            athletes: load_assignments(conn, boat_id)?,
        });
    }

    Ok(result)
}

fn load_assignments(conn: &mut DbConn, boat_id: i64) -> Result<Vec<i64>> {
    let sql = "SELECT athlete_id FROM assignments WHERE boat_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![boat_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
