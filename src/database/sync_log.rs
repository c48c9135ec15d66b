use anyhow::{Context, Result};
use rusqlite::params;

use super::connection::DbConn;
use crate::rating::SyncLogEntry;

pub fn insert_entry(conn: &mut DbConn, entry: &SyncLogEntry) -> Result<()> {
    let sql = "INSERT INTO sync_log (game_id, date, home_team, away_team, status, unresolved) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

    conn.execute(
        sql,
        params![
            entry.game_id,
            entry.date,
            entry.home_team,
            entry.away_team,
            entry.status.as_str(),
            entry.unresolved.join("|")
        ],
    )
    .context("Failed to insert sync log entry")
    .map(|_| ())
}

/// `(status, count)` pairs, most frequent first
pub fn count_by_status(conn: &mut DbConn) -> Result<Vec<(String, i64)>> {
    let sql = "SELECT status, COUNT(*) FROM sync_log GROUP BY status ORDER BY COUNT(*) DESC, status ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
