use anyhow::{Context, Result};
use rusqlite::params;

use super::connection::DbConn;
use crate::rating::GameAdjustment;

/// `sequence` is the ledger position and fixes replay order
pub fn insert_adjustment(conn: &mut DbConn, sequence: usize, adjustment: &GameAdjustment) -> Result<()> {
    let sql = "INSERT INTO adjustments (sequence, game_id, date, home_team, away_team, home_rating_before, home_rating_after, away_rating_before, away_rating_after, projected_spread, closing_spread, line_movement, is_neutral_site) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)";

    conn.execute(
        sql,
        params![
            sequence as i64,
            adjustment.game_id,
            adjustment.date,
            adjustment.home_team,
            adjustment.away_team,
            adjustment.home_rating_before,
            adjustment.home_rating_after,
            adjustment.away_rating_before,
            adjustment.away_rating_after,
            adjustment.projected_spread,
            adjustment.closing_spread,
            adjustment.line_movement,
            adjustment.is_neutral_site
        ],
    )
    .with_context(|| format!("Failed to insert adjustment for game {}", adjustment.game_id))
    .map(|_| ())
}

fn parse_adjustment_row(row: &rusqlite::Row) -> rusqlite::Result<GameAdjustment> {
    Ok(GameAdjustment {
        game_id: row.get(0)?,
        date: row.get(1)?,
        home_team: row.get(2)?,
        away_team: row.get(3)?,
        home_rating_before: row.get(4)?,
        home_rating_after: row.get(5)?,
        away_rating_before: row.get(6)?,
        away_rating_after: row.get(7)?,
        projected_spread: row.get(8)?,
        closing_spread: row.get(9)?,
        line_movement: row.get(10)?,
        is_neutral_site: row.get(11)?,
    })
}

/// Ledger in replay order
pub fn list_adjustments(conn: &mut DbConn) -> Result<Vec<GameAdjustment>> {
    let sql = "SELECT game_id, date, home_team, away_team, home_rating_before, home_rating_after, away_rating_before, away_rating_after, projected_spread, closing_spread, line_movement, is_neutral_site FROM adjustments ORDER BY sequence ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_adjustment_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
