use anyhow::{Context, Result};
use rusqlite::params;

use super::connection::DbConn;
use crate::rating::TeamRating;

pub fn insert_team_rating(conn: &mut DbConn, team: &TeamRating) -> Result<()> {
    let sql = "INSERT INTO team_ratings (team_name, conference, rating, initial_rating, games_processed) VALUES (?1, ?2, ?3, ?4, ?5)";

    conn.execute(
        sql,
        params![
            team.team_name,
            team.conference,
            team.rating,
            team.initial_rating,
            team.games_processed
        ],
    )
    .with_context(|| format!("Failed to insert rating for {}", team.team_name))
    .map(|_| ())
}

fn parse_team_rating_row(row: &rusqlite::Row) -> rusqlite::Result<TeamRating> {
    Ok(TeamRating {
        team_name: row.get(0)?,
        conference: row.get(1)?,
        rating: row.get(2)?,
        initial_rating: row.get(3)?,
        games_processed: row.get(4)?,
    })
}

/// Highest rating first
pub fn list_team_ratings(conn: &mut DbConn) -> Result<Vec<TeamRating>> {
    let sql = "SELECT team_name, conference, rating, initial_rating, games_processed FROM team_ratings ORDER BY rating DESC, team_name ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_team_rating_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
