use anyhow::{Context, Result};
use log::info;

use super::adjustments::{insert_adjustment, list_adjustments};
use super::connection::DbConn;
use super::ratings::{insert_team_rating, list_team_ratings};
use super::sync_log::insert_entry;
use crate::rating::{RatingsSnapshot, SyncLog};

/// Write ratings, ledger and sync log in one transaction.
///
/// Expects a freshly reset schema.
pub fn save_snapshot(conn: &mut DbConn, snapshot: &RatingsSnapshot, log: &SyncLog) -> Result<()> {
    conn.execute_batch("BEGIN")
        .context("Failed to start export transaction")?;

    match write_all(conn, snapshot, log) {
        Ok(()) => {
            conn.execute_batch("COMMIT")
                .context("Failed to commit export transaction")?;
        }
        Err(e) => {
            conn.execute_batch("ROLLBACK").ok();
            return Err(e);
        }
    }

    info!(
        "  → Exported {} ratings, {} adjustments, {} log entries",
        snapshot.ratings.len(),
        snapshot.adjustments.len(),
        log.len()
    );
    Ok(())
}

fn write_all(conn: &mut DbConn, snapshot: &RatingsSnapshot, log: &SyncLog) -> Result<()> {
    for team in &snapshot.ratings {
        insert_team_rating(conn, team)?;
    }
    for (sequence, adjustment) in snapshot.adjustments.iter().enumerate() {
        insert_adjustment(conn, sequence, adjustment)?;
    }
    for entry in log.entries() {
        insert_entry(conn, entry)?;
    }
    Ok(())
}

pub fn load_snapshot(conn: &mut DbConn) -> Result<RatingsSnapshot> {
    let ratings = list_team_ratings(conn)?;
    let adjustments = list_adjustments(conn)?;

    Ok(RatingsSnapshot {
        games_processed: adjustments.len(),
        ratings,
        adjustments,
    })
}
