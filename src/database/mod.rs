pub mod adjustments;
pub mod connection;
pub mod ratings;
pub mod setup;
pub mod snapshot;
pub mod sync_log;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use snapshot::{load_snapshot, save_snapshot};
