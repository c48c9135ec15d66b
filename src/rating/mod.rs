pub mod engine;
pub mod errors;
pub mod store;
pub mod sync_log;
pub mod types;

pub use engine::{ApplyOutcome, RatingEngine, RecalculationSummary};
pub use errors::{DataError, RatingError};
pub use store::RatingStore;
pub use sync_log::{SyncLog, SyncLogEntry, SyncStatus};
pub use types::{GameAdjustment, RatingsSnapshot, TeamRating};
