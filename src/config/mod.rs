pub mod settings;

pub use settings::{AppConfig, BracketSettings, RatingSettings, StorageSettings};
