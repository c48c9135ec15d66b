use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RatingSettings {
    /// Points added to the home side's differential on non-neutral sites
    pub home_advantage: f64,
    /// Fraction of the market discrepancy absorbed per game, split evenly
    pub learning_rate: f64,
    /// Allow prefix / mascot-stripped name matching after exact tiers
    pub fuzzy_name_matching: bool,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            home_advantage: 3.0,
            learning_rate: 0.1,
            fuzzy_name_matching: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BracketSettings {
    /// Passed through to spread projection; tournament games are neutral
    pub home_advantage: f64,
}

impl Default for BracketSettings {
    fn default() -> Self {
        Self {
            home_advantage: 3.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
    pub database_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            database_path: "power_ratings.db".to_string(),
        }
    }
}

impl StorageSettings {
    /// Defaults overridden by `DATA_DIR` / `DATABASE_PATH`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            database_path: std::env::var("DATABASE_PATH").unwrap_or(defaults.database_path),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rating: RatingSettings,
    pub bracket: BracketSettings,
    pub storage: StorageSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            rating: RatingSettings::default(),
            bracket: BracketSettings::default(),
            storage: StorageSettings::from_env(),
        }
    }
}
