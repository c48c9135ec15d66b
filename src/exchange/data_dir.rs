use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory of JSON exchange files shared with external collaborators.
///
/// Inputs (game feed, initial ratings, overrides, seeds) are read from
/// here and snapshots/logs/brackets are written back.
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub const INITIAL_RATINGS: &'static str = "initial_ratings";
    pub const GAMES: &'static str = "games";
    pub const NAME_OVERRIDES: &'static str = "name_overrides";
    pub const SEEDS: &'static str = "seeds";
    pub const TEMPLATES: &'static str = "templates";
    pub const SNAPSHOT: &'static str = "snapshot";
    pub const SYNC_LOG: &'static str = "sync_log";
    pub const BRACKET: &'static str = "bracket";

    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).context("Failed to create data directory")?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self, key: &str) -> bool {
        self.build_path(key).exists()
    }

    pub fn save<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        let file_path = self.build_path(key);
        self.write_json(&file_path, data)?;
        info!("Saved {}", file_path.display());
        Ok(())
    }

    pub fn load<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>> {
        let file_path = self.build_path(key);
        self.read_json_opt(&file_path)
    }

    /// Like `load`, but a missing file is an error
    pub fn require<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<T> {
        self.load(key)?
            .ok_or_else(|| anyhow::anyhow!("Missing {}", self.build_path(key).display()))
    }

    fn build_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        fs::write(path, json).context("Failed to write data file")?;
        Ok(())
    }

    fn read_json_opt<T: for<'de> Deserialize<'de>>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(path)?;
        let data = serde_json::from_str(&json).with_context(|| {
            format!(
                "Failed to parse JSON from {:?}. First 200 chars: {}",
                path,
                json.chars().take(200).collect::<String>()
            )
        })?;
        Ok(Some(data))
    }
}
