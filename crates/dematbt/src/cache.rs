use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use dematbt_core::ExtractionResult;
use serde::{Deserialize, Serialize};

use crate::prelude::{println, *};

/// File holding the last successful extraction.
pub const CACHE_KEY: &str = "dematbt_tg_state_v1.json";

#[derive(Debug, clap::Parser)]
#[command(name = "cache")]
#[command(about = "Manage the local result cache")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Remove the cached extraction
    Clear,
    /// Print the cache file location
    Path,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub file_name: String,
    pub extracted_at: DateTime<Utc>,
    pub result: ExtractionResult,
}

impl CacheEntry {
    pub fn new(file_name: impl Into<String>, result: ExtractionResult) -> Self {
        Self {
            file_name: file_name.into(),
            extracted_at: Utc::now(),
            result,
        }
    }
}

/// Directory for the cache file, `<user cache>/dematbt`.
pub fn cache_dir() -> Result<PathBuf> {
    let dir = dirs_next::cache_dir()
        .ok_or_else(|| Error::Cache("Unable to determine cache directory".into()))?
        .join("dematbt");
    Ok(dir)
}

pub fn save_in(dir: &Path, entry: &CacheEntry) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .map_err(|e| Error::Cache(f!("Failed to create {}: {}", dir.display(), e)))?;

    let path = dir.join(CACHE_KEY);
    let json = serde_json::to_string_pretty(entry)?;
    fs::write(&path, json)
        .map_err(|e| Error::Cache(f!("Failed to write {}: {}", path.display(), e)))?;

    Ok(path)
}

/// Last cached entry, `None` when nothing was stored yet.
pub fn load_in(dir: &Path) -> Result<Option<CacheEntry>> {
    let path = dir.join(CACHE_KEY);
    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path)
        .map_err(|e| Error::Cache(f!("Failed to read {}: {}", path.display(), e)))?;
    let entry = serde_json::from_str(&json)
        .map_err(|e| Error::Cache(f!("Corrupted cache file {}: {}", path.display(), e)))?;

    Ok(Some(entry))
}

/// Returns whether a file was removed.
pub fn clear_in(dir: &Path) -> Result<bool> {
    let path = dir.join(CACHE_KEY);
    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(&path)
        .map_err(|e| Error::Cache(f!("Failed to remove {}: {}", path.display(), e)))?;
    Ok(true)
}

/// Store a result, logging instead of failing.
pub fn store(entry: &CacheEntry) {
    match cache_dir().and_then(|dir| save_in(&dir, entry)) {
        Ok(path) => log::debug!("cached extraction in {}", path.display()),
        Err(e) => log::warn!("failed to cache extraction: {e}"),
    }
}

pub fn load() -> Result<Option<CacheEntry>> {
    load_in(&cache_dir()?)
}

pub async fn run(app: App, _global: crate::Global) -> Result<()> {
    let dir = cache_dir()?;

    match app.command {
        Commands::Clear => {
            if clear_in(&dir)? {
                println!("Cache cleared.");
            } else {
                println!("Nothing to clear.");
            }
        }
        Commands::Path => println!("{}", dir.join(CACHE_KEY).display()),
    }

    Ok(())
}
