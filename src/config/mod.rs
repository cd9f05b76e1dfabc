//! Configuration module for Book Finder
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// Load settings from the first settings file found, or use defaults.
/// Environment variables are merged on top in every case.
pub fn load() -> Result<Settings> {
    // Check environment variable first
    if let Ok(path) = std::env::var("BOOK_FINDER_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            return load_from(path);
        }
    }

    let paths = [
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/book-finder/settings.yml"),
        dirs::config_dir()
            .map(|p| p.join("book-finder/settings.yml"))
            .unwrap_or_default(),
    ];

    for path in paths {
        if path.is_file() {
            return load_from(path);
        }
    }

    info!("No settings file found, using defaults");
    let mut settings = Settings::default();
    settings.merge_env();
    Ok(settings)
}

fn load_from(path: PathBuf) -> Result<Settings> {
    info!("Loading settings from: {}", path.display());
    let mut settings = Settings::from_file(&path)?;
    settings.merge_env();
    Ok(settings)
}
