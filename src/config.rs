use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Overrides the settings database location.
pub const DB_PATH_ENV: &str = "PALETTE_SETTINGS_DB";

const APP_DIR: &str = "palette-settings";
const DB_FILE: &str = "settings.db";

pub fn db_path() -> Result<PathBuf> {
    resolve_db_path(std::env::var_os(DB_PATH_ENV), dirs::data_dir())
}

fn resolve_db_path(env_override: Option<OsString>, data_dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = env_override.filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let data_dir = data_dir.context("failed to resolve app data dir")?;
    Ok(data_dir.join(APP_DIR).join(DB_FILE))
}
