use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::settings::{is_suggestion_limit, HotkeyStyle, Macro, Settings};

mod memory;

pub use memory::MemoryStore;

/// Persistence collaborator for the settings object. Saves always carry the
/// full object; the last write wins.
pub trait SettingsStore {
    /// Stored values merged over [`Settings::default`].
    fn load_settings(&self) -> Result<Settings>;
    fn save_settings(&self, settings: &Settings) -> Result<()>;
}

impl<T: SettingsStore + ?Sized> SettingsStore for &T {
    fn load_settings(&self) -> Result<Settings> {
        (**self).load_settings()
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        (**self).save_settings(settings)
    }
}

pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("failed to create db parent directory")?;
        }

        let conn = Connection::open(path).context("failed to open sqlite db")?;
        let mut storage = Self { conn };
        storage.run_migrations()?;
        info!(path = %path.display(), "settings storage opened");
        Ok(storage)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory sqlite db")?;
        let mut storage = Self { conn };
        storage.run_migrations()?;
        Ok(storage)
    }

    pub fn run_migrations(&mut self) -> Result<()> {
        self.conn
            .execute_batch(include_str!("migrations/001_init.sql"))
            .context("failed to run migrations")?;
        Ok(())
    }

    pub fn upsert_setting(&self, key: &str, value: &Value) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings(key, value_json) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value_json = excluded.value_json",
            params![key, value.to_string()],
        )?;
        Ok(())
    }

    /// Merges a plugin data blob (camelCase JSON object) over the defaults and
    /// stores the result, replacing whatever was saved before.
    pub fn import_json(&self, blob: &str) -> Result<Settings> {
        let value: Value = serde_json::from_str(blob).context("settings blob is not valid JSON")?;
        let Value::Object(map) = value else {
            anyhow::bail!("settings blob must be a JSON object");
        };
        let settings = merge_over_defaults(map);
        self.save_settings(&settings)?;
        info!(macros = settings.macros.len(), "imported settings blob");
        Ok(settings)
    }

    pub fn export_json(&self) -> Result<String> {
        let settings = self.load_settings()?;
        serde_json::to_string_pretty(&settings).context("failed to encode settings")
    }
}

impl SettingsStore for Storage {
    fn load_settings(&self) -> Result<Settings> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value_json FROM settings")
            .context("failed to prepare settings query")?;

        let rows = stmt.query_map([], |row| {
            let key: String = row.get(0)?;
            let value: String = row.get(1)?;
            Ok((key, value))
        })?;

        let mut stored = Map::new();
        for row in rows {
            let (key, value_json) = row?;
            let value: Value = serde_json::from_str(&value_json).unwrap_or(Value::Null);
            stored.insert(key, value);
        }

        debug!(keys = stored.len(), "loaded stored settings");
        Ok(merge_over_defaults(stored))
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("failed to begin settings transaction")?;
        for (key, value) in settings_entries(settings)? {
            self.upsert_setting(&key, &value)?;
        }
        tx.commit().context("failed to commit settings")?;
        debug!("settings saved");
        Ok(())
    }
}

/// The full settings object as `(field name, value)` pairs.
pub fn settings_entries(settings: &Settings) -> Result<Map<String, Value>> {
    match serde_json::to_value(settings).context("failed to encode settings")? {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("settings did not encode to an object"),
    }
}

pub fn merge_over_defaults(stored: Map<String, Value>) -> Settings {
    let mut settings = Settings::default();
    for (key, value) in stored {
        apply_setting_value(&mut settings, &key, value);
    }
    settings
}

/// Applies one stored value. Values of the wrong shape leave the current
/// value in place; unknown keys are ignored.
pub fn apply_setting_value(settings: &mut Settings, key: &str, value: Value) {
    let applied = match key {
        "closeWithBackspace" => value.as_bool().map(|v| settings.close_with_backspace = v),
        "fileSearchPrefix" => value
            .as_str()
            .map(|v| settings.file_search_prefix = v.to_string()),
        "tagSearchPrefix" => value
            .as_str()
            .map(|v| settings.tag_search_prefix = v.to_string()),
        "suggestionLimit" => value
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| is_suggestion_limit(*v))
            .map(|v| settings.suggestion_limit = v),
        "recentAbovePinned" => value.as_bool().map(|v| settings.recent_above_pinned = v),
        "hyperKeyOverride" => value.as_bool().map(|v| settings.hyper_key_override = v),
        "macros" => value
            .as_array()
            .map(|entries| settings.macros = stored_macros(entries)),
        "hotkeyStyle" => value
            .as_str()
            .and_then(|v| v.parse::<HotkeyStyle>().ok())
            .map(|v| settings.hotkey_style = v),
        _ => {
            debug!(key, "ignoring unknown stored setting");
            return;
        }
    };

    if applied.is_none() {
        warn!(key, %value, "ignoring stored setting with unexpected value");
    }
}

/// Reads stored macros one entry at a time. A delay that is not an unsigned
/// integer becomes `None`; only entries without a usable name are dropped.
fn stored_macros(entries: &[Value]) -> Vec<Macro> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let parsed = stored_macro(entry);
            if parsed.is_none() {
                warn!(index, %entry, "dropping stored macro without a name");
            }
            parsed
        })
        .collect()
}

fn stored_macro(entry: &Value) -> Option<Macro> {
    let name = entry.get("name")?.as_str()?.to_string();
    let command_ids = entry
        .get("commandIds")
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(|id| id.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    let delay = entry.get("delay").and_then(Value::as_u64);
    if delay.is_none() {
        debug!(name = %name, "stored macro delay is invalid");
    }

    Some(Macro {
        name,
        command_ids,
        delay,
    })
}
