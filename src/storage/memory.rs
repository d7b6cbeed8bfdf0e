use std::cell::RefCell;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use super::{merge_over_defaults, settings_entries, SettingsStore};
use crate::settings::Settings;

/// Keeps the saved object as a JSON map in memory, for ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: RefCell<Option<Map<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a previously persisted blob, which may be missing fields.
    pub fn with_blob(blob: &str) -> Result<Self> {
        let map: Map<String, Value> =
            serde_json::from_str(blob).context("settings blob must be a JSON object")?;
        Ok(Self {
            saved: RefCell::new(Some(map)),
        })
    }

    pub fn saved_blob(&self) -> Option<Value> {
        self.saved.borrow().clone().map(Value::Object)
    }
}

impl SettingsStore for MemoryStore {
    fn load_settings(&self) -> Result<Settings> {
        Ok(self
            .saved
            .borrow()
            .clone()
            .map(merge_over_defaults)
            .unwrap_or_default())
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        *self.saved.borrow_mut() = Some(settings_entries(settings)?);
        Ok(())
    }
}
