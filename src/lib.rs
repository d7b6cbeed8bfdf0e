//! Settings store and editor for a command palette: scalar preferences plus
//! user-defined command macros, persisted in sqlite.

pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod picker;
pub mod registry;
pub mod settings;
pub mod storage;
pub mod view;

use anyhow::Context;

pub use editor::{Edit, RenderState, SettingsEditor};
pub use error::EditorError;
pub use registry::{Command, CommandRegistry, StaticRegistry};
pub use settings::{HotkeyStyle, Macro, Settings, SUGGESTION_LIMITS};
pub use storage::{MemoryStore, SettingsStore, Storage};
pub use view::{render, render_text, SettingsView};

/// Opens the settings database at the configured location and prints the panel.
pub fn run() -> anyhow::Result<()> {
    logging::init();

    let db_path = config::db_path()?;
    let storage = Storage::open(&db_path)?;
    let editor = SettingsEditor::open(storage, StaticRegistry::default())
        .context("failed to open settings editor")?;

    print!("{}", render_text(editor.view()));
    Ok(())
}
