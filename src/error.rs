use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("command not found: {id}")]
    CommandNotFound { id: String },
    #[error("macro index {index} out of range ({len} macros)")]
    MacroOutOfRange { index: usize, len: usize },
    #[error("command position {position} out of range ({len} commands)")]
    CommandOutOfRange { position: usize, len: usize },
    #[error("invalid suggestion limit: {0}")]
    InvalidSuggestionLimit(String),
    #[error("invalid hotkey style: {0}")]
    InvalidHotkeyStyle(String),
    /// Settings could not be read; nothing was changed.
    #[error("failed to load settings")]
    Load(#[source] anyhow::Error),
    /// The edit is applied in memory but not yet on disk.
    #[error("failed to save settings")]
    Persist(#[source] anyhow::Error),
}
