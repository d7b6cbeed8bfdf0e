use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// Allowed values for the suggestion limit dropdown, in display order.
pub const SUGGESTION_LIMITS: [u32; 7] = [10, 20, 50, 100, 200, 500, 1000];

pub const DEFAULT_MACRO_DELAY_MS: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotkeyStyle {
    #[default]
    Auto,
    Mac,
    Windows,
}

impl HotkeyStyle {
    pub const ALL: [HotkeyStyle; 3] = [HotkeyStyle::Auto, HotkeyStyle::Mac, HotkeyStyle::Windows];

    pub fn token(self) -> &'static str {
        match self {
            HotkeyStyle::Auto => "auto",
            HotkeyStyle::Mac => "mac",
            HotkeyStyle::Windows => "windows",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HotkeyStyle::Auto => "Auto Detect",
            HotkeyStyle::Mac => "Force Mac Hotkeys",
            HotkeyStyle::Windows => "Force Windows Hotkeys",
        }
    }
}

impl fmt::Display for HotkeyStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for HotkeyStyle {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HotkeyStyle::ALL
            .into_iter()
            .find(|style| style.token() == s)
            .ok_or_else(|| EditorError::InvalidHotkeyStyle(s.to_string()))
    }
}

/// A named group of commands run in order with `delay` milliseconds between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Macro {
    pub name: String,
    pub command_ids: Vec<String>,
    /// `None` when the last committed delay text did not parse.
    pub delay: Option<u64>,
}

impl Macro {
    /// New empty macro named after its 1-based position at creation time.
    pub fn numbered(position: usize) -> Self {
        Self {
            name: format!("Macro {position}"),
            command_ids: Vec::new(),
            delay: Some(DEFAULT_MACRO_DELAY_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub close_with_backspace: bool,
    pub file_search_prefix: String,
    pub tag_search_prefix: String,
    pub suggestion_limit: u32,
    pub recent_above_pinned: bool,
    pub hyper_key_override: bool,
    pub macros: Vec<Macro>,
    pub hotkey_style: HotkeyStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            close_with_backspace: true,
            file_search_prefix: "/".to_string(),
            tag_search_prefix: "#".to_string(),
            suggestion_limit: 50,
            recent_above_pinned: false,
            hyper_key_override: false,
            macros: Vec::new(),
            hotkey_style: HotkeyStyle::Auto,
        }
    }
}

pub fn is_suggestion_limit(value: u32) -> bool {
    SUGGESTION_LIMITS.contains(&value)
}

/// Parses a dropdown display string such as `"100"` into a permitted limit.
pub fn parse_suggestion_limit(display: &str) -> Result<u32, EditorError> {
    display
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|v| is_suggestion_limit(*v))
        .ok_or_else(|| EditorError::InvalidSuggestionLimit(display.to_string()))
}

/// Parses committed delay text. Anything that is not an unsigned decimal
/// integer yields `None`, which is stored and flagged rather than rejected.
pub fn parse_delay(text: &str) -> Option<u64> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<u64>().ok()
}
