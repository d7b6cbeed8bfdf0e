//! Rendering of the settings panel into a toolkit-neutral view tree.

use std::fmt::Write as _;

use serde::Serialize;
use tracing::warn;

use crate::registry::CommandRegistry;
use crate::settings::{HotkeyStyle, Macro, Settings, SUGGESTION_LIMITS};

pub const PANEL_TITLE: &str = "Better Command Palette Settings";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Control {
    Toggle {
        key: &'static str,
        name: &'static str,
        description: &'static str,
        value: bool,
    },
    Text {
        key: &'static str,
        name: &'static str,
        description: &'static str,
        value: String,
    },
    Dropdown {
        key: &'static str,
        name: &'static str,
        description: &'static str,
        options: Vec<(String, String)>,
        selected: String,
    },
    Button {
        key: &'static str,
        name: &'static str,
        description: &'static str,
        label: &'static str,
    },
}

impl Control {
    pub fn key(&self) -> &'static str {
        match self {
            Control::Toggle { key, .. }
            | Control::Text { key, .. }
            | Control::Dropdown { key, .. }
            | Control::Button { key, .. } => key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRow {
    pub position: usize,
    pub command_id: String,
    pub label: String,
    /// The id no longer resolves in the command registry.
    pub missing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroBlock {
    pub index: usize,
    pub title: String,
    pub name: String,
    /// Text shown in the delay field; empty when the stored delay is invalid.
    pub delay: String,
    pub delay_invalid: bool,
    pub commands: Vec<CommandRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsView {
    pub title: &'static str,
    pub basic: Vec<Control>,
    pub macros: Vec<MacroBlock>,
}

/// Builds the full panel from the current settings. Command names are looked
/// up fresh on every call.
pub fn render(settings: &Settings, registry: &impl CommandRegistry) -> SettingsView {
    SettingsView {
        title: PANEL_TITLE,
        basic: render_basic(settings),
        macros: settings
            .macros
            .iter()
            .enumerate()
            .map(|(index, m)| render_macro(index, m, registry))
            .collect(),
    }
}

fn render_basic(settings: &Settings) -> Vec<Control> {
    vec![
        Control::Toggle {
            key: "closeWithBackspace",
            name: "Close on Backspace",
            description: "Close the palette when there is no text and backspace is pressed",
            value: settings.close_with_backspace,
        },
        Control::Toggle {
            key: "recentAbovePinned",
            name: "Recent above Pinned",
            description:
                "Sorts the suggestion so that the recently used items show before pinned items.",
            value: settings.recent_above_pinned,
        },
        Control::Toggle {
            key: "hyperKeyOverride",
            name: "Caps Lock Hyper Key Hotkey Override",
            description: "For those users who have use a \"Hyper Key\", enabling this maps the icons \"⌥ ^ ⌘ ⇧\" to the caps lock icon \"⇪\"",
            value: settings.hyper_key_override,
        },
        Control::Text {
            key: "fileSearchPrefix",
            name: "File Search Prefix",
            description: "The prefix used to tell the palette you want to search files",
            value: settings.file_search_prefix.clone(),
        },
        Control::Text {
            key: "tagSearchPrefix",
            name: "Tag Search Prefix",
            description: "The prefix used to tell the palette you want to search tags",
            value: settings.tag_search_prefix.clone(),
        },
        Control::Dropdown {
            key: "suggestionLimit",
            name: "Suggestion Limit",
            description: "The number of items that will be in the suggestion list of the palette. Really high numbers can affect performance",
            options: SUGGESTION_LIMITS
                .iter()
                .map(|v| (v.to_string(), v.to_string()))
                .collect(),
            selected: settings.suggestion_limit.to_string(),
        },
        Control::Dropdown {
            key: "hotkeyStyle",
            name: "Hotkey Modifier Style",
            description: "Allows autodetecting of hotkey modifier or forcing to Mac or Windows",
            options: HotkeyStyle::ALL
                .iter()
                .map(|s| (s.token().to_string(), s.label().to_string()))
                .collect(),
            selected: settings.hotkey_style.token().to_string(),
        },
        Control::Button {
            key: "addMacro",
            name: "Add new macro",
            description: "Create a new grouping of commands that can be run together",
            label: "+",
        },
    ]
}

fn render_macro(index: usize, m: &Macro, registry: &impl CommandRegistry) -> MacroBlock {
    let commands = m
        .command_ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let position = i + 1;
            match registry.find_command(id) {
                Ok(cmd) => CommandRow {
                    position,
                    command_id: id.clone(),
                    label: format!("{position}: {}", cmd.name),
                    missing: false,
                },
                Err(err) => {
                    warn!(macro_index = index, command_id = %id, error = %err, "macro references a missing command");
                    CommandRow {
                        position,
                        command_id: id.clone(),
                        label: format!("{position}: Missing command ({id})"),
                        missing: true,
                    }
                }
            }
        })
        .collect();

    MacroBlock {
        index,
        title: format!("Macro #{}", index + 1),
        name: m.name.clone(),
        delay: m.delay.map(|d| d.to_string()).unwrap_or_default(),
        delay_invalid: m.delay.is_none(),
        commands,
    }
}

/// Draws a view as plain text, one control per line.
pub fn render_text(view: &SettingsView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(out, "{}", "=".repeat(view.title.chars().count()));

    for control in &view.basic {
        let line = match control {
            Control::Toggle { name, value, .. } => {
                format!("[{}] {name}", if *value { "x" } else { " " })
            }
            Control::Text { name, value, .. } => format!("{name}: \"{value}\""),
            Control::Dropdown {
                name,
                options,
                selected,
                ..
            } => {
                let label = options
                    .iter()
                    .find(|(value, _)| value == selected)
                    .map(|(_, label)| label.as_str())
                    .unwrap_or(selected.as_str());
                format!("{name}: {label}")
            }
            Control::Button { name, label, .. } => format!("({label}) {name}"),
        };
        let _ = writeln!(out, "{line}");
    }

    for block in &view.macros {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}: {}", block.title, block.name);
        if block.delay_invalid {
            let _ = writeln!(out, "  Delay (ms): <invalid>");
        } else {
            let _ = writeln!(out, "  Delay (ms): {}", block.delay);
        }
        if block.commands.is_empty() {
            let _ = writeln!(out, "  (no commands)");
        }
        for row in &block.commands {
            let _ = writeln!(out, "  {}", row.label);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Command, StaticRegistry};

    fn registry() -> StaticRegistry {
        StaticRegistry::new(vec![
            Command::new("app:reload", "Reload app"),
            Command::new("editor:save-file", "Save current file"),
        ])
    }

    #[test]
    fn basic_panel_lists_controls_in_order() {
        let view = render(&Settings::default(), &registry());
        let keys: Vec<_> = view.basic.iter().map(Control::key).collect();
        assert_eq!(
            keys,
            [
                "closeWithBackspace",
                "recentAbovePinned",
                "hyperKeyOverride",
                "fileSearchPrefix",
                "tagSearchPrefix",
                "suggestionLimit",
                "hotkeyStyle",
                "addMacro",
            ]
        );
        assert!(view.macros.is_empty());
    }

    #[test]
    fn dropdowns_offer_fixed_vocabulary() {
        let view = render(&Settings::default(), &registry());
        let Control::Dropdown { options, selected, .. } = &view.basic[5] else {
            panic!("expected suggestion limit dropdown");
        };
        assert_eq!(options.len(), SUGGESTION_LIMITS.len());
        assert_eq!(selected, "50");

        let Control::Dropdown { options, selected, .. } = &view.basic[6] else {
            panic!("expected hotkey style dropdown");
        };
        let tokens: Vec<_> = options.iter().map(|(v, _)| v.as_str()).collect();
        assert_eq!(tokens, ["auto", "mac", "windows"]);
        assert_eq!(selected, "auto");
    }

    #[test]
    fn macro_rows_resolve_names_and_flag_missing_commands() {
        let mut settings = Settings::default();
        settings.macros.push(Macro {
            name: "Reload".to_string(),
            command_ids: vec!["editor:save-file".to_string(), "gone".to_string()],
            delay: None,
        });

        let view = render(&settings, &registry());
        let block = &view.macros[0];
        assert_eq!(block.title, "Macro #1");
        assert!(block.delay_invalid);
        assert_eq!(block.delay, "");
        assert_eq!(block.commands[0].label, "1: Save current file");
        assert!(!block.commands[0].missing);
        assert_eq!(block.commands[1].label, "2: Missing command (gone)");
        assert!(block.commands[1].missing);
    }

    #[test]
    fn text_rendering_includes_macros() {
        let mut settings = Settings::default();
        settings.macros.push(Macro::numbered(1));
        settings.macros[0].command_ids.push("app:reload".to_string());

        let text = render_text(&render(&settings, &registry()));
        assert!(text.starts_with(PANEL_TITLE));
        assert!(text.contains("[x] Close on Backspace"));
        assert!(text.contains("Hotkey Modifier Style: Auto Detect"));
        assert!(text.contains("Macro #1: Macro 1"));
        assert!(text.contains("Delay (ms): 200"));
        assert!(text.contains("1: Reload app"));
    }
}
