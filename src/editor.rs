use tracing::{debug, info, warn};

use crate::error::EditorError;
use crate::picker::CommandPicker;
use crate::registry::CommandRegistry;
use crate::settings::{parse_delay, parse_suggestion_limit, HotkeyStyle, Macro, Settings};
use crate::storage::SettingsStore;
use crate::view::{render, SettingsView};

/// Re-renders run synchronously inside [`SettingsEditor::apply`], so callers
/// only ever observe `Idle`. `RerenderPending` marks the window between a
/// structural mutation and its re-render, including while the save runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    RerenderPending,
}

/// One committed user interaction with the settings panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    CloseWithBackspace(bool),
    RecentAbovePinned(bool),
    HyperKeyOverride(bool),
    FileSearchPrefix(String),
    TagSearchPrefix(String),
    /// Dropdown display string, e.g. `"100"`.
    SuggestionLimit(String),
    /// One of `auto`, `mac`, `windows`.
    HotkeyStyle(String),
    AddMacro,
    DeleteMacro { index: usize },
    RenameMacro { index: usize, name: String },
    MacroDelay { index: usize, text: String },
    AddCommand { index: usize, command_id: String },
    DeleteCommand { index: usize, command_index: usize },
}

impl Edit {
    /// Structural edits change the shape of the panel and force a re-render.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Edit::AddMacro
                | Edit::DeleteMacro { .. }
                | Edit::AddCommand { .. }
                | Edit::DeleteCommand { .. }
        )
    }
}

/// Owns the settings value for one editing session. Every edit mutates it,
/// saves the whole object, and re-renders when the edit is structural.
pub struct SettingsEditor<S, R> {
    settings: Settings,
    store: S,
    registry: R,
    view: SettingsView,
    render_state: RenderState,
    unsaved: bool,
}

impl<S: SettingsStore, R: CommandRegistry> SettingsEditor<S, R> {
    pub fn open(store: S, registry: R) -> Result<Self, EditorError> {
        let settings = store.load_settings().map_err(EditorError::Load)?;
        info!(macros = settings.macros.len(), "settings loaded");
        let view = render(&settings, &registry);
        Ok(Self {
            settings,
            store,
            registry,
            view,
            render_state: RenderState::Idle,
            unsaved: false,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Last rendered view. Field edits do not refresh it.
    pub fn view(&self) -> &SettingsView {
        &self.view
    }

    /// Always `Idle` between calls; see [`RenderState`].
    pub fn render_state(&self) -> RenderState {
        self.render_state
    }

    /// True while the in-memory settings are ahead of the last successful save.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    /// Validates and applies `edit`, then saves. A rejected edit changes
    /// nothing. A failed save keeps the change in memory and is returned as
    /// [`EditorError::Persist`] after any re-render has happened.
    pub fn apply(&mut self, edit: Edit) -> Result<(), EditorError> {
        let structural = edit.is_structural();
        debug!(?edit, structural, "applying settings edit");

        self.mutate(edit)?;
        if structural {
            self.render_state = RenderState::RerenderPending;
        }
        let saved = self.save_now();

        if structural {
            self.rerender();
        }

        saved
    }

    /// Saves the full settings object.
    pub fn save_now(&mut self) -> Result<(), EditorError> {
        match self.store.save_settings(&self.settings) {
            Ok(()) => {
                self.unsaved = false;
                Ok(())
            }
            Err(err) => {
                self.unsaved = true;
                warn!(error = %format!("{err:#}"), "failed to save settings; keeping changes in memory");
                Err(EditorError::Persist(err))
            }
        }
    }

    pub fn rerender(&mut self) {
        self.view = render(&self.settings, &self.registry);
        self.render_state = RenderState::Idle;
    }

    pub fn open_command_picker(&self, index: usize) -> Result<CommandPicker, EditorError> {
        self.check_macro(index)?;
        Ok(CommandPicker::new(index, &self.registry))
    }

    pub fn pick_command(
        &mut self,
        picker: &CommandPicker,
        command_id: &str,
    ) -> Result<(), EditorError> {
        self.apply(Edit::AddCommand {
            index: picker.macro_index(),
            command_id: command_id.to_string(),
        })
    }

    fn mutate(&mut self, edit: Edit) -> Result<(), EditorError> {
        match edit {
            Edit::CloseWithBackspace(v) => self.settings.close_with_backspace = v,
            Edit::RecentAbovePinned(v) => self.settings.recent_above_pinned = v,
            Edit::HyperKeyOverride(v) => self.settings.hyper_key_override = v,
            Edit::FileSearchPrefix(v) => self.settings.file_search_prefix = v,
            Edit::TagSearchPrefix(v) => self.settings.tag_search_prefix = v,
            Edit::SuggestionLimit(display) => {
                self.settings.suggestion_limit = parse_suggestion_limit(&display)?;
            }
            Edit::HotkeyStyle(token) => {
                self.settings.hotkey_style = token.parse::<HotkeyStyle>()?;
            }
            Edit::AddMacro => {
                let position = self.settings.macros.len() + 1;
                self.settings.macros.push(Macro::numbered(position));
            }
            Edit::DeleteMacro { index } => {
                self.check_macro(index)?;
                let removed = self.settings.macros.remove(index);
                info!(index, name = %removed.name, "macro deleted");
            }
            Edit::RenameMacro { index, name } => {
                self.macro_mut(index)?.name = name;
            }
            Edit::MacroDelay { index, text } => {
                let delay = parse_delay(&text);
                self.macro_mut(index)?.delay = delay;
                if delay.is_none() {
                    warn!(index, text = %text, "macro delay is not a non-negative integer; storing as invalid");
                }
            }
            Edit::AddCommand { index, command_id } => {
                self.check_macro(index)?;
                self.registry.find_command(&command_id)?;
                self.settings.macros[index].command_ids.push(command_id);
            }
            Edit::DeleteCommand {
                index,
                command_index,
            } => {
                let ids = &mut self.macro_mut(index)?.command_ids;
                if command_index >= ids.len() {
                    return Err(EditorError::CommandOutOfRange {
                        position: command_index,
                        len: ids.len(),
                    });
                }
                ids.remove(command_index);
            }
        }
        Ok(())
    }

    fn check_macro(&self, index: usize) -> Result<(), EditorError> {
        let len = self.settings.macros.len();
        if index >= len {
            return Err(EditorError::MacroOutOfRange { index, len });
        }
        Ok(())
    }

    fn macro_mut(&mut self, index: usize) -> Result<&mut Macro, EditorError> {
        let len = self.settings.macros.len();
        self.settings
            .macros
            .get_mut(index)
            .ok_or(EditorError::MacroOutOfRange { index, len })
    }
}
