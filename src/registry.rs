use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// An invocable action exposed by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub id: String,
    pub name: String,
}

impl Command {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Host-provided command catalog. Lookups happen at render time, so an id
/// stored in a macro may no longer resolve.
pub trait CommandRegistry {
    fn find_command(&self, id: &str) -> Result<Command, EditorError>;
    fn list_commands(&self) -> Vec<Command>;
}

/// A fixed list of commands.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    commands: Vec<Command>,
}

impl StaticRegistry {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn register(&mut self, command: Command) {
        self.commands.retain(|c| c.id != command.id);
        self.commands.push(command);
    }

    pub fn unregister(&mut self, id: &str) {
        self.commands.retain(|c| c.id != id);
    }
}

impl CommandRegistry for StaticRegistry {
    fn find_command(&self, id: &str) -> Result<Command, EditorError> {
        self.commands
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| EditorError::CommandNotFound { id: id.to_string() })
    }

    fn list_commands(&self) -> Vec<Command> {
        self.commands.clone()
    }
}
