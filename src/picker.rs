//! Command-selection prompt shown by a macro's "Add Command" action.

use std::cmp::Reverse;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::registry::{Command, CommandRegistry};

#[derive(Debug, Clone)]
pub struct CommandPicker {
    macro_index: usize,
    commands: Vec<Command>,
}

impl CommandPicker {
    pub fn new(macro_index: usize, registry: &impl CommandRegistry) -> Self {
        Self {
            macro_index,
            commands: registry.list_commands(),
        }
    }

    /// Macro that receives the selected command.
    pub fn macro_index(&self) -> usize {
        self.macro_index
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Commands whose display name fuzzy-matches `query`, case-insensitively,
    /// best score first and registry order on ties. An empty query lists
    /// everything.
    pub fn filter(&self, query: &str) -> Vec<&Command> {
        let query = query.trim();
        if query.is_empty() {
            return self.commands.iter().collect();
        }

        let matcher = SkimMatcherV2::default().ignore_case();
        let mut scored: Vec<(i64, usize, &Command)> = self
            .commands
            .iter()
            .enumerate()
            .filter_map(|(order, cmd)| {
                matcher
                    .fuzzy_match(&cmd.name, query)
                    .map(|score| (score, order, cmd))
            })
            .collect();
        scored.sort_by_key(|(score, order, _)| (Reverse(*score), *order));
        scored.into_iter().map(|(_, _, cmd)| cmd).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::StaticRegistry;

    fn registry() -> StaticRegistry {
        StaticRegistry::new(vec![
            Command::new("editor:toggle-bold", "Toggle bold"),
            Command::new("daily-notes", "Open today's daily note"),
            Command::new("editor:save-file", "Save current file"),
        ])
    }

    #[test]
    fn empty_query_lists_all_in_registry_order() {
        let picker = CommandPicker::new(2, &registry());
        assert_eq!(picker.macro_index(), 2);
        let ids: Vec<_> = picker.filter("  ").into_iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["editor:toggle-bold", "daily-notes", "editor:save-file"]);
    }

    #[test]
    fn query_is_case_insensitive() {
        let picker = CommandPicker::new(0, &registry());
        let ids: Vec<_> = picker.filter("SAVE").into_iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["editor:save-file"]);
    }

    #[test]
    fn contiguous_match_ranks_above_scattered_one() {
        let registry = StaticRegistry::new(vec![
            Command::new("slave", "Slave mode"),
            Command::new("sass", "Sass: save file"),
        ]);
        let picker = CommandPicker::new(0, &registry);
        let ids: Vec<_> = picker.filter("save").into_iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["sass", "slave"]);
    }

    #[test]
    fn no_match_returns_nothing() {
        let picker = CommandPicker::new(0, &registry());
        assert!(picker.filter("xyz").is_empty());
    }
}
