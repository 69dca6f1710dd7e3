//! Tab completion: command words, then the ids each command's arguments take.

use std::collections::HashMap;

use rustyline::{
    completion::{Completer, Pair},
    highlight::Highlighter,
    hint::Hinter,
    validate::Validator,
    Context, Helper,
};

use crate::cli::context::ShellContext;
use crate::config::Config;
use crate::domain::{Transaction, ACHIEVEMENTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Command,
    Category,
    Transaction,
    Achievement,
    ConfigKey,
    Free,
}

/// What argument `index` of `command` accepts. Index 0 is the command word.
fn slot_for(command: &str, index: usize) -> Slot {
    match (command, index) {
        (_, 0) | ("help", 1) => Slot::Command,
        ("add", 2) | ("edit", 3) => Slot::Category,
        ("edit", 1) | ("delete", 1) => Slot::Transaction,
        ("unlock", 1) => Slot::Achievement,
        ("config", 2) => Slot::ConfigKey,
        _ => Slot::Free,
    }
}

/// Candidate pools copied from the shell before each prompt.
#[derive(Debug, Default)]
pub(crate) struct ShellCompleter {
    commands: Vec<&'static str>,
    canonical: HashMap<&'static str, &'static str>,
    categories: Vec<String>,
    transactions: Vec<String>,
}

impl ShellCompleter {
    pub(crate) fn refresh(&mut self, context: &ShellContext) {
        let registry = &context.registry;
        self.commands = registry.names().collect();
        self.commands.sort_unstable();
        self.commands.dedup();
        self.canonical = registry
            .names()
            .filter_map(|name| registry.get(name).map(|entry| (name, entry.name)))
            .collect();
        self.categories = context
            .engine
            .categories()
            .iter()
            .map(|category| category.id.clone())
            .collect();
        self.transactions = context
            .engine
            .transactions()
            .iter()
            .map(Transaction::short_id)
            .collect();
    }

    /// Byte offset where the word under the cursor starts, and its candidates.
    pub(crate) fn candidates(&self, line: &str) -> (usize, Vec<String>) {
        let start = line.rfind(char::is_whitespace).map_or(0, |idx| idx + 1);
        let word = line[start..].to_ascii_lowercase();
        let before: Vec<&str> = line[..start].split_whitespace().collect();
        let command = before
            .first()
            .map(|raw| raw.to_ascii_lowercase())
            .and_then(|raw| self.canonical.get(raw.as_str()).copied())
            .unwrap_or_default();

        let pool: Vec<&str> = match slot_for(command, before.len()) {
            Slot::Command => self.commands.clone(),
            Slot::Category => self.categories.iter().map(String::as_str).collect(),
            Slot::Transaction => self.transactions.iter().map(String::as_str).collect(),
            Slot::Achievement => ACHIEVEMENTS.iter().map(|definition| definition.id).collect(),
            Slot::ConfigKey => Config::KEYS.to_vec(),
            Slot::Free => Vec::new(),
        };
        let matches = pool
            .into_iter()
            .filter(|candidate| candidate.starts_with(&word))
            .map(str::to_string)
            .collect();
        (start, matches)
    }
}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = self.candidates(&line[..pos]);
        let pairs = words
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ShellCompleter {
    type Hint = String;
}

impl Highlighter for ShellCompleter {}

impl Validator for ShellCompleter {}

impl Helper for ShellCompleter {}
