//! Shell state, dispatch and error reporting.

use std::{io, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use uuid::Uuid;

use crate::cli::{commands, io as cli_io, registry::CommandRegistry};
use crate::config::{Config, ConfigManager};
use crate::core::{clock::SystemClock, engine::ProgressEngine};
use crate::domain::TransactionId;
use crate::errors::{CliError, ConfigError, EngineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub engine: ProgressEngine,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    /// Loads the stored config and starts a fresh engine on the system clock.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        config.validate()?;
        Ok(Self::with_parts(mode, config_manager, config))
    }

    pub fn with_parts(mode: CliMode, config_manager: ConfigManager, config: Config) -> Self {
        let engine = ProgressEngine::new(config.clone(), Arc::new(SystemClock));
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        Self {
            mode,
            registry,
            engine,
            config_manager,
            config,
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "mana [lv {} · {}/{} xp]> ",
            self.engine.level(),
            self.engine.xp(),
            self.engine.xp_to_next_level()
        )
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    /// Tokenises and dispatches one input line.
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = shell_words::split(line).map_err(|err| {
            CommandError::InvalidArguments(format!("could not parse `{}`: {}", line.trim(), err))
        })?;

        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        self.last_command = Some(line.trim().to_string());
        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    /// Asks before a destructive action. Script mode always proceeds.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_info("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Io(err) => Err(err.into()),
            other => {
                cli_io::print_error(other);
                Ok(())
            }
        }
    }

    /// Resolves a full id or a unique prefix of the simple (hyphen-less) form.
    pub(crate) fn resolve_transaction_id(
        &self,
        token: &str,
    ) -> Result<TransactionId, CommandError> {
        if let Ok(id) = Uuid::parse_str(token) {
            return Ok(id);
        }
        let needle = token.trim().to_ascii_lowercase().replace('-', "");
        if needle.is_empty() {
            return Err(CommandError::InvalidArguments(
                "transaction id must not be empty".into(),
            ));
        }

        let matches: Vec<TransactionId> = self
            .engine
            .transactions()
            .iter()
            .filter(|transaction| transaction.id.simple().to_string().starts_with(&needle))
            .map(|transaction| transaction.id)
            .collect();

        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(CommandError::InvalidArguments(format!(
                "no transaction matches `{}`",
                token
            ))),
            _ => Err(CommandError::InvalidArguments(format!(
                "`{}` matches {} transactions; use a longer prefix",
                token,
                matches.len()
            ))),
        }
    }
}
