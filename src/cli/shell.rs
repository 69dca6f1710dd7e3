//! Input loops: rustyline on a terminal, plain stdin lines for scripts.

use std::io::{self, BufRead};

use rustyline::{error::ReadlineError, history::DefaultHistory, Cmd, Editor, KeyEvent};

use crate::cli::completion::ShellCompleter;
use crate::cli::context::{CliMode, LoopControl, ShellContext};
use crate::cli::output;
use crate::errors::CliError;

const SCRIPT_ENV: &str = "MANA_CORE_CLI_SCRIPT";

/// Runs the shell. With `MANA_CORE_CLI_SCRIPT` set, commands are read from stdin.
pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    output::set_plain(mode == CliMode::Script);

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor: Editor<ShellCompleter, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(ShellCompleter::default()));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
    output::info("Type `help` for commands. Tab completes categories and transaction ids.");

    while context.running {
        // Ids and categories change with every command.
        if let Some(completer) = editor.helper_mut() {
            completer.refresh(context);
        }

        let prompt = context.prompt();
        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
                continue;
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        editor.add_history_entry(line).ok();
        if step(context, line)? == LoopControl::Exit {
            break;
        }
    }
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if step(context, line)? == LoopControl::Exit {
            break;
        }
    }
    Ok(())
}

/// Runs one line. Command failures are reported and the session continues.
fn step(context: &mut ShellContext, line: &str) -> Result<LoopControl, CliError> {
    match context.process_line(line) {
        Ok(control) => Ok(control),
        Err(err) => {
            context.report_error(err)?;
            Ok(LoopControl::Continue)
        }
    }
}
