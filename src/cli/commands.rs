//! Command handlers registered with the shell.

use std::collections::BTreeSet;

use crate::cli::{
    context::{CommandError, CommandResult, ShellContext},
    io as cli_io, output,
    registry::{CommandEntry, CommandRegistry},
};
use crate::core::services::SummaryService;
use crate::domain::achievement;

pub fn register_all(registry: &mut CommandRegistry) {
    let entries = [
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
        CommandEntry::new("status", "Show level, budget and streak", "status", cmd_status),
        CommandEntry::new(
            "add",
            "Log an expense",
            "add <amount> <category> <description...>",
            cmd_add,
        ),
        CommandEntry::new(
            "edit",
            "Correct an existing expense",
            "edit <id> <amount> <category> <description...>",
            cmd_edit,
        ),
        CommandEntry::new("delete", "Remove an expense", "delete <id>", cmd_delete),
        CommandEntry::new("list", "List recent expenses", "list [limit]", cmd_list),
        CommandEntry::new("budget", "Set the monthly budget", "budget <amount>", cmd_budget),
        CommandEntry::new("unlock", "Unlock an achievement by id", "unlock <id>", cmd_unlock),
        CommandEntry::new(
            "achievements",
            "Show the achievement board",
            "achievements",
            cmd_achievements,
        ),
        CommandEntry::new("categories", "List spending categories", "categories", cmd_categories),
        CommandEntry::new("spending", "Show spending per category", "spending", cmd_spending),
        CommandEntry::new("export", "Print the current state as JSON", "export", cmd_export),
        CommandEntry::new("reset", "Discard all progress", "reset", cmd_reset),
        CommandEntry::new(
            "config",
            "Show or change the stored configuration",
            "config [set <key> <value>]",
            cmd_config,
        ),
        CommandEntry::new("exit", "Leave the shell", "exit", cmd_exit),
    ];
    for entry in entries {
        registry.register(entry);
    }
    registry.alias("quit", "exit");
    registry.alias("ls", "list");
    registry.alias("rm", "delete");
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let entry = context.registry.get(&name.to_lowercase()).ok_or_else(|| {
            CommandError::InvalidArguments(format!("unknown command `{}`", name))
        })?;
        output::line(format!("{}\n  usage: {}", entry.description, entry.usage));
        return Ok(());
    }

    output::section("Commands");
    for entry in context.registry.list() {
        output::line(format!("  {:<14} {}", entry.name, entry.description));
    }
    Ok(())
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let snapshot = context.engine.snapshot();
    let health = SummaryService::budget_health(&snapshot);

    output::section("Status");
    output::line(format!(
        "Level {}  ({}/{} xp, {:.0}%)",
        snapshot.level,
        snapshot.xp,
        snapshot.xp_to_next_level,
        SummaryService::level_progress(&snapshot) * 100.0
    ));
    output::line(format!("Budget     {:.2}", snapshot.monthly_budget));
    output::line(format!("Spent      {:.2}", snapshot.total_spent));
    output::line(format!(
        "Remaining  {:.2} ({:.1}%, {:?})",
        snapshot.budget_remaining,
        SummaryService::budget_percentage(&snapshot),
        health
    ));
    output::line(format!(
        "Streak     {} {}",
        snapshot.streak_days,
        if snapshot.streak_days == 1 { "day" } else { "days" }
    ));
    output::line(format!("Logged     {}", snapshot.transaction_count));
    output::line(format!(
        "Unlocked   {}/{}",
        snapshot.achievements.len(),
        achievement::ACHIEVEMENTS.len()
    ));
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [amount, category_id, description @ ..] = args else {
        return Err(usage("add <amount> <category> <description...>"));
    };
    let amount = parse_amount(amount)?;
    let description = parse_description(description)?;

    if context.engine.categories().get(category_id).is_none() {
        cli_io::print_warning(format!(
            "Unknown category `{}`, using `{}`.",
            category_id,
            context.engine.categories().fallback().id
        ));
    }

    let before = context.engine.achievements().clone();
    let id = context
        .engine
        .add_transaction(amount, category_id, &description);

    if let Some(transaction) = context.engine.transaction(id) {
        cli_io::print_success(format!(
            "Logged {} {:.2} in {} ({}).",
            transaction.short_id(),
            transaction.amount,
            transaction.category.name,
            transaction.description
        ));
    }
    cli_io::print_info(format!(
        "Level {} · {}/{} xp · streak {}",
        context.engine.level(),
        context.engine.xp(),
        context.engine.xp_to_next_level(),
        context.engine.streak_days()
    ));
    announce_unlocks(&before, context.engine.achievements());
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id, amount, category_id, description @ ..] = args else {
        return Err(usage("edit <id> <amount> <category> <description...>"));
    };
    let id = context.resolve_transaction_id(id)?;
    let amount = parse_amount(amount)?;
    let description = parse_description(description)?;

    context
        .engine
        .try_edit_transaction(id, amount, category_id, &description)?;
    cli_io::print_success(format!(
        "Updated transaction. Spent {:.2}, remaining {:.2}.",
        context.engine.total_spent(),
        context.engine.budget_remaining()
    ));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(usage("delete <id>"));
    };
    let id = context.resolve_transaction_id(id)?;
    let removed = context.engine.try_delete_transaction(id)?;
    cli_io::print_success(format!(
        "Deleted {} ({:.2} {}). Remaining {:.2}.",
        removed.short_id(),
        removed.amount,
        removed.description,
        context.engine.budget_remaining()
    ));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let limit = match args {
        [] => usize::MAX,
        [raw] => raw.parse::<usize>().map_err(|_| {
            CommandError::InvalidArguments(format!("invalid limit `{}`", raw))
        })?,
        _ => return Err(usage("list [limit]")),
    };

    let transactions = context.engine.transactions();
    if transactions.is_empty() {
        cli_io::print_info("No transactions logged yet.");
        return Ok(());
    }

    output::section("Transactions");
    for transaction in transactions.iter().take(limit) {
        output::line(format!(
            "  {}  {}  {:<14} {:>10.2}  {}",
            transaction.short_id(),
            transaction.date.format("%Y-%m-%d %H:%M"),
            transaction.category.name,
            transaction.amount,
            transaction.description
        ));
    }
    Ok(())
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [amount] = args else {
        return Err(usage("budget <amount>"));
    };
    let amount = parse_amount(amount)?;
    context.engine.set_monthly_budget(amount);
    cli_io::print_success(format!(
        "Monthly budget set to {:.2}. Remaining {:.2}.",
        amount,
        context.engine.budget_remaining()
    ));
    Ok(())
}

fn cmd_unlock(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(usage("unlock <id>"));
    };
    if context.engine.has_achievement(id) {
        cli_io::print_info(format!("`{}` is already unlocked.", id));
        return Ok(());
    }
    context.engine.unlock_achievement(id);
    cli_io::print_success(format!("Unlocked `{}`.", display_title(id)));
    Ok(())
}

fn cmd_achievements(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let snapshot = context.engine.snapshot();
    output::section("Achievements");
    for status in SummaryService::achievement_board(&snapshot) {
        let definition = status.definition;
        output::line(format!(
            "  [{}] {:<18} {:<10} {}",
            if status.unlocked { "x" } else { " " },
            definition.title,
            definition.rarity,
            definition.description
        ));
    }
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Categories");
    for category in context.engine.categories().iter() {
        output::line(format!(
            "  {:<14} {} {:<14} {}",
            category.id, category.icon, category.name, category.rarity
        ));
    }
    Ok(())
}

fn cmd_spending(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let spending = SummaryService::spending_by_category(&context.engine.snapshot());
    if spending.is_empty() {
        cli_io::print_info("No spending data yet.");
        return Ok(());
    }
    output::section("Spending by category");
    for entry in spending {
        output::line(format!("  {:<14} {:>10.2}", entry.name, entry.total));
    }
    Ok(())
}

fn cmd_export(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let json = serde_json::to_string_pretty(context.engine.snapshot().as_ref())?;
    output::line(json);
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm("Discard all transactions, experience and achievements?")? {
        cli_io::print_info("Reset cancelled.");
        return Ok(());
    }
    context.engine.reset_all_data();
    cli_io::print_success("All progress reset.");
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            output::section("Configuration");
            output::line(format!("  file: {}", context.config_manager.path().display()));
            output::line(serde_json::to_string_pretty(&context.config)?);
            Ok(())
        }
        ["set", key, value] => {
            let mut updated = context.config.clone();
            updated.set(key, value)?;
            context.config_manager.save(&updated)?;
            context.config = updated;
            cli_io::print_success(format!(
                "Saved {} = {} to {}.",
                key,
                value,
                context.config_manager.path().display()
            ));
            cli_io::print_info("The running session keeps its settings until the next start.");
            Ok(())
        }
        _ => Err(usage("config [set <key> <value>]")),
    }
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

fn usage(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {}", usage))
}

fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    match raw.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(CommandError::InvalidArguments(format!(
            "amount must be a positive number, got `{}`",
            raw
        ))),
    }
}

fn parse_description(words: &[&str]) -> Result<String, CommandError> {
    let description = words.join(" ");
    let description = description.trim();
    if description.is_empty() {
        return Err(CommandError::InvalidArguments(
            "description must not be empty".into(),
        ));
    }
    Ok(description.to_string())
}

fn display_title(id: &str) -> &str {
    achievement::definition(id)
        .map(|definition| definition.title)
        .unwrap_or(id)
}

fn announce_unlocks(before: &BTreeSet<String>, after: &BTreeSet<String>) {
    for id in after.difference(before) {
        cli_io::print_success(format!("Achievement unlocked: {}!", display_title(id)));
    }
}
