//! Unlock rules evaluated against the engine's state after each change.

use std::collections::BTreeSet;

use crate::domain::achievement::{
    BUDGET_MASTER, FIRST_TRANSACTION, LEVEL_5, STREAK_7, XP_COLLECTOR,
};

/// The slice of engine state the unlock rules look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AchievementContext {
    pub transaction_count: usize,
    pub level: u32,
    pub xp: u32,
    pub streak_days: u32,
    pub budget_percentage: f64,
}

struct Rule {
    id: &'static str,
    holds: fn(&AchievementContext) -> bool,
}

static RULES: [Rule; 5] = [
    Rule {
        id: FIRST_TRANSACTION,
        holds: |ctx| ctx.transaction_count >= 1,
    },
    Rule {
        id: LEVEL_5,
        holds: |ctx| ctx.level >= 5,
    },
    // Current-level xp, not lifetime xp.
    Rule {
        id: XP_COLLECTOR,
        holds: |ctx| ctx.xp >= 1_000,
    },
    Rule {
        id: STREAK_7,
        holds: |ctx| ctx.streak_days >= 7,
    },
    Rule {
        id: BUDGET_MASTER,
        holds: |ctx| ctx.budget_percentage > 50.0 && ctx.transaction_count >= 5,
    },
];

/// Ids of every rule that currently holds.
pub fn qualifying(ctx: &AchievementContext) -> impl Iterator<Item = &'static str> + '_ {
    RULES
        .iter()
        .filter(move |rule| (rule.holds)(ctx))
        .map(|rule| rule.id)
}

/// Adds every qualifying achievement to `unlocked` and returns the newly added ids.
///
/// Never removes anything, so running it twice without a state change is a no-op.
pub fn evaluate(ctx: &AchievementContext, unlocked: &mut BTreeSet<String>) -> Vec<String> {
    qualifying(ctx)
        .filter(|id| unlocked.insert((*id).to_string()))
        .map(str::to_string)
        .collect()
}
