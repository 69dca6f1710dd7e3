//! Read-only projections over a [`ProgressSnapshot`] for dashboards and charts.

use serde::Serialize;

use crate::core::{budget, leveling::Progression, snapshot::ProgressSnapshot};
use crate::domain::{AchievementDefinition, Rarity, ACHIEVEMENTS};

/// Total spent in one category.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategorySpending {
    pub category_id: String,
    pub name: String,
    pub color: String,
    pub rarity: Rarity,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BudgetHealth {
    /// More than 30% of the budget left.
    Healthy,
    /// More than 10% left.
    Warning,
    Critical,
}

impl BudgetHealth {
    /// Rarity tier the dashboard uses to tint the budget bar.
    pub fn rarity(self) -> Rarity {
        match self {
            BudgetHealth::Healthy => Rarity::Common,
            BudgetHealth::Warning => Rarity::Epic,
            BudgetHealth::Critical => Rarity::Legendary,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct AchievementStatus {
    pub definition: AchievementDefinition,
    pub unlocked: bool,
}

pub struct SummaryService;

impl SummaryService {
    /// Per-category totals in first-seen order over the newest-first list.
    ///
    /// Name, color and rarity come from the first transaction seen for the id,
    /// totals are rounded to cents.
    pub fn spending_by_category(snapshot: &ProgressSnapshot) -> Vec<CategorySpending> {
        let mut totals: Vec<CategorySpending> = Vec::new();
        for transaction in &snapshot.transactions {
            let category = &transaction.category;
            match totals
                .iter_mut()
                .find(|entry| entry.category_id == category.id)
            {
                Some(entry) => entry.total += transaction.amount,
                None => totals.push(CategorySpending {
                    category_id: category.id.clone(),
                    name: category.name.clone(),
                    color: category.color.clone(),
                    rarity: category.rarity,
                    total: transaction.amount,
                }),
            }
        }
        for entry in &mut totals {
            entry.total = round_cents(entry.total);
        }
        totals
    }

    pub fn budget_percentage(snapshot: &ProgressSnapshot) -> f64 {
        budget::percentage(snapshot.budget_remaining, snapshot.monthly_budget)
    }

    pub fn budget_health(snapshot: &ProgressSnapshot) -> BudgetHealth {
        let percentage = Self::budget_percentage(snapshot);
        if percentage > 30.0 {
            BudgetHealth::Healthy
        } else if percentage > 10.0 {
            BudgetHealth::Warning
        } else {
            BudgetHealth::Critical
        }
    }

    /// Every known achievement in display order with its unlocked flag.
    pub fn achievement_board(snapshot: &ProgressSnapshot) -> Vec<AchievementStatus> {
        ACHIEVEMENTS
            .iter()
            .map(|definition| AchievementStatus {
                definition: *definition,
                unlocked: snapshot.has_achievement(definition.id),
            })
            .collect()
    }

    pub fn level_progress(snapshot: &ProgressSnapshot) -> f64 {
        Progression {
            level: snapshot.level,
            xp: snapshot.xp,
            xp_to_next_level: snapshot.xp_to_next_level,
        }
        .progress()
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
