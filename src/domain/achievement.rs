//! Display metadata for the achievements the engine can unlock.

use std::fmt;

use serde::Serialize;

use super::category::Rarity;

pub const FIRST_TRANSACTION: &str = "first-transaction";
pub const LEVEL_5: &str = "level-5";
pub const XP_COLLECTOR: &str = "xp-collector";
pub const STREAK_7: &str = "streak-7";
pub const BUDGET_MASTER: &str = "budget-master";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AchievementIcon {
    Trophy,
    Star,
    Zap,
    Award,
}

impl fmt::Display for AchievementIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AchievementIcon::Trophy => "trophy",
            AchievementIcon::Star => "star",
            AchievementIcon::Zap => "zap",
            AchievementIcon::Award => "award",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: AchievementIcon,
    pub rarity: Rarity,
}

pub static ACHIEVEMENTS: [AchievementDefinition; 5] = [
    AchievementDefinition {
        id: FIRST_TRANSACTION,
        title: "First Transaction",
        description: "Log your first expense",
        icon: AchievementIcon::Zap,
        rarity: Rarity::Common,
    },
    AchievementDefinition {
        id: BUDGET_MASTER,
        title: "Budget Master",
        description: "Stay under budget for 7 days",
        icon: AchievementIcon::Trophy,
        rarity: Rarity::Rare,
    },
    AchievementDefinition {
        id: LEVEL_5,
        title: "Level Up!",
        description: "Reach level 5",
        icon: AchievementIcon::Star,
        rarity: Rarity::Epic,
    },
    AchievementDefinition {
        id: XP_COLLECTOR,
        title: "XP Collector",
        description: "Earn 1000 XP",
        icon: AchievementIcon::Award,
        rarity: Rarity::Legendary,
    },
    AchievementDefinition {
        id: STREAK_7,
        title: "7 Day Streak",
        description: "Log transactions for 7 consecutive days",
        icon: AchievementIcon::Zap,
        rarity: Rarity::Epic,
    },
];

pub fn definition(id: &str) -> Option<&'static AchievementDefinition> {
    ACHIEVEMENTS.iter().find(|definition| definition.id == id)
}
