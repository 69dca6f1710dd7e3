#![doc(test(attr(deny(warnings))))]

//! Mana Core is the progress engine behind a gamified expense tracker.
//!
//! A single [`ProgressEngine`] owns the budget, the transaction list, experience
//! and level progression, the logging streak and the unlocked achievements.
//! Presentation layers read immutable [`ProgressSnapshot`]s and call the
//! engine's mutation operations; nothing else writes state.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod utils;

pub use crate::config::{Config, ConfigManager, RewardRules};
pub use crate::core::{
    clock::{Clock, ManualClock, SystemClock},
    engine::ProgressEngine,
    services::SummaryService,
    snapshot::ProgressSnapshot,
};
pub use crate::domain::{
    AchievementDefinition, AchievementIcon, Category, CategoryCatalog, Rarity, Transaction,
    TransactionId,
};
pub use crate::errors::{ConfigError, EngineError, EngineResult};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Mana Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
