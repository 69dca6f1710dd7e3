//! Reference data and records owned by the progress engine.

pub mod achievement;
pub mod category;
pub mod transaction;

pub use achievement::{AchievementDefinition, AchievementIcon, ACHIEVEMENTS};
pub use category::{Category, CategoryCatalog, Rarity};
pub use transaction::{Transaction, TransactionId};
