pub mod summary_service;

pub use summary_service::{
    AchievementStatus, BudgetHealth, CategorySpending, SummaryService,
};
