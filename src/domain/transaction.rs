use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;

pub type TransactionId = Uuid;

/// A logged expense. The category is copied by value at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub date: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        amount: f64,
        category: Category,
        description: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            category,
            description: description.into(),
            date,
        }
    }

    /// First eight hex digits of the id, used for display and prefix lookups.
    pub fn short_id(&self) -> String {
        let mut short = self.id.simple().to_string();
        short.truncate(8);
        short
    }
}
