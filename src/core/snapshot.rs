//! Immutable views of the engine state and their delivery to subscribers.

use std::{
    collections::BTreeSet,
    sync::{mpsc, Arc},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Category, Transaction};

/// Everything a presentation layer may read, captured at one point in time.
///
/// `version` increases by one per state-changing operation, so two snapshots
/// with the same version describe the same state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressSnapshot {
    pub version: u64,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub total_spent: f64,
    pub budget_remaining: f64,
    pub monthly_budget: f64,
    pub achievements: BTreeSet<String>,
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub transaction_count: usize,
    pub streak_days: u32,
    pub last_transaction_date: Option<DateTime<Utc>>,
}

impl ProgressSnapshot {
    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.contains(id)
    }
}

/// Fan-out of published snapshots to any number of receivers.
#[derive(Debug, Default)]
pub struct SnapshotBus {
    subscribers: Vec<mpsc::Sender<Arc<ProgressSnapshot>>>,
}

impl SnapshotBus {
    pub fn subscribe(&mut self) -> mpsc::Receiver<Arc<ProgressSnapshot>> {
        let (sender, receiver) = mpsc::channel();
        self.subscribers.push(sender);
        receiver
    }

    pub fn has_subscribers(&self) -> bool {
        !self.subscribers.is_empty()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Sends `snapshot` to every live receiver, dropping the ones that hung up.
    pub fn publish(&mut self, snapshot: &Arc<ProgressSnapshot>) {
        self.subscribers
            .retain(|sender| sender.send(Arc::clone(snapshot)).is_ok());
    }
}
