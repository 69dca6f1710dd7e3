//! The single mutable aggregate behind every progress read and write.

use std::{collections::BTreeSet, fmt, sync::mpsc, sync::Arc};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::Config;
use crate::core::{
    achievements::{self, AchievementContext},
    budget,
    clock::{Clock, SystemClock},
    leveling::{Progression, XpOutcome},
    snapshot::{ProgressSnapshot, SnapshotBus},
    streak,
};
use crate::domain::{Category, CategoryCatalog, Transaction, TransactionId};
use crate::errors::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq)]
struct ProgressState {
    progression: Progression,
    total_spent: f64,
    monthly_budget: f64,
    achievements: BTreeSet<String>,
    /// Newest first.
    transactions: Vec<Transaction>,
    streak_days: u32,
    last_transaction_date: Option<DateTime<Utc>>,
}

impl ProgressState {
    fn initial(config: &Config) -> Self {
        Self {
            progression: Progression::new(config.rewards.level_step()),
            total_spent: 0.0,
            monthly_budget: config.monthly_budget,
            achievements: BTreeSet::new(),
            transactions: Vec::new(),
            streak_days: 0,
            last_transaction_date: None,
        }
    }
}

/// Owns budget, transactions, experience, streak and achievements.
///
/// Every operation runs to completion before returning and publishes at most
/// one snapshot. The lenient operations (`add_transaction`, `edit_transaction`,
/// `delete_transaction`) never fail: unknown categories fall back to the first
/// catalog entry and unknown ids are ignored. The `try_*` variants report those
/// cases as [`EngineError`] instead and leave the state untouched.
///
/// The engine is `Send`; hosts that share it across threads should put the
/// whole engine behind one `Mutex` so each operation sees a consistent state.
pub struct ProgressEngine {
    config: Config,
    clock: Arc<dyn Clock>,
    catalog: CategoryCatalog,
    state: ProgressState,
    bus: SnapshotBus,
    version: u64,
}

impl fmt::Debug for ProgressEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl Default for ProgressEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ProgressEngine {
    pub fn new(config: Config, clock: Arc<dyn Clock>) -> Self {
        let state = ProgressState::initial(&config);
        Self {
            config,
            clock,
            catalog: CategoryCatalog::default(),
            state,
            bus: SnapshotBus::default(),
            version: 0,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(Config::default(), Arc::new(SystemClock))
    }

    // ---- transactions -------------------------------------------------

    /// Logs a new expense and returns its id.
    ///
    /// Amount and description are taken as given; callers validate them.
    pub fn add_transaction(
        &mut self,
        amount: f64,
        category_id: &str,
        description: &str,
    ) -> TransactionId {
        let category = match self.catalog.resolve(category_id) {
            Ok(category) => category.clone(),
            Err(err) => {
                let fallback = self.catalog.fallback().clone();
                debug!(%err, fallback = %fallback.id, "using fallback category");
                fallback
            }
        };
        self.record_transaction(amount, category, description)
    }

    /// Like [`add_transaction`](Self::add_transaction) but rejects unknown categories.
    pub fn try_add_transaction(
        &mut self,
        amount: f64,
        category_id: &str,
        description: &str,
    ) -> EngineResult<TransactionId> {
        let category = self.catalog.resolve(category_id)?.clone();
        Ok(self.record_transaction(amount, category, description))
    }

    /// Corrects an existing transaction in place. Unknown ids are ignored.
    ///
    /// Experience and streak are left alone; an edit is not a new logging event.
    pub fn edit_transaction(
        &mut self,
        id: TransactionId,
        amount: f64,
        category_id: &str,
        description: &str,
    ) {
        let category = self.catalog.resolve_or_fallback(category_id).clone();
        if let Err(err) = self.replace_transaction(id, amount, category, description) {
            debug!(%err, "edit ignored");
        }
    }

    pub fn try_edit_transaction(
        &mut self,
        id: TransactionId,
        amount: f64,
        category_id: &str,
        description: &str,
    ) -> EngineResult<()> {
        self.position(id)?;
        let category = self.catalog.resolve(category_id)?.clone();
        self.replace_transaction(id, amount, category, description)
    }

    /// Removes a transaction. Unknown ids are ignored.
    ///
    /// Experience, level, streak and unlocked achievements are kept.
    pub fn delete_transaction(&mut self, id: TransactionId) {
        if let Err(err) = self.remove_transaction(id) {
            debug!(%err, "delete ignored");
        }
    }

    pub fn try_delete_transaction(&mut self, id: TransactionId) -> EngineResult<Transaction> {
        self.remove_transaction(id)
    }

    fn record_transaction(
        &mut self,
        amount: f64,
        category: Category,
        description: &str,
    ) -> TransactionId {
        let now = self.clock.now();
        let transaction = Transaction::new(amount, category, description, now);
        let id = transaction.id;
        debug!(%id, amount, category = %transaction.category.id, "transaction logged");

        self.state.transactions.insert(0, transaction);
        self.state.total_spent = self.sum_of_amounts();

        let streak_days = streak::next_streak(
            self.state.streak_days,
            self.state.last_transaction_date,
            now,
        );
        self.state.streak_days = streak_days;
        self.state.last_transaction_date = Some(now);

        let rewards = self.config.rewards;
        self.apply_xp(rewards.log_xp);
        if self.budget_remaining() > 0.0 {
            self.apply_xp(rewards.under_budget_bonus);
        }
        if streak_days >= rewards.streak_bonus_threshold {
            self.apply_xp(rewards.streak_bonus);
        }

        self.sweep_achievements();
        self.commit();
        id
    }

    fn replace_transaction(
        &mut self,
        id: TransactionId,
        amount: f64,
        category: Category,
        description: &str,
    ) -> EngineResult<()> {
        let index = self.position(id)?;
        let transaction = &mut self.state.transactions[index];
        let delta = amount - transaction.amount;
        transaction.amount = amount;
        transaction.category = category;
        transaction.description = description.to_string();

        self.state.total_spent = self.sum_of_amounts().max(0.0);
        debug!(%id, amount, delta, "transaction edited");
        self.commit();
        Ok(())
    }

    fn remove_transaction(&mut self, id: TransactionId) -> EngineResult<Transaction> {
        let index = self.position(id)?;
        let removed = self.state.transactions.remove(index);
        self.state.total_spent = self.sum_of_amounts().max(0.0);
        debug!(%id, amount = removed.amount, "transaction deleted");
        self.commit();
        Ok(removed)
    }

    /// Recomputed over the whole list so no rounding residue survives a delete.
    fn sum_of_amounts(&self) -> f64 {
        self.state
            .transactions
            .iter()
            .fold(0.0, |total, transaction| total + transaction.amount)
    }

    fn position(&self, id: TransactionId) -> EngineResult<usize> {
        self.state
            .transactions
            .iter()
            .position(|transaction| transaction.id == id)
            .ok_or(EngineError::TransactionNotFound(id))
    }

    // ---- experience and achievements ------------------------------------

    /// Grants experience, levelling up at most once.
    pub fn add_xp(&mut self, amount: u32) {
        if self.apply_xp(amount) {
            self.commit();
        }
    }

    /// Inserts `id` into the unlocked set. Already unlocked ids are a no-op.
    pub fn unlock_achievement(&mut self, id: &str) {
        if self.state.achievements.insert(id.to_string()) {
            info!(achievement = id, "achievement unlocked");
            self.commit();
        }
    }

    /// Runs the unlock rules and returns the ids unlocked by this sweep.
    pub fn check_achievements(&mut self) -> Vec<String> {
        let unlocked = self.sweep_achievements();
        if !unlocked.is_empty() {
            self.commit();
        }
        unlocked
    }

    fn apply_xp(&mut self, amount: u32) -> bool {
        if amount == 0 {
            return false;
        }
        let outcome = self
            .state
            .progression
            .add_xp(amount, self.config.rewards.level_step());
        if let XpOutcome::LeveledUp { level } = outcome {
            info!(level, "level up");
            self.sweep_achievements();
        }
        true
    }

    fn sweep_achievements(&mut self) -> Vec<String> {
        let ctx = self.achievement_context();
        let unlocked = achievements::evaluate(&ctx, &mut self.state.achievements);
        for id in &unlocked {
            info!(achievement = %id, "achievement unlocked");
        }
        unlocked
    }

    fn achievement_context(&self) -> AchievementContext {
        AchievementContext {
            transaction_count: self.transaction_count(),
            level: self.state.progression.level,
            xp: self.state.progression.xp,
            streak_days: self.state.streak_days,
            budget_percentage: budget::percentage(
                self.budget_remaining(),
                self.state.monthly_budget,
            ),
        }
    }

    // ---- budget and lifecycle -----------------------------------------

    pub fn set_monthly_budget(&mut self, amount: f64) {
        self.state.monthly_budget = amount;
        info!(amount, remaining = self.budget_remaining(), "monthly budget set");
        self.commit();
    }

    /// Restores the initial snapshot, discarding transactions and achievements.
    pub fn reset_all_data(&mut self) {
        self.state = ProgressState::initial(&self.config);
        info!("progress reset");
        self.commit();
    }

    // ---- notifications ------------------------------------------------

    /// Receives one snapshot after every operation that changed state.
    pub fn subscribe(&mut self) -> mpsc::Receiver<Arc<ProgressSnapshot>> {
        self.bus.subscribe()
    }

    fn commit(&mut self) {
        self.version += 1;
        if self.bus.has_subscribers() {
            let snapshot = self.snapshot();
            self.bus.publish(&snapshot);
        }
    }

    // ---- reads --------------------------------------------------------

    pub fn snapshot(&self) -> Arc<ProgressSnapshot> {
        Arc::new(ProgressSnapshot {
            version: self.version,
            level: self.level(),
            xp: self.xp(),
            xp_to_next_level: self.xp_to_next_level(),
            total_spent: self.total_spent(),
            budget_remaining: self.budget_remaining(),
            monthly_budget: self.monthly_budget(),
            achievements: self.state.achievements.clone(),
            transactions: self.state.transactions.clone(),
            categories: self.catalog.as_slice().to_vec(),
            transaction_count: self.transaction_count(),
            streak_days: self.streak_days(),
            last_transaction_date: self.last_transaction_date(),
        })
    }

    pub fn level(&self) -> u32 {
        self.state.progression.level
    }

    pub fn xp(&self) -> u32 {
        self.state.progression.xp
    }

    pub fn xp_to_next_level(&self) -> u32 {
        self.state.progression.xp_to_next_level
    }

    pub fn progression(&self) -> Progression {
        self.state.progression
    }

    pub fn total_spent(&self) -> f64 {
        self.state.total_spent
    }

    /// Derived from budget and total on every read, always within `[0, monthly_budget]`.
    pub fn budget_remaining(&self) -> f64 {
        budget::remaining(self.state.monthly_budget, self.state.total_spent)
    }

    pub fn monthly_budget(&self) -> f64 {
        self.state.monthly_budget
    }

    pub fn achievements(&self) -> &BTreeSet<String> {
        &self.state.achievements
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.state.achievements.contains(id)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.state.transactions
    }

    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.state
            .transactions
            .iter()
            .find(|transaction| transaction.id == id)
    }

    pub fn categories(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn transaction_count(&self) -> usize {
        self.state.transactions.len()
    }

    pub fn streak_days(&self) -> u32 {
        self.state.streak_days
    }

    pub fn last_transaction_date(&self) -> Option<DateTime<Utc>> {
        self.state.last_transaction_date
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}
