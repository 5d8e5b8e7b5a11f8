use crate::core::{allocate, normalize_to_100, redistribute};
use crate::domain::model::{AllocationResult, Purchase, Transaction, TransactionKind};
use crate::domain::ports::{Ledger, TargetStore};
use crate::utils::error::{PiggyError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_non_negative};
use chrono::{Local, NaiveDate};

/// Orchestrates the read-compute-write cycle around the pure core: fetch a
/// snapshot from the store, run the allocation or weight math, persist the
/// outcome. All state lives behind the ports.
pub struct GoalService<S> {
    store: S,
}

impl<S: TargetStore + Ledger> GoalService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current balance and the per-target allocation view, sorted by weight
    /// descending.
    pub fn status(&self) -> Result<(f64, Vec<AllocationResult>)> {
        let total_saved = self.store.total_saved()?;
        let targets = self.store.fetch_targets()?;
        let allocations = allocate(total_saved, &targets)?;
        Ok((total_saved, allocations))
    }

    /// Create a target and renormalize all weights to 100. Without an
    /// explicit weight the newcomer gets the mean of the existing weights
    /// (equal-share intent), or 100 when it is the first target.
    pub fn add_target(&mut self, name: &str, price: f64, weight: Option<u32>) -> Result<i64> {
        validate_non_empty_string("name", name)?;
        validate_non_negative("price", price)?;

        let existing = self.store.fetch_targets()?;
        let initial_weight = match weight {
            Some(w) => f64::from(w),
            None if existing.is_empty() => 100.0,
            None => {
                let total: f64 = existing.iter().map(|t| t.weight).sum();
                total / existing.len() as f64
            }
        };

        let id = self.store.insert_target(name, price, initial_weight)?;
        tracing::info!(id, name, price, weight = initial_weight, "target added");

        // Re-fetch and normalize so persisted weights sum to exactly 100.
        let all = self.store.fetch_targets()?;
        let raw: Vec<(i64, f64)> = all.iter().map(|t| (t.id, t.weight)).collect();
        for (tid, pct) in normalize_to_100(&raw) {
            self.store.persist_weight(tid, f64::from(pct))?;
        }

        Ok(id)
    }

    pub fn remove_target(&mut self, id: i64) -> Result<()> {
        self.store.delete_target(id)?;
        tracing::info!(id, "target removed");
        Ok(())
    }

    pub fn clear_targets(&mut self) -> Result<()> {
        self.store.clear_targets()?;
        tracing::info!("all targets cleared");
        Ok(())
    }

    /// Pin one target's weight to `pct` (clamped to 0..=100) and rescale the
    /// others to the leftover points. The rescaled sum may drift off 100;
    /// it is persisted as-is.
    pub fn set_weight(&mut self, id: i64, pct: u32) -> Result<()> {
        let pct = pct.min(100);
        let targets = self.store.fetch_targets()?;
        if !targets.iter().any(|t| t.id == id) {
            return Err(PiggyError::NotFound { kind: "target", id });
        }

        for (tid, weight) in redistribute(&targets, id, pct) {
            self.store.persist_weight(tid, weight)?;
        }
        tracing::info!(id, pct, "weight pinned and others rescaled");
        Ok(())
    }

    /// Buy a target outright: log the purchase at full price, drop the
    /// target, and mirror the purchase into the ledger so it shows up in the
    /// transactions view. The balance charges the purchase once, through the
    /// purchase log.
    pub fn buy_target(&mut self, id: i64) -> Result<Purchase> {
        let targets = self.store.fetch_targets()?;
        let target = targets
            .iter()
            .find(|t| t.id == id)
            .ok_or(PiggyError::NotFound { kind: "target", id })?;

        let purchase_id = self.store.record_purchase(&target.name, target.price)?;
        self.store.delete_target(id)?;
        self.store.record_transaction(
            Local::now().date_naive(),
            -target.price,
            "Target Purchase",
            TransactionKind::Purchase,
        )?;
        tracing::info!(id, name = %target.name, amount = target.price, "target purchased");

        let purchases = self.store.list_purchases()?;
        purchases
            .into_iter()
            .find(|p| p.id == purchase_id)
            .ok_or(PiggyError::NotFound {
                kind: "purchase",
                id: purchase_id,
            })
    }

    pub fn deposit(&mut self, date: NaiveDate, amount: f64, category: &str) -> Result<i64> {
        validate_non_negative("amount", amount)?;
        self.store
            .record_transaction(date, amount, category, TransactionKind::Save)
    }

    /// Record money spent outside the targets. Stored negative so the
    /// balance is a plain sum over the ledger.
    pub fn spend(&mut self, date: NaiveDate, amount: f64, category: &str) -> Result<i64> {
        validate_non_negative("amount", amount)?;
        self.store
            .record_transaction(date, -amount, category, TransactionKind::Spend)
    }

    pub fn transactions(&self) -> Result<Vec<Transaction>> {
        self.store.list_transactions()
    }

    pub fn purchases(&self) -> Result<Vec<Purchase>> {
        self.store.list_purchases()
    }
}
