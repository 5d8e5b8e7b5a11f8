use crate::domain::model::{Purchase, Target, Transaction, TransactionKind};
use crate::domain::ports::{Ledger, TargetStore};
use crate::utils::error::{PiggyError, Result};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    targets: Vec<Target>,
    transactions: Vec<Transaction>,
    purchases: Vec<Purchase>,
    next_target_id: i64,
    next_transaction_id: i64,
    next_purchase_id: i64,
}

/// Single-file JSON persistence for targets, the transaction ledger, and the
/// purchase log. The whole state is loaded at open and rewritten after every
/// mutation; fine for a personal data file, not meant for concurrent writers.
pub struct JsonStore {
    path: PathBuf,
    state: StoreState,
}

impl JsonStore {
    /// Open the store at `path`, creating an empty state when the file does
    /// not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            tracing::debug!(path = %path.display(), "data file missing, starting empty");
            StoreState {
                next_target_id: 1,
                next_transaction_id: 1,
                next_purchase_id: 1,
                ..StoreState::default()
            }
        };
        Ok(Self { path, state })
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(&self.state)?;
        std::fs::write(&self.path, raw)?;
        tracing::debug!(path = %self.path.display(), "state written");
        Ok(())
    }
}

impl TargetStore for JsonStore {
    fn fetch_targets(&self) -> Result<Vec<Target>> {
        Ok(self.state.targets.clone())
    }

    fn insert_target(&mut self, name: &str, price: f64, weight: f64) -> Result<i64> {
        let id = self.state.next_target_id;
        self.state.next_target_id += 1;
        self.state.targets.push(Target {
            id,
            name: name.to_string(),
            price,
            weight,
        });
        self.save()?;
        Ok(id)
    }

    fn persist_weight(&mut self, id: i64, weight: f64) -> Result<()> {
        let target = self
            .state
            .targets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(PiggyError::NotFound { kind: "target", id })?;
        target.weight = weight;
        self.save()
    }

    fn delete_target(&mut self, id: i64) -> Result<()> {
        let before = self.state.targets.len();
        self.state.targets.retain(|t| t.id != id);
        if self.state.targets.len() == before {
            return Err(PiggyError::NotFound { kind: "target", id });
        }
        self.save()
    }

    fn clear_targets(&mut self) -> Result<()> {
        self.state.targets.clear();
        self.save()
    }
}

impl Ledger for JsonStore {
    fn record_transaction(
        &mut self,
        date: NaiveDate,
        amount: f64,
        category: &str,
        kind: TransactionKind,
    ) -> Result<i64> {
        let id = self.state.next_transaction_id;
        self.state.next_transaction_id += 1;
        self.state.transactions.push(Transaction {
            id,
            date,
            amount,
            category: category.to_string(),
            kind,
        });
        self.save()?;
        Ok(id)
    }

    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let mut transactions = self.state.transactions.clone();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    fn record_purchase(&mut self, target_name: &str, amount: f64) -> Result<i64> {
        let id = self.state.next_purchase_id;
        self.state.next_purchase_id += 1;
        self.state.purchases.push(Purchase {
            id,
            target_name: target_name.to_string(),
            amount,
            purchased_at: Utc::now(),
        });
        self.save()?;
        Ok(id)
    }

    fn list_purchases(&self) -> Result<Vec<Purchase>> {
        let mut purchases = self.state.purchases.clone();
        purchases.sort_by(|a, b| b.purchased_at.cmp(&a.purchased_at));
        Ok(purchases)
    }
}
