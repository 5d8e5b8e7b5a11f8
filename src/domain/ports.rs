use crate::domain::model::{Purchase, Target, Transaction, TransactionKind};
use crate::utils::error::Result;
use chrono::NaiveDate;

/// Persistence boundary for targets. The allocation core only ever sees a
/// snapshot from `fetch_targets`; it never writes back.
pub trait TargetStore {
    fn fetch_targets(&self) -> Result<Vec<Target>>;
    fn insert_target(&mut self, name: &str, price: f64, weight: f64) -> Result<i64>;
    fn persist_weight(&mut self, id: i64, weight: f64) -> Result<()>;
    fn delete_target(&mut self, id: i64) -> Result<()>;
    fn clear_targets(&mut self) -> Result<()>;
}

/// Persistence boundary for the money side: the transaction ledger and the
/// purchase log.
pub trait Ledger {
    fn record_transaction(
        &mut self,
        date: NaiveDate,
        amount: f64,
        category: &str,
        kind: TransactionKind,
    ) -> Result<i64>;
    fn list_transactions(&self) -> Result<Vec<Transaction>>;
    fn record_purchase(&mut self, target_name: &str, amount: f64) -> Result<i64>;
    fn list_purchases(&self) -> Result<Vec<Purchase>>;

    /// Current balance: sum of signed transaction amounts minus purchases,
    /// clamped to zero. Purchase-mirror rows are skipped; counting them on
    /// top of the purchase log would charge every bought target twice.
    fn total_saved(&self) -> Result<f64> {
        let saved: f64 = self
            .list_transactions()?
            .iter()
            .filter(|t| t.kind != TransactionKind::Purchase)
            .map(|t| t.amount)
            .sum();
        let spent: f64 = self.list_purchases()?.iter().map(|p| p.amount).sum();
        Ok((saved - spent).max(0.0))
    }
}
