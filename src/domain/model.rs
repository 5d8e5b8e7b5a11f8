use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A savings goal: money flows toward it in proportion to its weight until
/// the price is covered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: i64,
    pub name: String,
    pub price: f64,
    /// Relative priority. Zero means the target never receives money.
    pub weight: f64,
}

/// One target's slice of the current balance, as computed by
/// [`crate::core::allocation::allocate`]. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationResult {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub weight: f64,
    /// Money provisionally assigned, rounded to cents. Always within
    /// `0..=price`.
    pub allocated: f64,
    /// `allocated / price` as a percentage in `0..=100`, one decimal.
    pub progress: f64,
    /// Largest-remainder share of this target's weight among all targets.
    /// The column sums to exactly 100 unless every weight is zero.
    pub display_weight_pct: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Save,
    Spend,
    /// Mirror of a purchase-log entry so bought targets show up in the
    /// ledger. Display-only: the balance charges purchases through the
    /// purchase log, not through these rows.
    Purchase,
}

/// Ledger entry. Deposits carry positive amounts, spends negative, so the
/// balance is a plain sum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: f64,
    pub category: String,
    pub kind: TransactionKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    pub id: i64,
    pub target_name: String,
    pub amount: f64,
    pub purchased_at: DateTime<Utc>,
}
