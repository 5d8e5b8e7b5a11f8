// Domain layer: models and ports (interfaces). Nothing here touches the
// filesystem; adapters implement the ports.

pub mod model;
pub mod ports;

pub use model::{AllocationResult, Purchase, Target, Transaction, TransactionKind};
pub use ports::{Ledger, TargetStore};
