pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::JsonStore;
pub use app::GoalService;
pub use core::{allocate, largest_remainder, normalize_to_100, redistribute};
pub use domain::{AllocationResult, Ledger, Target, TargetStore, Transaction, TransactionKind};
pub use utils::error::{PiggyError, Result};
