pub mod allocation;
pub mod rounding;
pub mod weights;

pub use allocation::allocate;
pub use rounding::largest_remainder;
pub use weights::{normalize_to_100, redistribute};
