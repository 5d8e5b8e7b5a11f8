//! Weight editing: normalization of raw weights to integer percentages and
//! the best-effort rescale applied when one weight is set by hand.

use crate::core::rounding::largest_remainder;
use crate::domain::model::Target;
use std::collections::HashMap;

/// Convert raw weights into integer percentages summing to exactly 100,
/// keyed by target id. Negative raw weights are silently floored to 0 here;
/// the allocation engine instead rejects them outright. That asymmetry is
/// intentional and covered by tests.
pub fn normalize_to_100(items: &[(i64, f64)]) -> HashMap<i64, u32> {
    let weights: Vec<f64> = items.iter().map(|&(_, w)| w).collect();
    let pcts = largest_remainder(&weights);
    items.iter().map(|&(id, _)| id).zip(pcts).collect()
}

/// Rescale weights after the user pins one target to `new_pct` (caller clamps
/// to 0..=100). The edited target gets `new_pct`; every other target keeps its
/// relative standing within the remaining `100 - new_pct` points, rounded to
/// the nearest integer. The rescaled sum may drift off 100; that drift is the
/// documented behavior, not something to renormalize away.
///
/// Returns `(id, new_weight)` for every target, in input order.
pub fn redistribute(targets: &[Target], edited_id: i64, new_pct: u32) -> Vec<(i64, f64)> {
    let other_total: f64 = targets
        .iter()
        .filter(|t| t.id != edited_id)
        .map(|t| t.weight)
        .sum();

    targets
        .iter()
        .map(|t| {
            if t.id == edited_id {
                (t.id, f64::from(new_pct))
            } else if other_total > 0.0 {
                let scaled = t.weight * (100.0 - f64::from(new_pct)) / other_total;
                // Half-points round to even, e.g. 22.5 -> 22 but 33.5 -> 34.
                (t.id, scaled.round_ties_even())
            } else {
                (t.id, 0.0)
            }
        })
        .collect()
}
