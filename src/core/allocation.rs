//! Waterfall allocation: split the saved balance across weighted targets,
//! cascading overflow from saturated targets to the rest.

use crate::core::rounding::largest_remainder;
use crate::domain::model::{AllocationResult, Target};
use crate::utils::error::{PiggyError, Result};

/// Residue below this is treated as zero; guards the loop against
/// floating-point dust that would otherwise spin extra rounds.
const EPSILON: f64 = 1e-9;

/// Split `total_saved` across `targets` in proportion to their weights,
/// never over-funding any target past its price. Money a saturated target
/// cannot absorb cascades to the remaining active targets in the next round.
///
/// Targets with weight 0 never receive money. A negative weight fails the
/// whole call with a validation error; nothing partial is returned. Results
/// come back sorted by weight descending (stable, so equal weights keep the
/// input order).
pub fn allocate(total_saved: f64, targets: &[Target]) -> Result<Vec<AllocationResult>> {
    for t in targets {
        if t.weight < 0.0 {
            return Err(PiggyError::ValidationError {
                message: format!("negative weight not allowed: {}", t.name),
            });
        }
    }

    let mut allocated = vec![0.0_f64; targets.len()];
    let mut remaining = total_saved;
    // Weight-0 targets never enter the active set, so total_weight below is
    // always positive inside the loop.
    let mut active: Vec<usize> = (0..targets.len())
        .filter(|&i| targets[i].weight > 0.0)
        .collect();

    // Every round either saturates a target or exhausts the money, so
    // len + 1 rounds always suffice; the cap is a backstop.
    let max_rounds = targets.len() + 1;
    let mut round = 0;

    while remaining > EPSILON && !active.is_empty() && round < max_rounds {
        round += 1;
        let total_weight: f64 = active.iter().map(|&i| targets[i].weight).sum();
        let mut excess = 0.0;
        let mut next_active = Vec::with_capacity(active.len());

        for &i in &active {
            let share = remaining * targets[i].weight / total_weight;
            let capacity = targets[i].price - allocated[i];

            if share >= capacity {
                allocated[i] = targets[i].price;
                excess += share - capacity;
            } else {
                allocated[i] += share;
                next_active.push(i);
            }
        }

        tracing::trace!(round, excess, active = next_active.len(), "allocation round");
        remaining = excess;
        active = next_active;
    }

    let display_pcts = largest_remainder(&targets.iter().map(|t| t.weight).collect::<Vec<_>>());

    let mut results: Vec<AllocationResult> = targets
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let progress = if t.price > 0.0 {
                (allocated[i] / t.price).min(1.0)
            } else {
                // Zero-price targets are trivially funded.
                1.0
            };
            AllocationResult {
                id: t.id,
                name: t.name.clone(),
                price: t.price,
                weight: t.weight,
                allocated: round_to(allocated[i], 2),
                progress: round_to(progress * 100.0, 1),
                display_weight_pct: display_pcts[i],
            }
        })
        .collect();

    // Stable sort keeps the input order among equal weights.
    results.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));

    Ok(results)
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(id: i64, name: &str, price: f64, weight: f64) -> Target {
        Target {
            id,
            name: name.to_string(),
            price,
            weight,
        }
    }

    fn by_id(results: &[AllocationResult], id: i64) -> &AllocationResult {
        results.iter().find(|r| r.id == id).unwrap()
    }

    #[test]
    fn test_proportional_split_without_saturation() {
        let targets = vec![
            target(1, "A", 100.0, 70.0),
            target(2, "B", 50.0, 30.0),
        ];
        let results = allocate(120.0, &targets).unwrap();

        let a = by_id(&results, 1);
        assert_eq!(a.allocated, 84.0);
        assert_eq!(a.progress, 84.0);
        assert_eq!(a.display_weight_pct, 70);

        let b = by_id(&results, 2);
        assert_eq!(b.allocated, 36.0);
        assert_eq!(b.progress, 72.0);
        assert_eq!(b.display_weight_pct, 30);
    }

    #[test]
    fn test_overflow_cascades_to_unsaturated_targets() {
        let targets = vec![
            target(1, "A", 10.0, 50.0),
            target(2, "B", 1000.0, 50.0),
        ];
        let results = allocate(100.0, &targets).unwrap();

        let a = by_id(&results, 1);
        assert_eq!(a.allocated, 10.0);
        assert_eq!(a.progress, 100.0);

        let b = by_id(&results, 2);
        assert_eq!(b.allocated, 90.0);
        assert_eq!(b.progress, 9.0);
    }

    #[test]
    fn test_never_invents_money() {
        let targets = vec![
            target(1, "A", 40.0, 10.0),
            target(2, "B", 25.0, 20.0),
            target(3, "C", 60.0, 5.0),
        ];
        let results = allocate(80.0, &targets).unwrap();
        let total: f64 = results.iter().map(|r| r.allocated).sum();
        assert!(total <= 80.0 + 1e-6);
        for r in &results {
            assert!(r.allocated <= r.price + 1e-6);
            assert!(r.allocated >= 0.0);
        }
    }

    #[test]
    fn test_everything_saturates_when_money_abounds() {
        let targets = vec![
            target(1, "A", 10.0, 1.0),
            target(2, "B", 20.0, 2.0),
            target(3, "C", 30.0, 3.0),
        ];
        let results = allocate(1_000.0, &targets).unwrap();
        for r in &results {
            assert_eq!(r.allocated, r.price);
            assert_eq!(r.progress, 100.0);
        }
    }

    #[test]
    fn test_zero_weight_targets_get_nothing() {
        let targets = vec![
            target(1, "A", 100.0, 0.0),
            target(2, "B", 100.0, 50.0),
        ];
        let results = allocate(500.0, &targets).unwrap();
        assert_eq!(by_id(&results, 1).allocated, 0.0);
        assert_eq!(by_id(&results, 2).allocated, 100.0);
    }

    #[test]
    fn test_all_zero_weights_is_a_defined_outcome() {
        let targets = vec![
            target(1, "A", 100.0, 0.0),
            target(2, "B", 100.0, 0.0),
        ];
        let results = allocate(500.0, &targets).unwrap();
        for r in &results {
            assert_eq!(r.allocated, 0.0);
            assert_eq!(r.progress, 0.0);
            assert_eq!(r.display_weight_pct, 0);
        }
    }

    #[test]
    fn test_negative_weight_rejected() {
        // The engine rejects what the normalizer would merely clamp.
        let targets = vec![
            target(1, "A", 100.0, 50.0),
            target(2, "B", 100.0, -1.0),
        ];
        let err = allocate(100.0, &targets).unwrap_err();
        assert!(matches!(err, PiggyError::ValidationError { .. }));
    }

    #[test]
    fn test_empty_target_list() {
        let results = allocate(100.0, &[]).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_zero_saved_allocates_nothing() {
        let targets = vec![target(1, "A", 100.0, 50.0)];
        let results = allocate(0.0, &targets).unwrap();
        assert_eq!(results[0].allocated, 0.0);
        assert_eq!(results[0].progress, 0.0);
    }

    #[test]
    fn test_monotonic_in_total_saved() {
        let targets = vec![
            target(1, "A", 30.0, 60.0),
            target(2, "B", 80.0, 25.0),
            target(3, "C", 45.0, 15.0),
        ];
        let mut previous = vec![0.0; targets.len()];
        for saved in [0.0, 10.0, 25.0, 60.0, 100.0, 155.0, 400.0] {
            let results = allocate(saved, &targets).unwrap();
            for (i, t) in targets.iter().enumerate() {
                let now = by_id(&results, t.id).allocated;
                assert!(
                    now + 1e-6 >= previous[i],
                    "allocated for {} dropped from {} to {} at saved={}",
                    t.name,
                    previous[i],
                    now,
                    saved
                );
                previous[i] = now;
            }
        }
    }

    #[test]
    fn test_sorted_by_weight_descending() {
        let targets = vec![
            target(1, "low", 10.0, 5.0),
            target(2, "high", 10.0, 80.0),
            target(3, "mid", 10.0, 15.0),
        ];
        let results = allocate(5.0, &targets).unwrap();
        let ids: Vec<i64> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_equal_weights_keep_input_order() {
        let targets = vec![
            target(7, "first", 10.0, 50.0),
            target(3, "second", 10.0, 50.0),
        ];
        let results = allocate(5.0, &targets).unwrap();
        let ids: Vec<i64> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![7, 3]);
    }

    #[test]
    fn test_zero_price_target_saturates_immediately() {
        let targets = vec![
            target(1, "free", 0.0, 50.0),
            target(2, "bike", 100.0, 50.0),
        ];
        let results = allocate(50.0, &targets).unwrap();
        assert_eq!(by_id(&results, 1).allocated, 0.0);
        assert_eq!(by_id(&results, 1).progress, 100.0);
        assert_eq!(by_id(&results, 2).allocated, 50.0);
    }

    #[test]
    fn test_display_percentages_sum_to_100() {
        let targets = vec![
            target(1, "A", 10.0, 1.0),
            target(2, "B", 10.0, 1.0),
            target(3, "C", 10.0, 1.0),
        ];
        let results = allocate(0.0, &targets).unwrap();
        let sum: u32 = results.iter().map(|r| r.display_weight_pct).sum();
        assert_eq!(sum, 100);
        // Tie-break: the first input position takes the leftover point.
        assert_eq!(by_id(&results, 1).display_weight_pct, 34);
        assert_eq!(by_id(&results, 2).display_weight_pct, 33);
        assert_eq!(by_id(&results, 3).display_weight_pct, 33);
    }
}
