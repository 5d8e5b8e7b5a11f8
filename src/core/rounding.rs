//! Largest-remainder rounding: turn relative weights into integer
//! percentages that sum to exactly 100.

/// Convert a sequence of weights into integer percentages summing to exactly
/// 100, preserving input order. Negative weights are treated as 0. When every
/// weight is zero (or the list is empty) the result is all zeros.
///
/// Each share is floored, then the leftover points are handed out one by one
/// to the entries with the largest fractional remainders. Ties go to the
/// earlier input position, which keeps the output deterministic.
pub fn largest_remainder(weights: &[f64]) -> Vec<u32> {
    let clamped: Vec<f64> = weights.iter().map(|w| w.max(0.0)).collect();
    let total: f64 = clamped.iter().sum();
    if total <= 0.0 {
        return vec![0; weights.len()];
    }

    let mut floors = Vec::with_capacity(clamped.len());
    let mut remainders = Vec::with_capacity(clamped.len());
    for (i, w) in clamped.iter().enumerate() {
        let exact = w / total * 100.0;
        let floor = exact.floor();
        floors.push(floor as u32);
        remainders.push((i, exact - floor));
    }

    let deficit = 100 - floors.iter().sum::<u32>();

    // Stable sort: equal remainders keep input order, so earlier items win.
    remainders.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    for &(i, _) in remainders.iter().take(deficit as usize) {
        floors[i] += 1;
    }

    floors
}
