//! Error-count based scoring policy.
//!
//! The deduction table is deliberately lenient: even eleven or more errors
//! only lose seven points, so a submission never drops below half of the
//! category maximum in practice.

/// Compute a final score from the number of errors found.
///
/// Deduction steps: 0 → 0, 1 → 1, 2 → 2, 3-4 → 3, 5-7 → 4, 8-10 → 5,
/// 11+ → 7. Clamps at zero for maximums smaller than the deduction.
pub fn calculate_score(error_count: usize, max_score: u32) -> u32 {
    let deduction = match error_count {
        0 => 0,
        1 => 1,
        2 => 2,
        3..=4 => 3,
        5..=7 => 4,
        8..=10 => 5,
        _ => 7,
    };

    max_score.saturating_sub(deduction)
}
