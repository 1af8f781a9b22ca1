//! Ranked-list metric primitives used by the per-topic evaluator.
//!
//! Curves are rank-indexed slices where element `r - 1` holds the value at
//! rank `r`. Every function here is total: degenerate inputs produce a defined
//! number (usually 0.0) instead of NaN or a panic.
//!
//! # References
//!
//! - Järvelin & Kekäläinen (2002). "Cumulated gain-based evaluation of IR techniques"
//! - Voorhees & Harman (2005). "TREC: Experiment and Evaluation in Information Retrieval"

// ============================================================================
// Discounted Cumulative Gain
// ============================================================================

/// Computes the gain for a relevance grade.
///
/// Uses exponential gain: 2^rel - 1, so rel=1 -> 1, rel=2 -> 3.
/// Negative grades are penalties: rel=-1 -> -0.5.
#[inline]
pub fn gain(relevance: i32) -> f64 {
    2f64.powi(relevance) - 1.0
}

/// Computes the discount for a 0-indexed position: log₂(i + 2).
#[inline]
pub fn discount(index: usize) -> f64 {
    (index as f64 + 2.0).log2()
}

/// Cumulative gain: the sum of the judged grades, negative ones included.
pub fn cumulative_gain(relevances: &[i32]) -> f64 {
    relevances.iter().map(|&r| r as f64).sum()
}

/// Discounted cumulative gain of relevances in rank order.
///
/// ```text
/// DCG = Σ (2^rel_i - 1) / log₂(i + 2)   for 0-indexed i
/// ```
pub fn dcg(relevances: &[i32]) -> f64 {
    relevances
        .iter()
        .enumerate()
        .map(|(i, &rel)| gain(rel) / discount(i))
        .sum()
}

/// DCG of the same relevances in the best possible order.
pub fn ideal_dcg(relevances: &[i32]) -> f64 {
    let mut ideal = relevances.to_vec();
    ideal.sort_unstable_by(|a, b| b.cmp(a));
    dcg(&ideal)
}

/// Normalized DCG. Defined as 0.0 when the ideal DCG is not positive.
///
/// The ideal ordering maximizes DCG, so the result never exceeds 1.0; it can
/// drop below 0.0 when negative grades outweigh the relevant ones.
pub fn ndcg(dcg: f64, ideal_dcg: f64) -> f64 {
    if ideal_dcg > 0.0 {
        dcg / ideal_dcg
    } else {
        0.0
    }
}

// ============================================================================
// Set-Based Metrics
// ============================================================================

/// Harmonic mean of precision and recall; 0.0 unless both are nonzero.
pub fn f1(precision: f64, recall: f64) -> f64 {
    if precision > 0.0 && recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

/// Reads a rank-indexed curve at a 1-based rank, clamped to the curve.
#[inline]
pub fn at_rank(curve: &[f64], rank: usize) -> f64 {
    match curve.len() {
        0 => 0.0,
        len => curve[rank.clamp(1, len) - 1],
    }
}

// ============================================================================
// R-Precision
// ============================================================================

/// Precision after `num_relevant` documents.
///
/// When fewer documents were retrieved than are relevant, the answer is
/// `num_rel_ret / num_relevant`. Otherwise the precision curve is read at
/// rank ⌊R⌋ and, for a fractional R, interpolated linearly toward rank ⌊R⌋+1.
pub fn r_precision(
    precision: &[f64],
    num_relevant: f64,
    num_ret: usize,
    num_rel_ret: usize,
) -> f64 {
    if num_relevant <= 0.0 {
        return 0.0;
    }
    if num_relevant > num_ret as f64 {
        return num_rel_ret as f64 / num_relevant;
    }

    let whole = num_relevant.floor();
    let frac = num_relevant - whole;
    let rank = whole as usize;
    let base = at_rank(precision, rank);
    if frac == 0.0 {
        base
    } else {
        let next = at_rank(precision, rank + 1);
        base + frac * (next - base)
    }
}

// ============================================================================
// Interpolated Precision
// ============================================================================

/// Makes a precision curve non-increasing with rank.
///
/// Each value becomes the maximum precision at any greater or equal rank.
pub fn interpolate(precision: &[f64]) -> Vec<f64> {
    let mut interpolated = precision.to_vec();
    let mut best = 0.0f64;
    for value in interpolated.iter_mut().rev() {
        best = best.max(*value);
        *value = best;
    }
    interpolated
}

/// Interpolated precision at each recall level.
///
/// A single rank cursor starts at rank 1 and only moves forward across the
/// (ascending) levels. For each level it advances until recall at the cursor
/// reaches the level; the interpolated precision there is reported, or 0.0
/// if the curve ends first.
pub fn precision_at_recall_levels(
    interpolated: &[f64],
    recall: &[f64],
    levels: &[f64],
) -> Vec<f64> {
    let horizon = interpolated.len().min(recall.len());
    let mut rank = 1usize;

    levels
        .iter()
        .map(|&level| {
            while rank <= horizon && recall[rank - 1] < level {
                rank += 1;
            }
            if rank > horizon {
                0.0
            } else {
                interpolated[rank - 1]
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
