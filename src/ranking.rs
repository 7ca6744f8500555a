//! Rank math shared by the signature models.
//!
//! Ranks follow the "min" tie-breaking convention: every member of a tie
//! receives the lowest ordinal position the group would occupy when sorted
//! ascending, so ranks start at 1 and may leave gaps after ties.
use ndarray::{Array1, Array2, ArrayView1};

/// Rank the values of a vector with "min" tie-breaking.
///
/// `output[i]` is 1 plus the number of elements strictly smaller than
/// `values[i]`. A length-1 input ranks to `[1.0]`; an empty input yields an
/// empty vector (callers guard empties before ranking).
///
/// # Arguments
///
/// * `values` - The vector to rank. Values must be finite.
///
/// # Returns
///
/// A vector of the same length holding the rank of each position.
pub fn rank_min(values: ArrayView1<f32>) -> Array1<f32> {
    let mut order = (0..values.len()).collect::<Vec<usize>>();
    order.sort_unstable_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap());

    let mut ranks = Array1::<f32>::zeros(values.len());
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // every member of a tie gets the lowest position of the group
        for &idx in &order[start..end] {
            ranks[idx] = (start + 1) as f32;
        }
        start = end;
    }

    ranks
}

/// Aggregate selected rows of a feature matrix into one consensus ranking.
///
/// This is the Borda count applied to rankings: each selected row is ranked
/// with [`rank_min`], the rank vectors are summed element-wise, and the sums
/// are ranked again so the result lives on the same [1, F] scale as any
/// single sample's ranking. A single-row selection therefore degenerates to
/// that row's own ranking.
///
/// # Arguments
///
/// * `x` - Feature matrix, rows are samples.
/// * `rows` - Indices of the rows to aggregate (must be non-empty).
///
/// # Returns
///
/// The consensus min-ranking over the selected rows.
pub fn borda_signature(x: &Array2<f32>, rows: &[usize]) -> Array1<f32> {
    let mut accumulated = Array1::<f32>::zeros(x.ncols());
    for &row in rows {
        accumulated += &rank_min(x.row(row));
    }
    rank_min(accumulated.view())
}

/// Per-feature weights derived from a signature row.
///
/// `w[f] = |F - 1 - 2 * (signature[f] - 1)|`, maximal when the signature
/// rank sits at either extreme and zero at the exact middle: decisive
/// rankings carry more evidence than middling ones.
pub fn rank_weights(signature: ArrayView1<f32>) -> Array1<f32> {
    let span = signature.len() as f32 - 1.0;
    signature.mapv(|s| (span - 2.0 * (s - 1.0)).abs())
}

/// Spearman-style L1 distance between a query ranking and a signature.
///
/// Unweighted this is the plain sum of absolute rank differences; with
/// `weights` each feature's term is scaled by the corresponding weight.
pub fn spearman_distance(
    signature: ArrayView1<f32>,
    query_rank: ArrayView1<f32>,
    weights: Option<ArrayView1<f32>>,
) -> f32 {
    match weights {
        Some(w) => signature
            .iter()
            .zip(query_rank.iter())
            .zip(w.iter())
            .map(|((s, q), w)| (s - q).abs() * w)
            .sum(),
        None => signature
            .iter()
            .zip(query_rank.iter())
            .map(|(s, q)| (s - q).abs())
            .sum(),
    }
}
