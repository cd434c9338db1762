use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::info;

use super::ImagePair;
use crate::config::SplitRatio;

/// Number of pairs assigned to one named split
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitCount {
    pub name: String,
    pub count: usize,
}

/// Randomize pair order in place. Pair contents are untouched.
pub fn shuffle_pairs<R: Rng + ?Sized>(pairs: &mut [ImagePair], rng: &mut R) {
    pairs.shuffle(rng);
    info!("Shuffled {} pairs", pairs.len());
}

/// Turn fractions into per-split pair counts.
///
/// Every split but the last gets `floor(total * fraction)`. The last split
/// takes `total` minus everything already assigned, so the counts always add
/// up to `total`. If the earlier fractions already overshoot, the last split
/// gets nothing rather than a negative count.
pub fn compute_split_counts(total: usize, splits: &[SplitRatio]) -> Vec<SplitCount> {
    let mut counts = Vec::with_capacity(splits.len());
    let mut assigned = 0usize;

    for (idx, split) in splits.iter().enumerate() {
        let count = if idx + 1 == splits.len() {
            total.saturating_sub(assigned)
        } else {
            (total as f64 * split.fraction).floor() as usize
        };
        assigned += count;
        counts.push(SplitCount {
            name: split.name.clone(),
            count,
        });
    }

    counts
}
