mod pairing;
mod split;

pub use pairing::{discover_pairs, ImagePair};
pub use split::{compute_split_counts, shuffle_pairs, SplitCount};
