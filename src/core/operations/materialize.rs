//! Writes the split assignment to disk.
//!
//! Each split gets `<output_root>/<split>/images` and
//! `<output_root>/<split>/labels`. Pairs are consumed in order from one
//! cursor shared by all splits, so every pair lands in exactly one split.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use super::file_ops::{copy_with_metadata, ensure_dir, FileOpResult};
use crate::core::dataset::{ImagePair, SplitCount};
use crate::core::SplitResult;

/// What happened to one split bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitOutcome {
    pub name: String,
    /// Pairs assigned to this split
    pub planned: usize,
    /// Pairs whose image and label were both copied
    pub copied: usize,
    pub failed: usize,
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
}

/// Copy every pair into the split it was assigned to.
///
/// `counts` must be in configured order. Copy failures are logged and
/// counted per split; they never stop the run. Failing to create a split's
/// directories does.
pub fn materialize(
    pairs: &[ImagePair],
    counts: &[SplitCount],
    output_root: &Path,
) -> SplitResult<Vec<SplitOutcome>> {
    let total = pairs.len();
    let mut cursor = 0usize;
    let mut outcomes = Vec::with_capacity(counts.len());

    for split in counts {
        let images_dir = output_root.join(&split.name).join("images");
        let labels_dir = output_root.join(&split.name).join("labels");

        ensure_dir(&images_dir)?;
        ensure_dir(&labels_dir)?;
        info!("Created directories for '{}':", split.name);
        info!("  - {:?}", images_dir);
        info!("  - {:?}", labels_dir);

        let mut outcome = SplitOutcome {
            name: split.name.clone(),
            planned: split.count,
            copied: 0,
            failed: 0,
            images_dir,
            labels_dir,
        };

        for _ in 0..split.count {
            if cursor >= total {
                warn!(
                    "Split '{}' asked for more pairs than exist, stopping at {}",
                    split.name, total
                );
                break;
            }

            let pair = &pairs[cursor];
            match copy_pair(pair, &outcome.images_dir, &outcome.labels_dir) {
                Ok(()) => outcome.copied += 1,
                Err(e) => {
                    error!(
                        "Error copying {} or {} to {}: {}",
                        pair.image_file_name(),
                        pair.label_file_name(),
                        split.name,
                        e
                    );
                    outcome.failed += 1;
                }
            }

            cursor += 1;
        }

        info!(
            "Split '{}': {}/{} pairs copied",
            outcome.name, outcome.copied, outcome.planned
        );
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

fn copy_pair(pair: &ImagePair, images_dir: &Path, labels_dir: &Path) -> FileOpResult<()> {
    let image_dest = images_dir.join(pair.image_file_name());
    let label_dest = labels_dir.join(pair.label_file_name());

    copy_with_metadata(pair.image(), &image_dest)?;
    copy_with_metadata(pair.label(), &label_dest)
}
