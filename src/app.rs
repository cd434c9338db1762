use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, info_span};

use crate::config::SplitConfig;
use crate::core::{
    compute_split_counts, discover_pairs, materialize, shuffle_pairs, SplitCount, SplitError,
    SplitOutcome, SplitResult,
};

/// Result of one complete split run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub total_pairs: usize,
    pub planned: Vec<SplitCount>,
    pub splits: Vec<SplitOutcome>,
    pub missing_labels: Vec<String>,
    pub missing_images: Vec<String>,
}

impl RunSummary {
    pub fn total_copied(&self) -> usize {
        self.splits.iter().map(|s| s.copied).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.splits.iter().map(|s| s.failed).sum()
    }

    /// Write the summary as pretty JSON
    pub fn save(&self, path: &Path) -> SplitResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| SplitError::Report {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        fs::write(path, json).map_err(|e| SplitError::Report {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        info!("Report written to: {:?}", path);
        Ok(())
    }
}

/// Discover, shuffle, size and copy. Nothing is written under the output
/// root unless discovery finds at least one pair.
pub fn run(config: &SplitConfig) -> SplitResult<RunSummary> {
    config.validate()?;

    info!("Starting dataset splitting process...");
    info!("Input folder: {:?}", absolute(&config.input_dir));
    info!("Output base folder: {:?}", absolute(&config.output_dir));
    info!("Split proportions: {}", config.describe_splits());

    let discovery = info_span!("discover").in_scope(|| {
        info!("Collecting image and label file pairs...");
        discover_pairs(&config.input_dir, config)
    })?;
    let mut pairs = discovery.pairs;

    info_span!("shuffle").in_scope(|| shuffle_pairs(&mut pairs, &mut rand::thread_rng()));

    let planned = info_span!("size").in_scope(|| {
        let counts = compute_split_counts(pairs.len(), &config.splits);
        info!("Total samples: {}", pairs.len());
        info!("Split distribution: {}", describe_counts(&counts));
        counts
    });

    let splits = info_span!("materialize").in_scope(|| {
        info!("Creating output directories and copying files...");
        materialize(&pairs, &planned, &config.output_dir)
    })?;

    let summary = RunSummary {
        input_dir: config.input_dir.clone(),
        output_dir: config.output_dir.clone(),
        total_pairs: pairs.len(),
        planned,
        splits,
        missing_labels: discovery.missing_labels,
        missing_images: discovery.missing_images,
    };
    report(&summary);

    Ok(summary)
}

fn report(summary: &RunSummary) {
    info!("--- Splitting Complete ---");
    info!("Summary of copied files:");
    for split in &summary.splits {
        info!("- {}: {} image-label pairs", capitalize(&split.name), split.copied);
    }
    info!(
        "{}/{} pairs copied in total",
        summary.total_copied(),
        summary.total_pairs
    );
    if summary.total_failed() > 0 {
        info!(
            "{} pairs could not be copied, see the errors above",
            summary.total_failed()
        );
    }
    info!("Dataset split into {:?}", summary.output_dir);
}

fn describe_counts(counts: &[SplitCount]) -> String {
    counts
        .iter()
        .map(|c| format!("{}={}", c.name, c.count))
        .collect::<Vec<_>>()
        .join(", ")
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
