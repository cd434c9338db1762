use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::{SplitError, SplitResult};

/// How far the fractions may drift from 1.0 before a warning is logged
const FRACTION_SUM_TOLERANCE: f64 = 0.01;

/// One named bucket and the share of pairs it should receive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitRatio {
    pub name: String,
    pub fraction: f64,
}

impl SplitRatio {
    pub fn new(name: impl Into<String>, fraction: f64) -> Self {
        Self {
            name: name.into(),
            fraction,
        }
    }
}

/// Run configuration for a dataset split
///
/// Split order is significant: it decides both which bucket absorbs the
/// rounding remainder (the last one) and the order buckets are filled in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Flat folder holding images and their label files
    pub input_dir: PathBuf,
    /// Root that receives `<split>/images` and `<split>/labels`
    pub output_dir: PathBuf,
    pub splits: Vec<SplitRatio>,
    /// Recognized image extensions, lowercase, without the leading dot
    pub image_extensions: Vec<String>,
    pub label_extension: String,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("dataset"),
            output_dir: PathBuf::from("dataset_split"),
            splits: vec![
                SplitRatio::new("train", 0.7),
                SplitRatio::new("val", 0.2),
                SplitRatio::new("test", 0.1),
            ],
            image_extensions: ["jpg", "jpeg", "png", "bmp", "tiff"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            label_extension: "txt".to_string(),
        }
    }
}

impl SplitConfig {
    /// Load a JSON config file. Missing fields fall back to the defaults.
    pub fn load(path: &Path) -> SplitResult<Self> {
        info!("Loading config from: {:?}", path);

        let contents = fs::read_to_string(path).map_err(|e| SplitError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut config: SplitConfig =
            serde_json::from_str(&contents).map_err(|e| SplitError::ConfigLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        config.normalize_extensions();
        Ok(config)
    }

    /// Lowercase every extension and strip any leading dot
    pub fn normalize_extensions(&mut self) {
        for ext in &mut self.image_extensions {
            *ext = normalize_extension(ext);
        }
        self.label_extension = normalize_extension(&self.label_extension);
    }

    pub fn is_image_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.image_extensions.iter().any(|known| *known == ext)
    }

    pub fn is_label_extension(&self, ext: &str) -> bool {
        ext.to_lowercase() == self.label_extension
    }

    /// Check the configuration before anything touches the filesystem.
    ///
    /// The fractions are not required to sum to 1.0; a noticeable drift is
    /// only reported.
    pub fn validate(&self) -> SplitResult<()> {
        if self.splits.is_empty() {
            return Err(SplitError::InvalidConfig(
                "at least one split is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for split in &self.splits {
            if split.name.trim().is_empty() {
                return Err(SplitError::InvalidConfig(
                    "split names must not be empty".to_string(),
                ));
            }
            if !seen.insert(split.name.as_str()) {
                return Err(SplitError::InvalidConfig(format!(
                    "split '{}' is listed more than once",
                    split.name
                )));
            }
            if !split.fraction.is_finite() || split.fraction < 0.0 {
                return Err(SplitError::InvalidConfig(format!(
                    "split '{}' has an invalid fraction {}",
                    split.name, split.fraction
                )));
            }
        }

        if self.image_extensions.iter().all(|ext| ext.is_empty()) {
            return Err(SplitError::InvalidConfig(
                "no image extensions configured".to_string(),
            ));
        }
        if self.label_extension.is_empty() {
            return Err(SplitError::InvalidConfig(
                "label extension must not be empty".to_string(),
            ));
        }

        let sum = self.fraction_sum();
        if (sum - 1.0).abs() > FRACTION_SUM_TOLERANCE {
            warn!(
                "Split fractions sum to {:.3}, not 1.0. The last split '{}' takes whatever is left.",
                sum,
                self.splits[self.splits.len() - 1].name
            );
        }

        Ok(())
    }

    pub fn fraction_sum(&self) -> f64 {
        self.splits.iter().map(|s| s.fraction).sum()
    }

    /// Human readable `train=0.70, val=0.20, test=0.10`
    pub fn describe_splits(&self) -> String {
        self.splits
            .iter()
            .map(|s| format!("{}={:.2}", s.name, s.fraction))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Parse the `NAME=FRACTION` form used by `--split`
pub fn parse_split_arg(arg: &str) -> Result<SplitRatio, String> {
    let (name, fraction) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=FRACTION, got '{}'", arg))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing split name in '{}'", arg));
    }

    let fraction: f64 = fraction
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", fraction.trim()))?;

    Ok(SplitRatio::new(name, fraction))
}
