use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::SplitConfig;
use crate::core::{SplitError, SplitResult};

/// An image and the label file that shares its base name.
///
/// Both files existed when the pair was formed. Pairs are never edited or
/// split apart afterwards, so the fields are only exposed read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePair {
    image: PathBuf,
    label: PathBuf,
}

impl ImagePair {
    pub fn new(image: PathBuf, label: PathBuf) -> Self {
        Self { image, label }
    }

    pub fn image(&self) -> &Path {
        &self.image
    }

    pub fn label(&self) -> &Path {
        &self.label
    }

    pub fn image_file_name(&self) -> String {
        file_name_lossy(&self.image)
    }

    pub fn label_file_name(&self) -> String {
        file_name_lossy(&self.label)
    }
}

/// Everything pair discovery learned about the input folder
#[derive(Debug, Default)]
pub struct Discovery {
    pub pairs: Vec<ImagePair>,
    /// Image file names with no label next to them
    pub missing_labels: Vec<String>,
    /// Label file names with no image next to them
    pub missing_images: Vec<String>,
    pub image_files_found: usize,
    pub label_files_found: usize,
}

enum FileKind {
    Image,
    Label,
}

struct ListedFile {
    path: PathBuf,
    stem: OsString,
    kind: FileKind,
}

/// Scan the direct children of `input_dir` and pair every image with the
/// label file carrying the same base name.
///
/// Only regular files are considered and subdirectories are not entered.
/// Extensions are compared case-insensitively. Files with any other
/// extension are ignored. Fails with [`SplitError::NoPairsFound`] when not a
/// single pair exists.
pub fn discover_pairs(input_dir: &Path, config: &SplitConfig) -> SplitResult<Discovery> {
    let entries = fs::read_dir(input_dir).map_err(|source| SplitError::InputUnreadable {
        path: input_dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {:?}: {}", input_dir, e);
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let (Some(stem), Some(ext)) = (path.file_stem(), path.extension()) else {
            continue;
        };
        let ext = ext.to_string_lossy();

        let kind = if config.is_image_extension(&ext) {
            FileKind::Image
        } else if config.is_label_extension(&ext) {
            FileKind::Label
        } else {
            continue;
        };

        files.push(ListedFile {
            stem: stem.to_os_string(),
            path,
            kind,
        });
    }

    // Directory order is platform dependent, keep diagnostics stable
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let mut labels_by_stem: HashMap<&OsString, &PathBuf> = HashMap::new();
    let mut image_stems: HashSet<&OsString> = HashSet::new();
    for file in &files {
        match file.kind {
            FileKind::Image => {
                image_stems.insert(&file.stem);
            }
            FileKind::Label => {
                // `a.txt` beats `a.TXT`; other casings only fill a gap
                let exact = file
                    .path
                    .extension()
                    .is_some_and(|ext| ext == config.label_extension.as_str());
                labels_by_stem
                    .entry(&file.stem)
                    .and_modify(|label| {
                        if exact {
                            *label = &file.path;
                        }
                    })
                    .or_insert(&file.path);
            }
        }
    }

    let mut discovery = Discovery::default();
    for file in &files {
        match file.kind {
            FileKind::Image => {
                discovery.image_files_found += 1;
                match labels_by_stem.get(&file.stem) {
                    Some(label) => discovery
                        .pairs
                        .push(ImagePair::new(file.path.clone(), (*label).clone())),
                    None => discovery.missing_labels.push(file_name_lossy(&file.path)),
                }
            }
            FileKind::Label => {
                discovery.label_files_found += 1;
                if !image_stems.contains(&file.stem) {
                    discovery.missing_images.push(file_name_lossy(&file.path));
                }
            }
        }
    }

    info!(
        "Scanned {:?}: {} image files, {} label files",
        input_dir, discovery.image_files_found, discovery.label_files_found
    );

    if discovery.pairs.is_empty() {
        return Err(SplitError::NoPairsFound(input_dir.to_path_buf()));
    }

    info!("Found {} image-label pairs", discovery.pairs.len());
    report_unmatched(&discovery);

    Ok(discovery)
}

fn report_unmatched(discovery: &Discovery) {
    if !discovery.missing_labels.is_empty() {
        warn!(
            "{} image files found without corresponding label files. They will be skipped.",
            discovery.missing_labels.len()
        );
        for name in &discovery.missing_labels {
            debug!("Skipped image: {}", name);
        }
    }
    if !discovery.missing_images.is_empty() {
        warn!(
            "{} label files found without corresponding image files. They will be skipped.",
            discovery.missing_images.len()
        );
        for name in &discovery.missing_images {
            debug!("Skipped label: {}", name);
        }
    }
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), name.as_bytes()).unwrap();
    }

    #[test]
    fn test_pairs_matching_base_names() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "car1.jpg");
        touch(tmp.path(), "car1.txt");
        touch(tmp.path(), "car2.png");
        touch(tmp.path(), "car2.txt");

        let discovery = discover_pairs(tmp.path(), &SplitConfig::default()).unwrap();

        assert_eq!(discovery.pairs.len(), 2);
        assert_eq!(discovery.pairs[0].image_file_name(), "car1.jpg");
        assert_eq!(discovery.pairs[0].label_file_name(), "car1.txt");
        assert_eq!(discovery.pairs[1].image_file_name(), "car2.png");
        assert!(discovery.missing_labels.is_empty());
        assert!(discovery.missing_images.is_empty());
    }

    #[test]
    fn test_image_without_label_is_reported() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.jpg");
        touch(tmp.path(), "a.txt");
        touch(tmp.path(), "lonely.jpeg");

        let discovery = discover_pairs(tmp.path(), &SplitConfig::default()).unwrap();

        assert_eq!(discovery.pairs.len(), 1);
        assert_eq!(discovery.missing_labels, vec!["lonely.jpeg".to_string()]);
        assert_eq!(discovery.image_files_found, 2);
        assert!(discovery
            .pairs
            .iter()
            .all(|p| p.image_file_name() != "lonely.jpeg"));
    }

    #[test]
    fn test_label_without_image_is_reported() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.bmp");
        touch(tmp.path(), "a.txt");
        touch(tmp.path(), "orphan.txt");

        let discovery = discover_pairs(tmp.path(), &SplitConfig::default()).unwrap();

        assert_eq!(discovery.pairs.len(), 1);
        assert_eq!(discovery.missing_images, vec!["orphan.txt".to_string()]);
        assert_eq!(discovery.label_files_found, 2);
    }

    #[test]
    fn test_image_extension_is_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "plate.JPG");
        touch(tmp.path(), "plate.txt");

        let discovery = discover_pairs(tmp.path(), &SplitConfig::default()).unwrap();

        assert_eq!(discovery.pairs.len(), 1);
        assert!(discovery.missing_images.is_empty());
    }

    #[test]
    fn test_label_extension_case_falls_back() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "car.jpg");
        touch(tmp.path(), "car.TXT");

        let discovery = discover_pairs(tmp.path(), &SplitConfig::default()).unwrap();

        assert_eq!(discovery.pairs.len(), 1);
        assert_eq!(discovery.pairs[0].label_file_name(), "car.TXT");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_exact_label_extension_wins() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "car.jpg");
        touch(tmp.path(), "car.TXT");
        touch(tmp.path(), "car.txt");

        let discovery = discover_pairs(tmp.path(), &SplitConfig::default()).unwrap();

        assert_eq!(discovery.pairs.len(), 1);
        assert_eq!(discovery.pairs[0].label_file_name(), "car.txt");
        assert!(discovery.missing_images.is_empty());
    }

    #[test]
    fn test_ignores_other_files_and_subdirectories() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.jpg");
        touch(tmp.path(), "a.txt");
        touch(tmp.path(), "notes.md");
        touch(tmp.path(), "README");
        fs::create_dir(tmp.path().join("nested.jpg")).unwrap();
        touch(&tmp.path().join("nested.jpg"), "b.txt");

        let discovery = discover_pairs(tmp.path(), &SplitConfig::default()).unwrap();

        assert_eq!(discovery.pairs.len(), 1);
        assert_eq!(discovery.image_files_found, 1);
        assert_eq!(discovery.label_files_found, 1);
    }

    #[test]
    fn test_no_pairs_is_fatal() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.jpg");
        touch(tmp.path(), "b.txt");

        let err = discover_pairs(tmp.path(), &SplitConfig::default()).unwrap_err();
        match err {
            SplitError::NoPairsFound(path) => assert_eq!(path, tmp.path()),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_input_dir() {
        let tmp = TempDir::new().unwrap();
        let result = discover_pairs(&tmp.path().join("absent"), &SplitConfig::default());
        assert!(matches!(result, Err(SplitError::InputUnreadable { .. })));
    }
}
