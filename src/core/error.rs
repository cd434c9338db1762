use std::path::PathBuf;

use super::operations::FileOpError;

/// Errors that stop a split run
#[derive(Debug)]
pub enum SplitError {
    /// The input directory could not be listed
    InputUnreadable { path: PathBuf, source: std::io::Error },
    /// Discovery found nothing to split
    NoPairsFound(PathBuf),
    InvalidConfig(String),
    ConfigLoad { path: PathBuf, reason: String },
    /// A split's images/labels directories could not be created
    OutputDir(FileOpError),
    Report { path: PathBuf, reason: String },
}

impl std::fmt::Display for SplitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplitError::InputUnreadable { path, source } => {
                write!(f, "Cannot read input directory {:?}: {}", path, source)
            }
            SplitError::NoPairsFound(path) => write!(
                f,
                "No matching image-label pairs found in {:?}. \
                 Make sure images and their label files exist and share the same base name.",
                path
            ),
            SplitError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            SplitError::ConfigLoad { path, reason } => {
                write!(f, "Failed to load config {:?}: {}", path, reason)
            }
            SplitError::OutputDir(e) => write!(f, "Output directory error: {}", e),
            SplitError::Report { path, reason } => {
                write!(f, "Failed to write report {:?}: {}", path, reason)
            }
        }
    }
}

impl std::error::Error for SplitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SplitError::InputUnreadable { source, .. } => Some(source),
            SplitError::OutputDir(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FileOpError> for SplitError {
    fn from(error: FileOpError) -> Self {
        SplitError::OutputDir(error)
    }
}

pub type SplitResult<T> = Result<T, SplitError>;
