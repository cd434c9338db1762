use std::fs::{self, File, FileTimes};
use std::io;
use std::path::Path;
use tracing::{debug, error};

/// Result type for file operations
pub type FileOpResult<T> = Result<T, FileOpError>;

/// Error types for file operations
#[derive(Debug)]
pub enum FileOpError {
    CopyFailed(String),
    CreateDirFailed(String),
}

impl std::fmt::Display for FileOpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOpError::CopyFailed(msg) => write!(f, "Copy failed: {}", msg),
            FileOpError::CreateDirFailed(msg) => write!(f, "Create directory failed: {}", msg),
        }
    }
}

impl std::error::Error for FileOpError {}

/// Copy a file, keeping its permissions and its access/modification times.
///
/// The destination is overwritten if it already exists. Read-only sources
/// produce read-only copies.
pub fn copy_with_metadata(src: &Path, dest: &Path) -> FileOpResult<()> {
    debug!("Copying {:?} to {:?}", src, dest);

    copy_contents(src, dest).map_err(|e| {
        error!("Failed to copy file from {:?} to {:?}: {}", src, dest, e);
        FileOpError::CopyFailed(format!(
            "Failed to copy from {:?} to {:?}: {}",
            src, dest, e
        ))
    })
}

fn copy_contents(src: &Path, dest: &Path) -> io::Result<()> {
    let mut reader = File::open(src)?;
    let metadata = reader.metadata()?;

    // A read-only copy from an earlier run cannot be truncated in place
    if dest.is_file() {
        fs::remove_file(dest)?;
    }

    // Permissions must be applied after the times are set on the handle
    let mut writer = File::create(dest)?;
    io::copy(&mut reader, &mut writer)?;
    writer.set_times(
        FileTimes::new()
            .set_accessed(metadata.accessed()?)
            .set_modified(metadata.modified()?),
    )?;
    drop(writer);

    fs::set_permissions(dest, metadata.permissions())
}

/// Create a directory and all of its parents. An existing directory is not an error.
pub fn ensure_dir(dir: &Path) -> FileOpResult<()> {
    fs::create_dir_all(dir).map_err(|e| {
        error!("Failed to create directory {:?}: {}", dir, e);
        FileOpError::CreateDirFailed(format!("{:?}: {}", dir, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    #[test]
    fn test_copy_preserves_contents_and_mtime() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.jpg");
        let dest = tmp.path().join("b.jpg");
        fs::write(&src, b"pixels").unwrap();

        let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        File::options()
            .write(true)
            .open(&src)
            .unwrap()
            .set_times(FileTimes::new().set_modified(past).set_accessed(past))
            .unwrap();

        copy_with_metadata(&src, &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"pixels");
        let copied = fs::metadata(&dest).unwrap().modified().unwrap();
        assert_eq!(copied, past);
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_read_only_source_keeps_mode_and_mtime() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("plate.jpg");
        let dest = tmp.path().join("out.jpg");
        fs::write(&src, b"pixels").unwrap();

        let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_500_000_000);
        File::options()
            .write(true)
            .open(&src)
            .unwrap()
            .set_times(FileTimes::new().set_modified(past).set_accessed(past))
            .unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o444)).unwrap();

        copy_with_metadata(&src, &dest).unwrap();

        let copied = fs::metadata(&dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"pixels");
        assert_eq!(copied.permissions().mode() & 0o777, 0o444);
        assert_eq!(copied.modified().unwrap(), past);

        // A second run overwrites the read-only copy
        copy_with_metadata(&src, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"pixels");
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let tmp = TempDir::new().unwrap();
        let result = copy_with_metadata(&tmp.path().join("nope.jpg"), &tmp.path().join("out.jpg"));
        assert!(matches!(result, Err(FileOpError::CopyFailed(_))));
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("train").join("images");

        ensure_dir(&dir).unwrap();
        ensure_dir(&dir).unwrap();

        assert!(dir.is_dir());
    }

    #[test]
    fn test_ensure_dir_fails_under_a_file() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, b"").unwrap();

        let result = ensure_dir(&blocker.join("images"));
        assert!(matches!(result, Err(FileOpError::CreateDirFailed(_))));
    }
}
