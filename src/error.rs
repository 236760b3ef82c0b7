use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from terminal or file access.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Bookmark file could not be parsed or serialized.
    #[error("Bookmark store error: {0}")]
    Bookmark(#[from] serde_json::Error),
}

/// Errors returned by the filesystem service (listing, copy, move, delete,
/// rename, mkdir, preview).
#[derive(Debug, Error)]
pub enum FsError {
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("destination already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("invalid name: {0:?}")]
    InvalidName(String),

    #[error("cannot place {} inside itself", .0.display())]
    IntoItself(PathBuf),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    /// Classify an `io::Error` raised while touching `path`.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists(path.to_path_buf()),
            _ => FsError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
    }

    #[test]
    fn terminal_error_display() {
        let err = AppError::Terminal("failed to enter raw mode".into());
        assert_eq!(err.to_string(), "Terminal error: failed to enter raw mode");
    }

    #[test]
    fn fs_error_classifies_io_kinds() {
        let path = Path::new("/tmp/x");
        let not_found = FsError::from_io(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(not_found, FsError::NotFound(_)));
        let denied = FsError::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(denied, FsError::PermissionDenied(_)));
        let exists = FsError::from_io(path, io::Error::from(io::ErrorKind::AlreadyExists));
        assert!(matches!(exists, FsError::AlreadyExists(_)));
        let other = FsError::from_io(path, io::Error::other("boom"));
        assert!(matches!(other, FsError::Io { .. }));
    }

    #[test]
    fn already_exists_display_names_path() {
        let err = FsError::AlreadyExists(PathBuf::from("/b/f.txt"));
        assert_eq!(err.to_string(), "destination already exists: /b/f.txt");
    }
}
