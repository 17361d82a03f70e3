// crates/core/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading archive export files
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Archive file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Permission denied reading file: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {message}")]
    MalformedJson { path: PathBuf, message: String },
}

impl ArchiveError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, source: &serde_json::Error) -> Self {
        Self::MalformedJson {
            path: path.into(),
            message: source.to_string(),
        }
    }
}

/// Errors that can occur when writing conversations or branches back to disk
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Cannot create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error writing {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize conversation {uuid}: {source}")]
    Serialize {
        uuid: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Branch {id} not found in conversation {uuid}")]
    UnknownBranch { uuid: String, id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_error_display() {
        let err = ArchiveError::not_found("/exports/conversations.json");
        assert!(err.to_string().contains("/exports/conversations.json"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_archive_error_io_classification() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ArchiveError::io("/test/path", io_err);
        assert!(matches!(err, ArchiveError::NotFound { .. }));

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = ArchiveError::io("/test/path", io_err);
        assert!(matches!(err, ArchiveError::PermissionDenied { .. }));
    }

    #[test]
    fn test_archive_error_io_other() {
        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout");
        let err = ArchiveError::io("/test/path", io_err);
        assert!(matches!(err, ArchiveError::Io { .. }));
    }

    #[test]
    fn test_malformed_json_carries_position() {
        let json_err = serde_json::from_str::<serde_json::Value>("[1,").unwrap_err();
        let err = ArchiveError::malformed("/test/users.json", &json_err);
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_unknown_branch_display() {
        let err = ExportError::UnknownBranch {
            uuid: "c-1".into(),
            id: "branch-7".into(),
        };
        assert_eq!(err.to_string(), "Branch branch-7 not found in conversation c-1");
    }
}
