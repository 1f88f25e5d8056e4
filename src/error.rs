use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single format strategy did not accept a file.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("I/O error while probing: {0}")]
    Io(#[from] io::Error),
    #[error("missing gzip magic bytes")]
    NotGzip,
    #[error("no content to inspect")]
    Empty,
    #[error("first line is not ASCII")]
    NonAscii,
    #[error("first line does not start with '@' (found {found:?})")]
    MissingSentinel { found: char },
}

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("I/O error after {bytes_read} bytes: {source}")]
    Io {
        #[source]
        source: io::Error,
        bytes_read: u64,
    },
    #[error("digest interrupted")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("I/O error reading header: {0}")]
    Io(#[from] io::Error),
    #[error("header line is not ASCII")]
    NonAscii,
    #[error("header line exceeds {limit} bytes")]
    TooLong { limit: usize },
}

/// A directory tree entry the walker could not visit.
#[derive(Debug, Error)]
#[error("walk error: {source}")]
pub struct WalkError {
    pub path: Option<PathBuf>,
    #[source]
    pub source: walkdir::Error,
}

impl From<walkdir::Error> for WalkError {
    fn from(source: walkdir::Error) -> Self {
        Self {
            path: source.path().map(|p| p.to_path_buf()),
            source,
        }
    }
}

/// Raised when the operator asked the run to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("scan interrupted")]
pub struct Cancelled;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("block size must be a positive byte count")]
    ZeroBlockSize,
    #[error("at least one file extension is required")]
    NoExtensions,
    #[error("extension {0:?} is blank")]
    BlankExtension(String),
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialise record: {0}")]
    Json(#[from] serde_json::Error),
}
