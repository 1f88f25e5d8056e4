//! Inventory of FASTQ files in a directory tree.
//!
//! - Format probing by content (plain or gzip), not by extension.
//! - Streaming decompressed size and MD5 in fixed-size blocks.
//! - First header line of each file.
//! - Per-file failures degrade to absent fields; only an interrupt stops a scan.
//! - Tab-separated or JSON output.

pub mod builder;
pub mod cancel;
pub mod diagnostics;
pub mod digest;
pub mod error;
pub mod header;
#[cfg(feature = "cli")]
pub mod logging;
pub mod options;
pub mod output;
pub mod probe;
pub mod record;
pub mod scan;
mod util;

pub use crate::builder::{Candidate, RecordBuilder};
pub use crate::cancel::CancelToken;
pub use crate::diagnostics::{Diagnostics, LogDiagnostics, MemoryDiagnostics};
pub use crate::digest::{Digest, digest, digest_reader};
pub use crate::error::{
    Cancelled, ConfigError, DigestError, HeaderError, OutputError, ProbeError, ScanError,
    WalkError,
};
pub use crate::header::header;
pub use crate::options::ScanOptions;
pub use crate::output::{JsonWriter, RecordWriter, TsvWriter};
pub use crate::probe::{LogicalStream, PROBE_ORDER, Probe, Strategy, probe};
pub use crate::record::{FailureKind, FieldFailure, FileRecord, Format};
pub use crate::scan::{Records, Scanner};
pub use crate::util::MAX_LINE_LEN;
