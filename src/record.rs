use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Compressed,
    Plain,
    Unknown,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Compressed => "compressed",
            Format::Plain => "plain",
            Format::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which step left a field of a record empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Neither strategy accepted the file.
    Probe,
    /// File metadata could not be read.
    Metadata,
    Digest,
    Header,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    pub kind: FailureKind,
    pub reason: String,
}

/// Identification record of one candidate file. Built once, never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    directory: String,
    name: String,
    format: Format,
    disk_size: Option<u64>,
    logical_size: Option<u64>,
    checksum: Option<String>,
    header: Option<String>,
    #[serde(skip)]
    failures: Vec<FieldFailure>,
}

impl FileRecord {
    pub fn directory(&self) -> &str {
        &self.directory
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn format(&self) -> Format {
        self.format
    }
    pub fn disk_size(&self) -> Option<u64> {
        self.disk_size
    }
    /// Decompressed byte count; only known when checksums were computed.
    pub fn logical_size(&self) -> Option<u64> {
        self.logical_size
    }
    /// Lowercase hex MD5 of the decompressed content.
    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }
    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }
    /// Reasons for absent fields, in the order they occurred.
    pub fn failures(&self) -> &[FieldFailure] {
        &self.failures
    }
}

/// Accumulates fields while a file is processed; `finish` seals the record.
#[derive(Debug)]
pub(crate) struct RecordDraft {
    record: FileRecord,
}

impl RecordDraft {
    pub(crate) fn new(directory: String, name: String) -> Self {
        Self {
            record: FileRecord {
                directory,
                name,
                format: Format::Unknown,
                disk_size: None,
                logical_size: None,
                checksum: None,
                header: None,
                failures: Vec::new(),
            },
        }
    }

    pub(crate) fn disk_size(&mut self, size: u64) {
        self.record.disk_size = Some(size);
    }

    pub(crate) fn format(&mut self, format: Format) {
        self.record.format = format;
    }

    pub(crate) fn digest(&mut self, logical_size: u64, checksum: String) {
        self.record.logical_size = Some(logical_size);
        self.record.checksum = Some(checksum);
    }

    pub(crate) fn header(&mut self, header: String) {
        self.record.header = Some(header);
    }

    pub(crate) fn failed(&mut self, kind: FailureKind, reason: impl fmt::Display) {
        self.record.failures.push(FieldFailure {
            kind,
            reason: reason.to_string(),
        });
    }

    pub(crate) fn finish(self) -> FileRecord {
        let mut record = self.record;
        if record.format == Format::Unknown {
            record.logical_size = None;
            record.checksum = None;
            record.header = None;
        }
        record
    }
}
