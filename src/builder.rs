//! Per-file record assembly.
//!
//! Every failure inside one file becomes an absent field plus a diagnostic.
//! Only cancellation leaves [`RecordBuilder::build`] as an error.

use crate::cancel::CancelToken;
use crate::diagnostics::Diagnostics;
use crate::digest::digest;
use crate::error::{Cancelled, DigestError};
use crate::header::header;
use crate::options::ScanOptions;
use crate::probe::probe;
use crate::record::{FailureKind, FileRecord, Format, RecordDraft};

use std::fs;
use std::path::{Path, PathBuf};

/// A path the walker selected, with the extension that matched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub extension: String,
}

impl Candidate {
    pub fn new(path: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            extension: extension.into(),
        }
    }
}

pub struct RecordBuilder<'a> {
    opts: &'a ScanOptions,
    diag: &'a dyn Diagnostics,
    cancel: &'a CancelToken,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(opts: &'a ScanOptions, diag: &'a dyn Diagnostics, cancel: &'a CancelToken) -> Self {
        Self { opts, diag, cancel }
    }

    pub fn build(&self, candidate: &Candidate) -> Result<FileRecord, Cancelled> {
        self.cancel.check()?;
        let path = candidate.path.as_path();
        let (directory, name) = split_path(path);
        let mut draft = RecordDraft::new(directory, name);

        match fs::metadata(path) {
            Ok(meta) => draft.disk_size(meta.len()),
            Err(e) => {
                self.diag
                    .warn(format_args!("{}: cannot read size: {e}", path.display()));
                draft.failed(FailureKind::Metadata, e);
            }
        }

        let found = probe(path, self.diag);
        draft.format(found.format);
        let Some(mut stream) = found.stream else {
            self.diag.info(format_args!(
                "{}: not recognised as FASTQ",
                path.display()
            ));
            draft.failed(FailureKind::Probe, "no strategy found a '@' header line");
            return Ok(draft.finish());
        };
        self.check_extension(candidate, found.format);

        if self.opts.compute_checksum {
            match digest(&mut stream, self.opts.block_size, self.cancel) {
                Ok(d) => draft.digest(d.logical_size, d.checksum),
                Err(DigestError::Cancelled) => return Err(Cancelled),
                Err(e) => {
                    self.diag
                        .warn(format_args!("{}: checksum failed: {e}", path.display()));
                    draft.failed(FailureKind::Digest, e);
                }
            }
        }

        match header(&mut stream) {
            Ok(h) => draft.header(h),
            Err(e) => {
                self.diag
                    .warn(format_args!("{}: cannot read header: {e}", path.display()));
                draft.failed(FailureKind::Header, e);
            }
        }

        drop(stream);
        Ok(draft.finish())
    }

    fn check_extension(&self, candidate: &Candidate, format: Format) {
        let says_gzip = candidate.extension.ends_with(".gz");
        let mismatch = match format {
            Format::Compressed => !says_gzip,
            Format::Plain => says_gzip,
            Format::Unknown => false,
        };
        if mismatch {
            self.diag.info(format_args!(
                "{}: extension {:?} but content is {format}",
                candidate.path.display(),
                candidate.extension
            ));
        }
    }
}

fn split_path(path: &Path) -> (String, String) {
    let directory = path
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    (directory, name)
}
