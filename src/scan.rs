//! Directory traversal feeding the record builder.
//!
//! [`Scanner::scan`] returns a lazy iterator: each `next` walks until the next
//! candidate, builds its record and hands it out.

use crate::builder::{Candidate, RecordBuilder};
use crate::cancel::CancelToken;
use crate::diagnostics::Diagnostics;
use crate::error::{ScanError, WalkError};
use crate::options::ScanOptions;
use crate::record::FileRecord;

use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

type ErrorCallback<'a> = Box<dyn FnMut(&WalkError) + 'a>;

pub struct Scanner<'a> {
    opts: &'a ScanOptions,
    diag: &'a dyn Diagnostics,
    cancel: &'a CancelToken,
    on_error: Option<ErrorCallback<'a>>,
}

impl<'a> Scanner<'a> {
    pub fn new(opts: &'a ScanOptions, diag: &'a dyn Diagnostics, cancel: &'a CancelToken) -> Self {
        Self {
            opts,
            diag,
            cancel,
            on_error: None,
        }
    }

    /// Called for every entry that cannot be visited. The walk always goes on.
    /// Without a callback, errors are reported as warnings.
    pub fn on_walk_error<F>(mut self, f: F) -> Self
    where
        F: FnMut(&WalkError) + 'a,
    {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn scan<I, P>(self, roots: I) -> Records<'a>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Records {
            walker: Walker::new(self.opts, roots.into_iter().map(Into::into).collect()),
            builder: RecordBuilder::new(self.opts, self.diag, self.cancel),
            diag: self.diag,
            cancel: self.cancel,
            on_error: self.on_error,
            done: false,
        }
    }
}

/// Lazy sequence of records. Yields `Err(ScanError::Cancelled)` once if the
/// scan is interrupted, then ends.
pub struct Records<'a> {
    walker: Walker<'a>,
    builder: RecordBuilder<'a>,
    diag: &'a dyn Diagnostics,
    cancel: &'a CancelToken,
    on_error: Option<ErrorCallback<'a>>,
    done: bool,
}

impl Records<'_> {
    fn report(&mut self, err: WalkError) {
        match self.on_error.as_mut() {
            Some(f) => f(&err),
            None => self.diag.warn(format_args!("{err}")),
        }
    }
}

impl Iterator for Records<'_> {
    type Item = Result<FileRecord, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            if self.cancel.is_cancelled() {
                self.done = true;
                return Some(Err(crate::error::Cancelled.into()));
            }
            let candidate = match self.walker.next()? {
                Ok(c) => c,
                Err(e) => {
                    self.report(e);
                    continue;
                }
            };
            self.diag
                .debug(format_args!("candidate {}", candidate.path.display()));
            return match self.builder.build(&candidate) {
                Ok(record) => Some(Ok(record)),
                Err(e) => {
                    self.done = true;
                    Some(Err(e.into()))
                }
            };
        }
    }
}

/// Candidates across all roots, in root order, sorted by name within a directory.
struct Walker<'a> {
    opts: &'a ScanOptions,
    roots: std::vec::IntoIter<PathBuf>,
    current: Option<walkdir::IntoIter>,
}

impl<'a> Walker<'a> {
    fn new(opts: &'a ScanOptions, roots: Vec<PathBuf>) -> Self {
        Self {
            opts,
            roots: roots.into_iter(),
            current: None,
        }
    }

    fn open(&self, root: PathBuf) -> walkdir::IntoIter {
        let mut walk = WalkDir::new(root)
            .follow_links(self.opts.follow_links)
            .sort_by_file_name();
        if !self.opts.recursive {
            walk = walk.max_depth(1);
        }
        walk.into_iter()
    }

    fn select(&self, entry: &DirEntry) -> Option<Candidate> {
        // With follow_links the file type is that of the link target. Without
        // it, a link to a regular file is still listed; only linked
        // directories are left unvisited.
        let file_type = entry.file_type();
        let is_file = file_type.is_file() || (file_type.is_symlink() && entry.path().is_file());
        if !is_file {
            return None;
        }
        let name = entry.file_name().to_str()?;
        let ext = self.opts.matched_extension(name)?;
        Some(Candidate::new(entry.path(), ext))
    }
}

impl Iterator for Walker<'_> {
    type Item = Result<Candidate, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(walk) = self.current.as_mut() else {
                let root = self.roots.next()?;
                self.current = Some(self.open(root));
                continue;
            };
            match walk.next() {
                None => self.current = None,
                Some(Err(e)) => return Some(Err(e.into())),
                Some(Ok(entry)) => {
                    if let Some(c) = self.select(&entry) {
                        return Some(Ok(c));
                    }
                }
            }
        }
    }
}
