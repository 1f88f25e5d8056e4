//! Storage-format detection.
//!
//! File extensions are not trusted. Each [`Strategy`] tries to open the file
//! and decode its first line; the first strategy whose first line starts with
//! the FASTQ header sentinel `@` wins.

use crate::diagnostics::Diagnostics;
use crate::error::ProbeError;
use crate::record::Format;
#[cfg(feature = "gzip")]
use crate::util::looks_like_gzip;
use crate::util::{MAX_LINE_LEN, open_file, read_bounded_line};

#[cfg(feature = "gzip")]
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

const BUF_CAPACITY: usize = 256 * 1024;

/// One way of turning a file on disk into its logical byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    #[cfg(feature = "gzip")]
    Compressed,
    Plain,
}

/// Strategies in the order the prober tries them.
pub const PROBE_ORDER: &[Strategy] = &[
    #[cfg(feature = "gzip")]
    Strategy::Compressed,
    Strategy::Plain,
];

impl Strategy {
    pub fn format(self) -> Format {
        match self {
            #[cfg(feature = "gzip")]
            Strategy::Compressed => Format::Compressed,
            Strategy::Plain => Format::Plain,
        }
    }

    /// Open `path` under this strategy and check the first decoded line.
    /// On success the returned stream is positioned at byte 0.
    pub fn try_open(self, path: &Path) -> Result<LogicalStream, ProbeError> {
        #[allow(unused_mut)]
        let mut file = open_file(path)?;
        #[cfg(feature = "gzip")]
        if self == Strategy::Compressed && !looks_like_gzip(&mut file)? {
            return Err(ProbeError::NotGzip);
        }
        let mut stream = LogicalStream {
            path: path.to_path_buf(),
            strategy: self,
            decoder: Some(Decoder::new(self, file)),
        };
        check_first_line(&mut stream, self == Strategy::Plain)?;
        stream.rewind()?;
        Ok(stream)
    }
}

// Plain text must be ASCII; decoded gzip content only needs the sentinel.
fn check_first_line<R: BufRead>(r: &mut R, require_ascii: bool) -> Result<(), ProbeError> {
    let mut line = Vec::with_capacity(128);
    read_bounded_line(r, &mut line, MAX_LINE_LEN)?;
    let Some(&first) = line.first() else {
        return Err(ProbeError::Empty);
    };
    if require_ascii && !line.is_ascii() {
        return Err(ProbeError::NonAscii);
    }
    if first != b'@' {
        return Err(ProbeError::MissingSentinel {
            found: first as char,
        });
    }
    Ok(())
}

enum Decoder {
    #[cfg(feature = "gzip")]
    Compressed(BufReader<MultiGzDecoder<File>>),
    Plain(BufReader<File>),
}

impl Decoder {
    fn new(strategy: Strategy, file: File) -> Self {
        match strategy {
            #[cfg(feature = "gzip")]
            Strategy::Compressed => Decoder::Compressed(BufReader::with_capacity(
                BUF_CAPACITY,
                MultiGzDecoder::new(file),
            )),
            Strategy::Plain => Decoder::Plain(BufReader::with_capacity(BUF_CAPACITY, file)),
        }
    }

    fn into_file(self) -> File {
        match self {
            #[cfg(feature = "gzip")]
            Decoder::Compressed(r) => r.into_inner().into_inner(),
            Decoder::Plain(r) => r.into_inner(),
        }
    }
}

/// The decompressed content of one file, backed by a single open handle.
///
/// Reads yield logical bytes. [`LogicalStream::rewind`] returns to byte 0;
/// after a failed rewind the stream is closed and reads fail.
pub struct LogicalStream {
    path: PathBuf,
    strategy: Strategy,
    decoder: Option<Decoder>,
}

impl LogicalStream {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> Format {
        self.strategy.format()
    }

    pub fn rewind(&mut self) -> io::Result<()> {
        let decoder = self.decoder.take().ok_or_else(closed)?;
        let decoder = match decoder {
            Decoder::Plain(mut r) => {
                r.seek(SeekFrom::Start(0))?;
                Decoder::Plain(r)
            }
            #[cfg(feature = "gzip")]
            compressed @ Decoder::Compressed(_) => {
                // A gzip decoder cannot seek; restart it over the same handle.
                let mut file = compressed.into_file();
                file.seek(SeekFrom::Start(0))?;
                Decoder::new(self.strategy, file)
            }
        };
        self.decoder = Some(decoder);
        Ok(())
    }

    fn inner(&mut self) -> io::Result<&mut dyn BufRead> {
        match self.decoder.as_mut().ok_or_else(closed)? {
            #[cfg(feature = "gzip")]
            Decoder::Compressed(r) => Ok(r as &mut dyn BufRead),
            Decoder::Plain(r) => Ok(r as &mut dyn BufRead),
        }
    }
}

fn closed() -> io::Error {
    io::Error::other("logical stream is closed")
}

impl Read for LogicalStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner()?.read(buf)
    }
}

impl BufRead for LogicalStream {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner()?.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        if let Ok(r) = self.inner() {
            r.consume(amt);
        }
    }
}

/// Outcome of probing one path.
pub struct Probe {
    pub format: Format,
    pub stream: Option<LogicalStream>,
}

/// Classify `path`, returning the open logical stream on success.
///
/// Never fails: a strategy error only means that strategy did not apply.
pub fn probe(path: &Path, diag: &dyn Diagnostics) -> Probe {
    for &strategy in PROBE_ORDER {
        match strategy.try_open(path) {
            Ok(stream) => {
                return Probe {
                    format: strategy.format(),
                    stream: Some(stream),
                };
            }
            Err(e) => diag.debug(format_args!(
                "{}: not {}: {e}",
                path.display(),
                strategy.format()
            )),
        }
    }
    Probe {
        format: Format::Unknown,
        stream: None,
    }
}
