//! Record serialisation: tab-separated lines or a JSON array.

use crate::error::OutputError;
use crate::record::FileRecord;

use std::borrow::Cow;
use std::io::Write;

/// Placeholder for an absent value in line-oriented output.
pub const SENTINEL: &str = "-";

/// Line-oriented columns. `size` is the on-disk size; the decompressed size
/// is only carried by the JSON form.
pub const COLUMNS: [&str; 6] = ["directory", "name", "format", "size", "checksum", "header"];

pub trait RecordWriter {
    fn write_record(&mut self, record: &FileRecord) -> Result<(), OutputError>;

    /// Complete the document and flush.
    fn finish(&mut self) -> Result<(), OutputError>;
}

pub struct TsvWriter<W: Write> {
    out: W,
    column_names: bool,
    started: bool,
}

impl<W: Write> TsvWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            column_names: false,
            started: false,
        }
    }

    /// Emit a row of column names before the first record.
    pub fn with_column_names(mut self, yes: bool) -> Self {
        self.column_names = yes;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn start(&mut self) -> Result<(), OutputError> {
        if !self.started {
            self.started = true;
            if self.column_names {
                writeln!(self.out, "{}", COLUMNS.join("\t"))?;
            }
        }
        Ok(())
    }
}

fn field(value: Option<&str>) -> Cow<'_, str> {
    match value {
        None => Cow::Borrowed(SENTINEL),
        Some(v) if v.contains(['\t', '\n', '\r']) => Cow::Owned(v.replace(['\t', '\n', '\r'], " ")),
        Some(v) => Cow::Borrowed(v),
    }
}

fn number(value: Option<u64>) -> Cow<'static, str> {
    value.map_or(Cow::Borrowed(SENTINEL), |n| Cow::Owned(n.to_string()))
}

impl<W: Write> RecordWriter for TsvWriter<W> {
    fn write_record(&mut self, r: &FileRecord) -> Result<(), OutputError> {
        self.start()?;
        writeln!(
            self.out,
            "{}\t{}\t{}\t{}\t{}\t{}",
            field(Some(r.directory())),
            field(Some(r.name())),
            r.format(),
            number(r.disk_size()),
            field(r.checksum()),
            field(r.header()),
        )?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), OutputError> {
        self.start()?;
        self.out.flush()?;
        Ok(())
    }
}

/// Streams records as one JSON array, one object per line.
pub struct JsonWriter<W: Write> {
    out: W,
    written: usize,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RecordWriter for JsonWriter<W> {
    fn write_record(&mut self, record: &FileRecord) -> Result<(), OutputError> {
        self.out
            .write_all(if self.written == 0 { b"[\n" } else { b",\n" })?;
        serde_json::to_writer(&mut self.out, record)?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), OutputError> {
        if self.written == 0 {
            self.out.write_all(b"[]\n")?;
        } else {
            self.out.write_all(b"\n]\n")?;
        }
        self.out.flush()?;
        Ok(())
    }
}
