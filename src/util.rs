use std::fs::File;
use std::io::{self, BufRead, Read, Seek, SeekFrom};
use std::path::Path;

/// Upper bound on how much of a single line is ever buffered.
pub const MAX_LINE_LEN: usize = 1 << 20;

pub fn looks_like_gzip<R: Read + Seek>(mut r: R) -> io::Result<bool> {
    let mut magic = [0u8; 2];
    let pos = r.stream_position()?;
    let n = r.read(&mut magic)?;
    r.seek(SeekFrom::Start(pos))?;
    Ok(n >= 2 && magic == [0x1F, 0x8B])
}

pub fn open_file(path: &Path) -> io::Result<File> {
    File::open(path)
}

/// Read one line (terminator included) into `buf`, stopping after `limit` bytes.
/// Returns `true` when the line ended within the limit (newline or EOF).
pub fn read_bounded_line<R: BufRead>(r: &mut R, buf: &mut Vec<u8>, limit: usize) -> io::Result<bool> {
    buf.clear();
    let n = r.by_ref().take(limit as u64).read_until(b'\n', buf)?;
    if n < limit || buf.ends_with(b"\n") {
        return Ok(true);
    }
    // Exactly `limit` bytes without a newline: complete only if EOF follows.
    Ok(r.fill_buf()?.is_empty())
}

pub fn trim_line_ending(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    while end > 0 && matches!(line[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    &line[..end]
}
