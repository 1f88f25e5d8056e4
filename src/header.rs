use crate::error::HeaderError;
use crate::probe::LogicalStream;
use crate::util::{MAX_LINE_LEN, read_bounded_line, trim_line_ending};

/// First logical line, without its line ending.
pub fn header(stream: &mut LogicalStream) -> Result<String, HeaderError> {
    stream.rewind()?;
    let mut line = Vec::with_capacity(128);
    if !read_bounded_line(stream, &mut line, MAX_LINE_LEN)? {
        return Err(HeaderError::TooLong {
            limit: MAX_LINE_LEN,
        });
    }
    let line = trim_line_ending(&line);
    if !line.is_ascii() {
        return Err(HeaderError::NonAscii);
    }
    // ASCII is valid UTF-8.
    Ok(String::from_utf8_lossy(line).into_owned())
}
