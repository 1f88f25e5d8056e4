use crate::cancel::CancelToken;
use crate::error::DigestError;
use crate::probe::LogicalStream;

use md5::{Digest as _, Md5};
use std::io::{self, Read};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub logical_size: u64,
    /// Lowercase hex MD5.
    pub checksum: String,
}

/// Size and MD5 of the whole logical stream, read from byte 0.
pub fn digest(
    stream: &mut LogicalStream,
    block_size: usize,
    cancel: &CancelToken,
) -> Result<Digest, DigestError> {
    stream.rewind().map_err(|source| DigestError::Io {
        source,
        bytes_read: 0,
    })?;
    digest_reader(stream, block_size, cancel)
}

/// Hash `reader` to EOF in blocks of `block_size` bytes.
pub fn digest_reader<R: Read>(
    mut reader: R,
    block_size: usize,
    cancel: &CancelToken,
) -> Result<Digest, DigestError> {
    let mut hasher = Md5::new();
    let mut block = vec![0u8; block_size.max(1)];
    let mut total = 0u64;
    loop {
        if cancel.is_cancelled() {
            return Err(DigestError::Cancelled);
        }
        let n = fill_block(&mut reader, &mut block).map_err(|source| DigestError::Io {
            source,
            bytes_read: total,
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&block[..n]);
        total += n as u64;
        if n < block.len() {
            break;
        }
    }
    Ok(Digest {
        logical_size: total,
        checksum: format!("{:x}", hasher.finalize()),
    })
}

// Short only at EOF.
fn fill_block<R: Read>(reader: &mut R, block: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < block.len() {
        match reader.read(&mut block[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
