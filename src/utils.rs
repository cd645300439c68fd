//! Little-endian field decoding and the short-read primitive the header
//! readers are built on.

use std::io::{self, Read};

/// Decode a little-endian u16 at `offset`.
#[inline(always)]
pub(crate) fn u16_at(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

/// Decode a little-endian u32 at `offset`.
#[inline(always)]
pub(crate) fn u32_at(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

/// Fill `buf` from `reader`, looping over partial reads until the buffer is
/// full or the stream ends, and return the number of bytes filled.
///
/// Unlike [`Read::read_exact`], running out of bytes is reported through the
/// count instead of an error. The ZIP structures are self-terminating, so
/// callers need to tell "no more data here" apart from a real I/O failure.
pub(crate) fn read_at_most<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}
