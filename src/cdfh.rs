//! Central Directory File Header (CDFH)
//!
//! One header per entry, holding the authoritative metadata and the offset
//! of the entry's local file header.
//!
//! <https://en.wikipedia.org/wiki/ZIP_(file_format)#Central_directory_file_header_(CDFH)>

use std::fs::File;
use std::io::{Seek, SeekFrom};

use crate::utils::{read_at_most, u16_at, u32_at};

/// The fixed-size portion of the CDFH. Includes signature (4), versions (4),
/// flags (2), method (2), time/date (4), crc (4), sizes (8), lengths (6),
/// and disk/attrs (12), followed by the local header offset (4).
const CDFH_FIXED_SIZE: usize = 46;
const CDFH_SIGNATURE: u32 = 0x0201_4b50;

#[derive(thiserror::Error, Debug)]
pub enum CdfhError {
    #[error(
        "central directory header at offset {offset} declares a {expected} byte name but only {actual} bytes remain"
    )]
    TruncatedName {
        offset: u64,
        expected: usize,
        actual: usize,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Fixed-region fields of one central directory header.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CentralDirectoryHeader {
    pub(crate) compressed_size: u32,
    pub(crate) uncompressed_size: u32,
    pub(crate) name_len: usize,
    pub(crate) extra_len: usize,
    pub(crate) comment_len: usize,
    pub(crate) local_header_offset: u32,
}

impl CentralDirectoryHeader {
    fn from_slice(buf: &[u8]) -> Self {
        assert_eq!(u32_at(buf, 0), CDFH_SIGNATURE, "signature should match");
        Self {
            compressed_size: u32_at(buf, 20),
            uncompressed_size: u32_at(buf, 24),
            name_len: u16_at(buf, 28) as usize,
            extra_len: u16_at(buf, 30) as usize,
            comment_len: u16_at(buf, 32) as usize,
            local_header_offset: u32_at(buf, 42),
        }
    }

    /// Length of the variable tail after the fixed region.
    fn variable_len(&self) -> usize {
        self.name_len + self.extra_len + self.comment_len
    }
}

/// One header visited during a directory walk.
///
/// Constructed fresh for every header a search passes over; only the
/// `(name, offset)` pair outlives the walk, by way of the session's cache.
#[derive(Debug, Clone)]
pub struct DirectoryRecord {
    pub(crate) name: String,
    pub(crate) offset: u64,
    pub(crate) next_offset: u64,
    pub(crate) header: CentralDirectoryHeader,
}

impl DirectoryRecord {
    /// Entry name as stored in the central directory.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Offset of the first byte of this header.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Offset of the first byte of the next header.
    pub fn next_offset(&self) -> u64 {
        self.next_offset
    }

    /// Compressed size declared by the central directory.
    pub fn compressed_size(&self) -> u32 {
        self.header.compressed_size
    }

    /// Uncompressed size declared by the central directory.
    pub fn uncompressed_size(&self) -> u32 {
        self.header.uncompressed_size
    }

    /// Offset of this entry's local file header.
    pub fn local_header_offset(&self) -> u64 {
        self.header.local_header_offset as u64
    }
}

/// Reads the central directory header starting at `offset`.
///
/// Returns `Ok(None)` at the end of the directory: fewer than 46 bytes
/// remain, or the signature no longer matches. The directory is contiguous,
/// so the first break in the pattern is its end. A name that cannot be read
/// in full is corruption rather than termination and fails the walk.
///
/// The scan is restartable: each record carries the offset of its
/// successor, and any of those offsets can be fed back in later.
pub(crate) fn next_record(
    file: &mut File,
    offset: u64,
) -> Result<Option<DirectoryRecord>, CdfhError> {
    file.seek(SeekFrom::Start(offset))?;

    let mut fixed = [0u8; CDFH_FIXED_SIZE];
    if read_at_most(file, &mut fixed)? < CDFH_FIXED_SIZE {
        return Ok(None);
    }
    if u32_at(&fixed, 0) != CDFH_SIGNATURE {
        return Ok(None);
    }

    let header = CentralDirectoryHeader::from_slice(&fixed);

    let mut name_buf = vec![0u8; header.name_len];
    let got = read_at_most(file, &mut name_buf)?;
    if got < header.name_len {
        return Err(CdfhError::TruncatedName {
            offset,
            expected: header.name_len,
            actual: got,
        });
    }
    let name = String::from_utf8_lossy(&name_buf).into_owned();

    let next_offset = offset + (CDFH_FIXED_SIZE + header.variable_len()) as u64;
    Ok(Some(DirectoryRecord {
        name,
        offset,
        next_offset,
        header,
    }))
}
