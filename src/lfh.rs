//! Local File Header (LFH)
//!
//! Sits immediately before each entry's payload in the archive body.
//!
//! <https://en.wikipedia.org/wiki/ZIP_(file_format)#Local_file_header>

use std::fs::File;
use std::io::{Seek, SeekFrom};

use crate::cdfh::DirectoryRecord;
use crate::entry::ZipEntry;
use crate::utils::{read_at_most, u16_at, u32_at};

const LFH_FIXED_SIZE: usize = 30;
const LFH_SIGNATURE: u32 = 0x0403_4b50;

#[derive(thiserror::Error, Debug)]
pub enum LfhError {
    #[error("local file '{name}' declares {expected} compressed bytes but only {actual} could be read")]
    TruncatedData {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The fields of the fixed local header region the resolver needs: the
/// method, and the lengths of the variable region to skip.
#[derive(Debug)]
struct LocalFileHeader {
    compression_method: u16,
    name_len: u64,
    extra_len: u64,
}

impl LocalFileHeader {
    fn from_slice(buf: &[u8]) -> Self {
        Self {
            compression_method: u16_at(buf, 8),
            name_len: u16_at(buf, 26) as u64,
            extra_len: u16_at(buf, 28) as u64,
        }
    }
}

/// Materializes the entry a central directory record points at.
///
/// Returns `Ok(None)` when there is no usable local header at the recorded
/// offset (short read or wrong signature); the caller treats that as a
/// non-match. The name and both sizes are trusted from the central
/// directory record, never re-read from the local header, because streamed
/// writers leave the local copies zeroed. A payload shorter than the
/// declared compressed size is the one loud failure here: returning partial
/// bytes would silently corrupt decompression downstream.
pub(crate) fn read_local_entry(
    file: &mut File,
    record: &DirectoryRecord,
) -> Result<Option<ZipEntry>, LfhError> {
    file.seek(SeekFrom::Start(record.local_header_offset()))?;

    let mut fixed = [0u8; LFH_FIXED_SIZE];
    if read_at_most(file, &mut fixed)? < LFH_FIXED_SIZE {
        return Ok(None);
    }
    if u32_at(&fixed, 0) != LFH_SIGNATURE {
        return Ok(None);
    }

    let header = LocalFileHeader::from_slice(&fixed);

    // skip the local name and extra field to reach the payload
    file.seek(SeekFrom::Current((header.name_len + header.extra_len) as i64))?;

    let expected = record.compressed_size() as usize;
    let mut payload = vec![0u8; expected];
    let got = read_at_most(file, &mut payload)?;
    if got < expected {
        return Err(LfhError::TruncatedData {
            name: record.name().to_owned(),
            expected,
            actual: got,
        });
    }

    Ok(Some(ZipEntry::new(
        record.name().to_owned(),
        payload,
        record.compressed_size(),
        record.uncompressed_size(),
        header.compression_method,
    )))
}
