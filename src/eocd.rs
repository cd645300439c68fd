//! End Of Central Directory (EOCD)
//!
//! The trailer record that tells us where the central directory starts.
//!
//! <https://en.wikipedia.org/wiki/ZIP_(file_format)#End_of_central_directory_record_(EOCD)>

use std::fs::File;
use std::io::{Seek, SeekFrom};

use tracing::debug;

use crate::utils::{read_at_most, u16_at, u32_at};

const EOCD_SIGNATURE: u32 = 0x0605_4b50;
const EOCD_FIXED_SIZE: usize = 22;
/// The trailing comment holds at most 65535 bytes, which bounds how far the
/// signature can sit from the end of the file.
const MAX_SEARCH_WINDOW: u64 = 65536;

#[derive(thiserror::Error, Debug)]
pub enum EocdError {
    #[error("archive is too small to be a ZIP file ({0} bytes)")]
    ArchiveTooSmall(u64),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Finds the end-of-central-directory record and returns the offset of the
/// first central directory header.
///
/// `Ok(None)` means no record exists within the trailing window. That is a
/// recoverable outcome; it only becomes an error if a search is attempted
/// against the archive. Only an archive too small to hold the signature is
/// rejected outright.
pub(crate) fn locate(file: &mut File) -> Result<Option<u64>, EocdError> {
    let len = file.metadata()?.len();
    if len < 4 {
        return Err(EocdError::ArchiveTooSmall(len));
    }

    // 1. fast path: a commentless record sits exactly 22 bytes before EOF
    if len >= EOCD_FIXED_SIZE as u64 {
        file.seek(SeekFrom::End(-(EOCD_FIXED_SIZE as i64)))?;
        let mut fixed = [0u8; EOCD_FIXED_SIZE];
        if read_at_most(file, &mut fixed)? == EOCD_FIXED_SIZE
            && u32_at(&fixed, 0) == EOCD_SIGNATURE
            && u16_at(&fixed, 20) == 0
        {
            let cd_offset = u32_at(&fixed, 16) as u64;
            debug!(cd_offset, "end of central directory at EOF");
            return Ok(Some(cd_offset));
        }
    }

    // 2. the comment can push the record up to 64 KiB away from EOF; scan
    //    the trailing window backwards and take the first match from the end
    let window_start = len.saturating_sub(MAX_SEARCH_WINDOW);
    file.seek(SeekFrom::Start(window_start))?;
    let mut tail = vec![0u8; (len - window_start) as usize];
    let filled = read_at_most(file, &mut tail)?;
    tail.truncate(filled);

    for pos in (0..tail.len().saturating_sub(3)).rev() {
        if u32_at(&tail, pos) != EOCD_SIGNATURE {
            continue;
        }
        // too close to EOF to hold the fixed record; keep scanning
        if pos + EOCD_FIXED_SIZE > tail.len() {
            continue;
        }
        let cd_offset = u32_at(&tail, pos + 16) as u64;
        debug!(
            eocd_offset = window_start + pos as u64,
            cd_offset, "end of central directory located"
        );
        return Ok(Some(cd_offset));
    }

    debug!("no end of central directory signature in the trailing window");
    Ok(None)
}
