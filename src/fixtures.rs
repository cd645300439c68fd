//! Deterministic ZIP32 fixtures for tests.
//!
//! Timestamps and checksums are zeroed; the reader never consults them.
//! Corrupt variants are produced by patching the returned bytes in place.

use std::io::Write;

use flate2::Compression;
use flate2::write::DeflateEncoder;
use tempfile::NamedTempFile;

use crate::utils::u32_at;

/// Raw-Deflate compress `data` the way an archive writer would.
pub(crate) fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Builds an archive from `(name, payload, method)` triples. Payloads are
/// given as plaintext; method 8 entries are deflated here.
pub(crate) fn build_archive(entries: &[(&str, &[u8], u16)]) -> Vec<u8> {
    build_archive_with_comment(entries, b"")
}

pub(crate) fn build_archive_with_comment(
    entries: &[(&str, &[u8], u16)],
    comment: &[u8],
) -> Vec<u8> {
    let mut out = Vec::new();
    let mut cd = Vec::new();

    for (name, payload, method) in entries {
        let data = if *method == 8 {
            deflate(payload)
        } else {
            payload.to_vec()
        };
        let local_offset = out.len() as u32;

        out.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes()); // version needed
        out.extend_from_slice(&0u16.to_le_bytes()); // flags
        out.extend_from_slice(&method.to_le_bytes());
        out.extend_from_slice(&[0u8; 8]); // time, date, crc
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // extra length
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(&data);

        cd.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
        cd.extend_from_slice(&20u16.to_le_bytes()); // version made by
        cd.extend_from_slice(&20u16.to_le_bytes()); // version needed
        cd.extend_from_slice(&0u16.to_le_bytes()); // flags
        cd.extend_from_slice(&method.to_le_bytes());
        cd.extend_from_slice(&[0u8; 8]); // time, date, crc
        cd.extend_from_slice(&(data.len() as u32).to_le_bytes());
        cd.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        cd.extend_from_slice(&(name.len() as u16).to_le_bytes());
        cd.extend_from_slice(&0u16.to_le_bytes()); // extra length
        cd.extend_from_slice(&0u16.to_le_bytes()); // comment length
        cd.extend_from_slice(&[0u8; 8]); // disk start, attributes
        cd.extend_from_slice(&local_offset.to_le_bytes());
        cd.extend_from_slice(name.as_bytes());
    }

    let cd_offset = out.len() as u32;
    let cd_size = cd.len() as u32;
    out.extend_from_slice(&cd);
    out.extend_from_slice(&eocd_record(
        entries.len() as u16,
        cd_size,
        cd_offset,
        comment.len() as u16,
    ));
    out.extend_from_slice(comment);
    out
}

/// A fixed 22-byte end-of-central-directory record.
pub(crate) fn eocd_record(total: u16, cd_size: u32, cd_offset: u32, comment_len: u16) -> Vec<u8> {
    let mut record = Vec::with_capacity(22);
    record.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
    record.extend_from_slice(&0u16.to_le_bytes()); // disk number
    record.extend_from_slice(&0u16.to_le_bytes()); // disk with directory
    record.extend_from_slice(&total.to_le_bytes());
    record.extend_from_slice(&total.to_le_bytes());
    record.extend_from_slice(&cd_size.to_le_bytes());
    record.extend_from_slice(&cd_offset.to_le_bytes());
    record.extend_from_slice(&comment_len.to_le_bytes());
    record
}

/// First central directory offset, read back out of a commentless
/// fixture's trailer.
pub(crate) fn cd_start(bytes: &[u8]) -> u64 {
    u32_at(bytes, bytes.len() - 6) as u64
}

/// Writes `bytes` to a temporary file that lives as long as the handle.
pub(crate) fn temp_archive(bytes: &[u8]) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(bytes).unwrap();
    tmp.flush().unwrap();
    tmp
}
