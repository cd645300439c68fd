//! A resolved archive entry and its lazily inflated payload.

use std::io::Read;

use flate2::read::DeflateDecoder;
use once_cell::sync::OnceCell;

/// Stored, no compression.
pub const METHOD_STORED: u16 = 0;
/// Raw Deflate.
pub const METHOD_DEFLATED: u16 = 8;

#[derive(thiserror::Error, Debug)]
pub enum EntryError {
    #[error("unsupported compression method {0}")]
    UnsupportedCompression(u16),
    #[error("entry '{name}' inflated to {actual} bytes, expected {expected}")]
    SizeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// An entry materialized from the archive body.
///
/// Carries the raw payload exactly as stored. [`ZipEntry::data`] inflates a
/// Deflate payload on first access and caches the result, so repeated reads
/// pay the inflation cost once.
#[derive(Debug)]
pub struct ZipEntry {
    name: String,
    compressed: Vec<u8>,
    compressed_size: u32,
    uncompressed_size: u32,
    compression_method: u16,
    inflated: OnceCell<Vec<u8>>,
}

impl ZipEntry {
    pub(crate) fn new(
        name: String,
        compressed: Vec<u8>,
        compressed_size: u32,
        uncompressed_size: u32,
        compression_method: u16,
    ) -> Self {
        Self {
            name,
            compressed,
            compressed_size,
            uncompressed_size,
            compression_method,
            inflated: OnceCell::new(),
        }
    }

    /// Entry name as recorded in the central directory.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Payload bytes exactly as stored in the archive body.
    pub fn compressed_data(&self) -> &[u8] {
        &self.compressed
    }

    /// Compressed size declared by the central directory.
    pub fn compressed_size(&self) -> u32 {
        self.compressed_size
    }

    /// Uncompressed size declared by the central directory.
    pub fn uncompressed_size(&self) -> u32 {
        self.uncompressed_size
    }

    /// Compression method code from the local header (0 stored, 8 Deflate).
    pub fn compression_method(&self) -> u16 {
        self.compression_method
    }

    /// The entry's payload, inflated if the entry is Deflate-compressed.
    ///
    /// Stored entries return the archive bytes as-is. For Deflate entries
    /// the inflated buffer is computed on first call and cached for the
    /// entry's lifetime. Any other method code is rejected.
    pub fn data(&self) -> Result<&[u8], EntryError> {
        match self.compression_method {
            METHOD_STORED => Ok(&self.compressed),
            METHOD_DEFLATED => self
                .inflated
                .get_or_try_init(|| self.inflate())
                .map(Vec::as_slice),
            other => Err(EntryError::UnsupportedCompression(other)),
        }
    }

    fn inflate(&self) -> Result<Vec<u8>, EntryError> {
        let expected = self.uncompressed_size as usize;
        let mut decoder = DeflateDecoder::new(self.compressed.as_slice());
        let mut inflated = Vec::with_capacity(expected);
        decoder.read_to_end(&mut inflated)?;
        if inflated.len() != expected {
            return Err(EntryError::SizeMismatch {
                name: self.name.clone(),
                expected,
                actual: inflated.len(),
            });
        }
        Ok(inflated)
    }
}
