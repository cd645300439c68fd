//! Lazy, offset-caching ZIP32 reader for JAR-style archives.
//!
//! Answers one question efficiently and repeatedly: does an entry matching
//! this name (or predicate) exist in the archive, and if so, what are its
//! bytes. The central directory is never indexed up front. Headers are
//! parsed only when a search reaches them, every header walked over is
//! memoized by offset, and later searches resume from where earlier ones
//! stopped instead of rescanning the directory.
//!
//! Supports the subset of ZIP32 that JVM class loading actually uses:
//! stored and raw-Deflate entries. Zip64, encryption and multi-disk
//! archives are out of scope; entries using other compression methods are
//! rejected with a typed error when their payload is requested.
//!
//! ```ignore
//! use jar_probe::JarParser;
//!
//! let mut parser = JarParser::open("app.jar")?;
//! if let Some(entry) = parser.find("META-INF/MANIFEST.MF")? {
//!     println!("{}", String::from_utf8_lossy(entry.data()?));
//! }
//! let main = parser.find_matching(|name| name.ends_with("Main.class"))?;
//! ```

use std::path::Path;

mod cdfh;
mod entry;
mod eocd;
mod lfh;
mod parser;
mod utils;

#[cfg(test)]
mod fixtures;

pub use cdfh::{CdfhError, DirectoryRecord};
pub use entry::{EntryError, METHOD_DEFLATED, METHOD_STORED, ZipEntry};
pub use eocd::EocdError;
pub use lfh::LfhError;
pub use parser::JarParser;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A search was attempted but no end-of-central-directory record was
    /// ever located for the current archive.
    #[error("central directory is absent or was never located")]
    NoCentralDirectory,
    #[error(transparent)]
    Eocd(#[from] EocdError),
    #[error(transparent)]
    Directory(#[from] CdfhError),
    #[error(transparent)]
    LocalFile(#[from] LfhError),
    #[error(transparent)]
    Entry(#[from] EntryError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Extracts one entry's bytes from the archive at `path`.
///
/// One-shot convenience over [`JarParser`]: open, search by exact name,
/// inflate. Callers that search the same archive more than once should keep
/// a [`JarParser`] instead, so the walked offsets stay cached between
/// searches.
pub fn read_jar_entry<P: AsRef<Path>>(path: P, name: &str) -> Result<Option<Vec<u8>>, Error> {
    let mut parser = JarParser::open(path)?;
    match parser.find(name)? {
        Some(entry) => Ok(Some(entry.data()?.to_vec())),
        None => Ok(None),
    }
}
