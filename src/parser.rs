//! The search session: lazy directory walks, offset memoization and the
//! relocate-then-restore cursor protocol.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use tracing::debug;

use crate::Error;
use crate::cdfh::{self, DirectoryRecord};
use crate::entry::ZipEntry;
use crate::eocd;
use crate::lfh;

/// Lazy ZIP32 reader specialized for the subset JAR files use.
///
/// The central directory is never indexed up front. Each search walks
/// headers forward from the session's home cursor, memoizing the offset of
/// every header it passes over, so a later search either resumes where an
/// earlier one stopped or jumps straight to a name it has already seen.
/// Duplicate names resolve to their first on-disk occurrence.
///
/// A session owns its file handle exclusively; [`JarParser::swap`] is the
/// only way to point it at a different archive.
///
/// ```ignore
/// let mut parser = JarParser::open("app.jar")?;
/// if let Some(entry) = parser.find("META-INF/MANIFEST.MF")? {
///     println!("{}", String::from_utf8_lossy(entry.data()?));
/// }
/// ```
#[derive(Debug)]
pub struct JarParser {
    file: File,
    /// Offset of the next unread central directory header. `None` until an
    /// end-of-central-directory record has been located.
    cursor: Option<u64>,
    /// Name to header-offset map of every header walked over so far.
    cache: HashMap<String, u64>,
}

impl JarParser {
    /// Opens the archive at `path` and locates its central directory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::new(File::open(path)?)
    }

    /// Wraps an already opened archive handle.
    ///
    /// The locator runs once here. An archive without an
    /// end-of-central-directory record is not rejected until a search is
    /// attempted against it.
    pub fn new(mut file: File) -> Result<Self, Error> {
        let cursor = eocd::locate(&mut file)?;
        Ok(Self {
            file,
            cursor,
            cache: HashMap::new(),
        })
    }

    /// Finds the entry whose name equals `name`.
    pub fn find(&mut self, name: &str) -> Result<Option<ZipEntry>, Error> {
        self.search(name, |target, candidate| target == candidate, |_| false)
    }

    /// Finds the first entry whose name satisfies `filter`.
    pub fn find_matching<F>(&mut self, filter: F) -> Result<Option<ZipEntry>, Error>
    where
        F: Fn(&str) -> bool,
    {
        self.search("", |_, candidate| filter(candidate), |_| false)
    }

    /// Finds the first entry for which `matcher(target, entry_name)` holds.
    ///
    /// `target` doubles as the key for the O(1) cache probe, so an
    /// equality-like matcher gets the fast path; any other matcher falls
    /// back to a linear scan over the cached names.
    pub fn find_with<M>(&mut self, target: &str, matcher: M) -> Result<Option<ZipEntry>, Error>
    where
        M: Fn(&str, &str) -> bool,
    {
        self.search(target, matcher, |_| false)
    }

    /// [`JarParser::find_with`] with an abort hook.
    ///
    /// `stop` sees every header before it is matched or cached; returning
    /// `true` ends the search with `Ok(None)`. The header that triggered
    /// the stop is not cached and the cursor does not advance past it.
    pub fn find_until<M, S>(
        &mut self,
        target: &str,
        matcher: M,
        stop: S,
    ) -> Result<Option<ZipEntry>, Error>
    where
        M: Fn(&str, &str) -> bool,
        S: FnMut(&DirectoryRecord) -> bool,
    {
        self.search(target, matcher, stop)
    }

    /// Re-targets the session at a different archive.
    ///
    /// The previous handle is closed, every cached offset is dropped and
    /// the locator runs against the new archive. One session can serve a
    /// whole sequence of archives this way without being rebuilt.
    pub fn swap(&mut self, file: File) -> Result<(), Error> {
        self.cursor = None;
        self.cache.clear();
        self.file = file;
        self.cursor = eocd::locate(&mut self.file)?;
        Ok(())
    }

    /// [`JarParser::swap`] by path.
    pub fn swap_path<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        self.swap(File::open(path)?)
    }

    fn search<M, S>(
        &mut self,
        target: &str,
        matcher: M,
        mut stop: S,
    ) -> Result<Option<ZipEntry>, Error>
    where
        M: Fn(&str, &str) -> bool,
        S: FnMut(&DirectoryRecord) -> bool,
    {
        let Some(home) = self.cursor else {
            return Err(Error::NoCentralDirectory);
        };

        // A cached name satisfying the matcher lets the walk start at its
        // header instead of the home cursor. The jump is speculative: the
        // walker re-reads and re-matches the header at that offset, and
        // `restore` undoes the relocation once the search ends.
        let (mut pos, restore) = match self.cached_offset(target, &matcher) {
            Some(hit) => {
                debug!(name = target, offset = hit, "cache hit, relocating walk");
                (hit, Some(home))
            }
            None => (home, None),
        };

        let mut found = None;
        loop {
            let Some(record) = cdfh::next_record(&mut self.file, pos)? else {
                break;
            };
            if stop(&record) {
                debug!(offset = record.offset, "search aborted by stop hook");
                break;
            }

            let resolved = if matcher(target, record.name.as_str()) {
                // an absent local header demotes the match to a skip
                lfh::read_local_entry(&mut self.file, &record)?
            } else {
                None
            };

            // Cache writes and home-cursor advances are suppressed for the
            // whole relocated walk; otherwise the speculative jump would
            // become the session's new home position.
            if restore.is_none() {
                self.cache.insert(record.name.clone(), record.offset);
                self.cursor = Some(record.next_offset);
            }

            if resolved.is_some() {
                found = resolved;
                break;
            }
            pos = record.next_offset;
        }

        if let Some(previous) = restore {
            self.cursor = Some(previous);
        }
        Ok(found)
    }

    /// Cache probe: exact-name lookup first, then a linear scan for
    /// arbitrary matchers. A hit is returned only when the matcher accepts
    /// the cached name, so a non-equality matcher can never be short-cut
    /// onto a name it would have rejected.
    fn cached_offset<M>(&self, target: &str, matcher: &M) -> Option<u64>
    where
        M: Fn(&str, &str) -> bool,
    {
        if let Some(&offset) = self.cache.get(target) {
            if matcher(target, target) {
                return Some(offset);
            }
        }
        self.cache
            .iter()
            .find(|(name, _)| matcher(target, name.as_str()))
            .map(|(_, &offset)| offset)
    }
}
