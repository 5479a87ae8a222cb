//! Virtual file table
//!
//! The table maps archive-relative entry names to [`EntrySource`]s. Registering an entry never
//! performs I/O; sources are only resolved when the table is packed or an entry is read
//! through [`FileTable::reader`].

use crate::archive::{ArchiveEntry, SourceArchive};
use crate::error::{Result, ZipperError};
use crate::mask::Mask;
use crate::pack::Packer;
use crate::source::EntrySource;
use std::collections::btree_map::{self, BTreeMap};
use std::io::{Read, Write};
use std::path::PathBuf;

/// Pending archive contents, keyed by entry name
///
/// Names are taken verbatim: no normalization is applied, so callers should use
/// forward-slash, archive-relative names. Iteration (and therefore packing) happens in
/// byte-wise name order.
#[derive(Debug, Default)]
pub struct FileTable {
    entries: BTreeMap<String, EntrySource>,
}

impl FileTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table holding every entry of `archive` under its original name
    pub fn from_archive(archive: &SourceArchive) -> Self {
        let mut table = Self::new();
        table.add_archive_entries(archive);
        table
    }

    /// Insert or replace the entry for `name`
    pub fn add(&mut self, name: impl Into<String>, source: impl Into<EntrySource>) -> &mut Self {
        let name = name.into();
        let source = source.into();
        tracing::trace!(%name, kind = %source.kind(), "registered entry");
        self.entries.insert(name, source);
        self
    }

    /// Register an in-memory byte buffer
    pub fn add_bytes(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> &mut Self {
        self.add(name, EntrySource::Bytes(data.into()))
    }

    /// Register text, packed as its UTF-8 bytes
    pub fn add_str(&mut self, name: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.add(name, EntrySource::Text(text.into()))
    }

    /// Register an open stream; it is drained when the table is packed and cannot be reused
    pub fn add_reader<R: Read + Send + 'static>(
        &mut self,
        name: impl Into<String>,
        reader: R,
    ) -> &mut Self {
        self.add(name, EntrySource::stream(reader))
    }

    /// Register a file on disk; it is opened only at pack time
    pub fn add_file(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> &mut Self {
        self.add(name, EntrySource::File(path.into()))
    }

    /// Register an entry borrowed from another archive under `name`
    pub fn add_archive_entry(&mut self, name: impl Into<String>, entry: ArchiveEntry) -> &mut Self {
        self.add(name, EntrySource::Archive(entry))
    }

    /// Register every entry of `archive` under its original name
    pub fn add_archive_entries(&mut self, archive: &SourceArchive) -> &mut Self {
        for entry in archive.entries() {
            let name = entry.name().to_string();
            self.add_archive_entry(name, entry);
        }
        self
    }

    /// Delete the entry for `name`, if any
    pub fn remove(&mut self, name: &str) -> &mut Self {
        if self.entries.remove(name).is_some() {
            tracing::trace!(%name, "removed entry");
        }
        self
    }

    /// Delete every entry whose name starts with `prefix`
    ///
    /// This is a literal string prefix, not a path ancestor check: `"ab"` also removes
    /// `"abc/x"`.
    pub fn remove_by_prefix(&mut self, prefix: &str) -> &mut Self {
        let before = self.entries.len();
        self.entries.retain(|name, _| !name.starts_with(prefix));
        tracing::trace!(%prefix, removed = before - self.entries.len(), "removed entries by prefix");
        self
    }

    /// Delete every entry matching the shell mask `mask`
    ///
    /// The mask is compiled before anything is removed, so a malformed mask leaves the table
    /// untouched. Returns the number of removed entries.
    pub fn remove_by_mask(&mut self, mask: &str) -> Result<usize> {
        let mask = Mask::new(mask)?;
        Ok(self.remove_matching(&mask))
    }

    /// Delete every entry matching an already compiled mask
    pub fn remove_matching(&mut self, mask: &Mask) -> usize {
        let before = self.entries.len();
        self.entries.retain(|name, _| !mask.matches(name));
        let removed = before - self.entries.len();
        tracing::trace!(%mask, removed, "removed entries by mask");
        removed
    }

    /// Open a reader over the current content of `name`
    ///
    /// In-memory sources are read in place, files are opened now and borrowed archive entries
    /// are decompressed now. A stream source is handed out as-is, which consumes it: a later
    /// read or pack of the same entry fails with [`ZipperError::SourceUnavailable`].
    pub fn reader(&mut self, name: &str) -> Result<Box<dyn Read + '_>> {
        let source = self
            .entries
            .get_mut(name)
            .ok_or_else(|| ZipperError::NotFound(name.to_string()))?;

        match source {
            EntrySource::Bytes(data) => Ok(Box::new(data.as_slice())),
            EntrySource::Text(text) => Ok(Box::new(text.as_bytes())),
            EntrySource::Stream(slot) => {
                let reader: Box<dyn Read + '_> = slot
                    .take()
                    .ok_or_else(|| ZipperError::unavailable(name, "stream already consumed"))?;
                Ok(reader)
            }
            EntrySource::File(path) => {
                let file = std::fs::File::open(&*path).map_err(|e| {
                    ZipperError::unavailable(name, format!("{}: {}", path.display(), e))
                })?;
                Ok(Box::new(file))
            }
            EntrySource::Archive(entry) => {
                let data = entry.read_all(name)?;
                Ok(Box::new(std::io::Cursor::new(data)))
            }
        }
    }

    /// Read the whole current content of `name` into memory
    pub fn read(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        self.reader(name)?
            .read_to_end(&mut data)
            .map_err(|e| ZipperError::copy(name, e))?;
        Ok(data)
    }

    pub fn get(&self, name: &str) -> Option<&EntrySource> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names in pack order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub(crate) fn entries_mut(&mut self) -> btree_map::IterMut<'_, String, EntrySource> {
        self.entries.iter_mut()
    }

    /// Pack the table with default options
    pub fn pack(&mut self) -> Result<Vec<u8>> {
        Packer::default().pack(self)
    }

    /// Pack the table with default options into `sink`, returning the number of bytes written
    pub fn write_to<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<u64> {
        Packer::default().write_to(self, sink)
    }
}
