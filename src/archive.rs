//! Source archives
//!
//! A [`SourceArchive`] is an already existing ZIP archive whose entries can be borrowed into a
//! [`FileTable`](crate::FileTable). Borrowed entries are copied raw at pack time: the original
//! local header (compression method, timestamps, CRC) and the compressed bytes are carried
//! over instead of being decompressed and compressed again.

use crate::error::{Result, ZipperError};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Readable, seekable and sendable byte source backing a [`SourceArchive`]
pub trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

type SharedArchive = Arc<Mutex<ZipArchive<Box<dyn ReadSeek>>>>;

/// Header metadata of an entry in a source archive
#[derive(Debug, Clone, PartialEq)]
pub struct EntryHeader {
    /// Position of the entry in the source archive's central directory
    pub index: usize,
    /// Name as stored in the source archive
    pub name: String,
    pub compression: CompressionMethod,
    /// Uncompressed size in bytes
    pub size: u64,
    pub compressed_size: u64,
    pub crc32: u32,
    /// Why the entry's local header could not be read, if it could not
    ///
    /// Such an entry keeps its name but reports zeroed metadata, and fails with
    /// [`ZipperError::SourceUnavailable`] when it is read or packed.
    pub fault: Option<String>,
}

/// An opened ZIP archive shared between the entries borrowed from it
#[derive(Clone)]
pub struct SourceArchive {
    archive: SharedArchive,
    headers: Arc<[EntryHeader]>,
}

impl SourceArchive {
    /// Open an archive file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }

    /// Open an archive held in memory
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Result<Self> {
        Self::new(Cursor::new(data.into()))
    }

    /// Open an archive from any seekable reader
    ///
    /// The central directory is read once here; entry data is only touched when an entry is
    /// read or packed. A damaged local header only affects its own entry, see
    /// [`EntryHeader::fault`].
    pub fn new<R: Read + Seek + Send + 'static>(reader: R) -> Result<Self> {
        let reader: Box<dyn ReadSeek> = Box::new(reader);
        let mut archive = ZipArchive::new(reader)?;

        let mut headers = Vec::with_capacity(archive.len());
        let mut faulty = 0usize;
        for index in 0..archive.len() {
            let raw = archive
                .by_index_raw(index)
                .map(|file| EntryHeader {
                    index,
                    name: file.name().to_string(),
                    compression: file.compression(),
                    size: file.size(),
                    compressed_size: file.compressed_size(),
                    crc32: file.crc32(),
                    fault: None,
                })
                .map_err(|e| e.to_string());

            let header = match raw {
                Ok(header) => header,
                Err(fault) => {
                    let name = archive.name_for_index(index).unwrap_or_default().to_string();
                    tracing::warn!(index, %name, %fault, "unreadable entry in source archive");
                    faulty += 1;
                    EntryHeader {
                        index,
                        name,
                        compression: CompressionMethod::Stored,
                        size: 0,
                        compressed_size: 0,
                        crc32: 0,
                        fault: Some(fault),
                    }
                }
            };
            headers.push(header);
        }

        tracing::debug!(entries = headers.len(), faulty, "opened source archive");

        Ok(Self {
            archive: Arc::new(Mutex::new(archive)),
            headers: headers.into(),
        })
    }

    /// Number of entries in the archive
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Iterate over handles to every entry, in central directory order
    pub fn entries(&self) -> impl Iterator<Item = ArchiveEntry> + '_ {
        (0..self.headers.len()).map(move |index| ArchiveEntry {
            archive: self.clone(),
            index,
        })
    }

    /// Look up an entry by its stored name
    pub fn entry(&self, name: &str) -> Option<ArchiveEntry> {
        self.headers
            .iter()
            .position(|header| header.name == name)
            .map(|index| ArchiveEntry {
                archive: self.clone(),
                index,
            })
    }

    fn lock(&self, name: &str) -> Result<MutexGuard<'_, ZipArchive<Box<dyn ReadSeek>>>> {
        self.archive
            .lock()
            .map_err(|_| ZipperError::unavailable(name, "source archive lock poisoned"))
    }
}

impl fmt::Debug for SourceArchive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceArchive")
            .field("entries", &self.headers.len())
            .finish()
    }
}

/// Handle to one entry of a [`SourceArchive`]
///
/// Cheap to clone; the archive itself is shared.
#[derive(Clone)]
pub struct ArchiveEntry {
    archive: SourceArchive,
    index: usize,
}

impl ArchiveEntry {
    /// Original header metadata of the entry
    pub fn header(&self) -> &EntryHeader {
        &self.archive.headers[self.index]
    }

    /// Name as stored in the source archive
    pub fn name(&self) -> &str {
        &self.header().name
    }

    /// Decompress the entry into memory
    ///
    /// `name` is the table name the entry is registered under and only used for errors.
    pub(crate) fn read_all(&self, name: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.lock(name)?;
        let mut file = archive
            .by_index(self.index)
            .map_err(|e| ZipperError::unavailable(name, e.to_string()))?;

        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| ZipperError::copy(name, e))?;
        Ok(data)
    }

    /// Copy the entry raw into `zip` under `name`, keeping the original header metadata
    pub(crate) fn copy_raw_into<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        name: &str,
    ) -> Result<()> {
        let mut archive = self.archive.lock(name)?;
        let file = archive
            .by_index_raw(self.index)
            .map_err(|e| ZipperError::unavailable(name, e.to_string()))?;

        zip.raw_copy_file_rename(file, name)
            .map_err(|e| ZipperError::framing(name, e))
    }
}

impl fmt::Debug for ArchiveEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveEntry")
            .field("header", self.header())
            .finish()
    }
}
