use crate::archive::ArchiveEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::PathBuf;

/// Where the bytes of a table entry come from
///
/// Nothing is opened or read when a source is registered. Files and archive entries are opened
/// at pack time, streams are drained at pack time.
pub enum EntrySource {
    /// Bytes supplied directly
    Bytes(Vec<u8>),
    /// Text supplied directly, packed as its UTF-8 bytes
    Text(String),
    /// An open stream, drained exactly once
    ///
    /// `None` once the stream has been consumed.
    Stream(Option<Box<dyn Read + Send>>),
    /// A file on disk
    File(PathBuf),
    /// An entry borrowed from another archive, copied without recompression
    Archive(ArchiveEntry),
}

/// Discriminant of an [`EntrySource`], used in logs and pack reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Bytes,
    Text,
    Stream,
    File,
    Archive,
}

impl EntrySource {
    /// Wrap a reader as a single-use stream source
    pub fn stream<R: Read + Send + 'static>(reader: R) -> Self {
        EntrySource::Stream(Some(Box::new(reader)))
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            EntrySource::Bytes(_) => SourceKind::Bytes,
            EntrySource::Text(_) => SourceKind::Text,
            EntrySource::Stream(_) => SourceKind::Stream,
            EntrySource::File(_) => SourceKind::File,
            EntrySource::Archive(_) => SourceKind::Archive,
        }
    }

    /// True for a stream source that has already been drained
    pub fn is_consumed(&self) -> bool {
        matches!(self, EntrySource::Stream(None))
    }
}

impl fmt::Debug for EntrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntrySource::Bytes(data) => f.debug_tuple("Bytes").field(&data.len()).finish(),
            EntrySource::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            EntrySource::Stream(slot) => f
                .debug_tuple("Stream")
                .field(&if slot.is_some() { "pending" } else { "consumed" })
                .finish(),
            EntrySource::File(path) => f.debug_tuple("File").field(path).finish(),
            EntrySource::Archive(entry) => f.debug_tuple("Archive").field(entry).finish(),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Bytes => "bytes",
            SourceKind::Text => "text",
            SourceKind::Stream => "stream",
            SourceKind::File => "file",
            SourceKind::Archive => "archive",
        };
        f.write_str(name)
    }
}

impl From<Vec<u8>> for EntrySource {
    fn from(data: Vec<u8>) -> Self {
        EntrySource::Bytes(data)
    }
}

impl From<&[u8]> for EntrySource {
    fn from(data: &[u8]) -> Self {
        EntrySource::Bytes(data.to_vec())
    }
}

impl From<String> for EntrySource {
    fn from(text: String) -> Self {
        EntrySource::Text(text)
    }
}

impl From<&str> for EntrySource {
    fn from(text: &str) -> Self {
        EntrySource::Text(text.to_string())
    }
}

impl From<PathBuf> for EntrySource {
    fn from(path: PathBuf) -> Self {
        EntrySource::File(path)
    }
}

impl From<ArchiveEntry> for EntrySource {
    fn from(entry: ArchiveEntry) -> Self {
        EntrySource::Archive(entry)
    }
}
