use crate::error::Result;
use crate::source::SourceKind;
use serde::Serialize;

/// One entry written by a pack
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackedEntry {
    pub name: String,
    pub kind: SourceKind,
    /// Uncompressed size in bytes
    pub size: u64,
    /// CRC-32 of the uncompressed bytes
    pub crc32: u32,
}

/// Summary of a finished pack
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackReport {
    /// Entries in the order they were written
    pub entries: Vec<PackedEntry>,
    /// Size of the finished archive; zero when entries were appended to a caller-owned writer
    pub archive_size: u64,
}

impl PackReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total uncompressed bytes across all entries
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|entry| entry.size).sum()
    }

    pub fn entry(&self, name: &str) -> Option<&PackedEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
