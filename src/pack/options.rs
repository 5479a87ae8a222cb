use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use zip::write::SimpleFileOptions;

/// Compression applied to newly framed entries
///
/// Borrowed archive entries always keep the method they were stored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Stored,
    #[default]
    Deflated,
    Zstd,
}

impl From<Compression> for zip::CompressionMethod {
    fn from(compression: Compression) -> Self {
        match compression {
            Compression::Stored => zip::CompressionMethod::Stored,
            Compression::Deflated => zip::CompressionMethod::Deflated,
            Compression::Zstd => zip::CompressionMethod::Zstd,
        }
    }
}

/// Options controlling how entries are framed
///
/// Can be loaded from TOML:
///
/// ```toml
/// compression = "zstd"
/// compression_level = 3
/// unix_permissions = 0o644
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackOptions {
    pub compression: Compression,

    /// Codec-specific level; the codec default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_level: Option<i64>,

    /// Unix mode recorded for newly framed entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unix_permissions: Option<u32>,

    /// Always write ZIP64 headers, required for entries of 4 GiB and more
    pub large_file: bool,
}

impl PackOptions {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_compression_level(mut self, level: i64) -> Self {
        self.compression_level = Some(level);
        self
    }

    pub fn with_unix_permissions(mut self, mode: u32) -> Self {
        self.unix_permissions = Some(mode);
        self
    }

    pub fn with_large_file(mut self, large_file: bool) -> Self {
        self.large_file = large_file;
        self
    }

    /// Codec options for a newly framed entry
    pub(crate) fn file_options(&self) -> SimpleFileOptions {
        let options = SimpleFileOptions::default()
            .compression_method(self.compression.into())
            .compression_level(self.compression_level)
            .large_file(self.large_file);

        match self.unix_permissions {
            Some(mode) => options.unix_permissions(mode),
            None => options,
        }
    }
}
