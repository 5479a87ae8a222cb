//! Zipper-rs: deferred ZIP archive builder
//!
//! Entries are registered in a [`FileTable`] under archive-relative names and only resolved
//! when the table is packed:
//! - Byte buffers and text
//! - Open streams (drained once)
//! - Files on disk (opened at pack time)
//! - Entries borrowed from an existing archive (copied without recompression)
//!
//! The table can be edited freely before packing: re-adding a name replaces the entry, and
//! entries can be removed by name, by literal prefix or by shell mask.
//!
//! # Example
//!
//! ```
//! use zipper_rs::FileTable;
//!
//! let mut table = FileTable::new();
//! table
//!     .add_str("a/b.txt", "Hello world")
//!     .add_bytes("a/c.bin", vec![0u8, 1, 2])
//!     .remove_by_prefix("a/c");
//!
//! let bytes = table.pack()?;
//!
//! let mut archive = zipper_rs::zip::ZipArchive::new(std::io::Cursor::new(bytes))?;
//! assert_eq!(archive.len(), 1);
//! assert_eq!(archive.by_index(0)?.name(), "a/b.txt");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod error;
pub mod mask;
pub mod pack;
pub mod source;
pub mod table;

// Re-export commonly used types
pub use archive::{ArchiveEntry, EntryHeader, SourceArchive};
pub use error::{Result, ZipperError};
pub use mask::Mask;
pub use pack::{Compression, PackOptions, PackReport, PackedEntry, Packer};
pub use source::{EntrySource, SourceKind};
pub use table::FileTable;

pub use zip;
