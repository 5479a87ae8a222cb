//! Per-source framing helpers
//!
//! Each helper frames exactly one entry and returns the uncompressed size and CRC-32 of what
//! went in. Resources opened for an entry are dropped before the helper returns.

use crate::archive::ArchiveEntry;
use crate::error::{Result, ZipperError};
use std::fs::File;
use std::io::{self, Read, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Size and CRC-32 of the bytes written for one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Written {
    pub size: u64,
    pub crc32: u32,
}

/// Writer adapter counting and checksumming everything that passes through
struct Tally<W> {
    inner: W,
    hasher: crc32fast::Hasher,
    size: u64,
}

impl<W: Write> Tally<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: crc32fast::Hasher::new(),
            size: 0,
        }
    }

    fn finish(self) -> Written {
        Written {
            size: self.size,
            crc32: self.hasher.finalize(),
        }
    }
}

impl<W: Write> Write for Tally<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.size += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

pub(crate) fn write_bytes<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    data: &[u8],
    options: SimpleFileOptions,
) -> Result<Written> {
    zip.start_file(name, options)
        .map_err(|e| ZipperError::framing(name, e))?;
    zip.write_all(data).map_err(|e| ZipperError::copy(name, e))?;

    Ok(Written {
        size: data.len() as u64,
        crc32: crc32fast::hash(data),
    })
}

/// Frame `name` and drain `reader` into it
pub(crate) fn write_reader<W: Write + Seek, R: Read + ?Sized>(
    zip: &mut ZipWriter<W>,
    name: &str,
    reader: &mut R,
    options: SimpleFileOptions,
) -> Result<Written> {
    zip.start_file(name, options)
        .map_err(|e| ZipperError::framing(name, e))?;

    let mut tally = Tally::new(&mut *zip);
    io::copy(reader, &mut tally).map_err(|e| ZipperError::copy(name, e))?;
    Ok(tally.finish())
}

/// Open `path` and frame its contents as `name`
pub(crate) fn write_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    path: &Path,
    options: SimpleFileOptions,
) -> Result<Written> {
    let mut file = File::open(path)
        .map_err(|e| ZipperError::unavailable(name, format!("{}: {}", path.display(), e)))?;
    write_reader(zip, name, &mut file, options)
}

/// Re-frame a borrowed entry under `name` without recompressing it
pub(crate) fn write_archive_entry<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    entry: &ArchiveEntry,
) -> Result<Written> {
    entry.copy_raw_into(zip, name)?;

    let header = entry.header();
    Ok(Written {
        size: header.size,
        crc32: header.crc32,
    })
}
