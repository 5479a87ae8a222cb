use crate::error::{Result, ZipperError};
use crate::pack::copy::{self, Written};
use crate::pack::options::PackOptions;
use crate::pack::report::{PackReport, PackedEntry};
use crate::source::EntrySource;
use crate::table::FileTable;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use zip::ZipWriter;

/// Serializes a [`FileTable`] into a ZIP archive
///
/// The packer holds nothing but its options; every call starts from the current state of the
/// table and produces a fresh archive.
#[derive(Debug, Clone, Default)]
pub struct Packer {
    options: PackOptions,
}

impl Packer {
    pub fn new(options: PackOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PackOptions {
        &self.options
    }

    /// Pack the table into an in-memory archive
    pub fn pack(&self, table: &mut FileTable) -> Result<Vec<u8>> {
        self.pack_with_report(table).map(|(archive, _)| archive)
    }

    /// Pack the table into an in-memory archive and report what was written
    pub fn pack_with_report(&self, table: &mut FileTable) -> Result<(Vec<u8>, PackReport)> {
        let (cursor, report) = self.serialize(table, Cursor::new(Vec::new()))?;
        Ok((cursor.into_inner(), report))
    }

    /// Pack the table and copy the archive into `sink`
    ///
    /// Returns the number of bytes written to the sink.
    pub fn write_to<W: Write + ?Sized>(&self, table: &mut FileTable, sink: &mut W) -> Result<u64> {
        let archive = self.pack(table)?;
        sink.write_all(&archive)?;
        sink.flush()?;
        Ok(archive.len() as u64)
    }

    /// Pack the table straight into a seekable sink, without buffering the whole archive
    pub fn write_to_seekable<W: Write + Seek>(
        &self,
        table: &mut FileTable,
        sink: W,
    ) -> Result<(W, PackReport)> {
        self.serialize(table, sink)
    }

    /// Pack the table into a file at `path`
    ///
    /// The archive is written to a temporary file in the same directory and moved into place
    /// once finalized, so `path` is never left holding a partial archive.
    pub fn write_to_path<P: AsRef<Path>>(
        &self,
        table: &mut FileTable,
        path: P,
    ) -> Result<PackReport> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let temp = NamedTempFile::new_in(dir)?;
        let (writer, report) = self.serialize(table, BufWriter::new(temp))?;
        let temp = writer.into_inner().map_err(|e| e.into_error())?;
        temp.persist(path).map_err(|e| e.error)?;

        tracing::info!(path = %path.display(), bytes = report.archive_size, "wrote archive");
        Ok(report)
    }

    /// Append every table entry to a caller-owned writer without finalizing it
    ///
    /// Several tables can be merged into one archive this way; the caller calls
    /// [`ZipWriter::finish`] once done.
    pub fn concat<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        table: &mut FileTable,
    ) -> Result<PackReport> {
        let mut report = PackReport::default();

        for (name, source) in table.entries_mut() {
            let kind = source.kind();
            let options = self.options.file_options();
            let Written { size, crc32 } = match source {
                EntrySource::Bytes(data) => copy::write_bytes(zip, name, data, options)?,
                EntrySource::Text(text) => copy::write_bytes(zip, name, text.as_bytes(), options)?,
                EntrySource::Stream(slot) => {
                    // Taken before copying: a failed copy still leaves the stream consumed
                    let mut reader = slot.take().ok_or_else(|| {
                        tracing::warn!(%name, "stream source already consumed");
                        ZipperError::unavailable(name, "stream already consumed")
                    })?;
                    copy::write_reader(zip, name, &mut reader, options)?
                }
                EntrySource::File(path) => copy::write_file(zip, name, path, options)?,
                EntrySource::Archive(entry) => copy::write_archive_entry(zip, name, entry)?,
            };

            tracing::debug!(%name, %kind, size, crc32 = format_args!("{:08x}", crc32), "packed entry");
            report.entries.push(PackedEntry {
                name: name.clone(),
                kind,
                size,
                crc32,
            });
        }

        Ok(report)
    }

    fn serialize<W: Write + Seek>(
        &self,
        table: &mut FileTable,
        sink: W,
    ) -> Result<(W, PackReport)> {
        let mut zip = ZipWriter::new(sink);
        let mut report = self.concat(&mut zip, table)?;

        let mut sink = zip.finish().map_err(ZipperError::Finalize)?;
        report.archive_size = sink.stream_position()?;

        tracing::info!(
            entries = report.len(),
            bytes = report.archive_size,
            "packed archive"
        );
        Ok((sink, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::options::Compression;
    use crate::source::SourceKind;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_empty_table_is_valid_archive() {
        let mut table = FileTable::new();
        let bytes = Packer::default().pack(&mut table).unwrap();

        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn test_report_covers_every_entry() {
        let mut table = FileTable::new();
        table
            .add_bytes("b.bin", vec![1u8, 2, 3])
            .add_str("a.txt", "Hello world")
            .add_reader("c.log", Cursor::new(b"line\n".to_vec()));

        let (bytes, report) = Packer::default().pack_with_report(&mut table).unwrap();

        assert_eq!(report.archive_size, bytes.len() as u64);
        let names: Vec<&str> = report.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.bin", "c.log"]);

        let text = report.entry("a.txt").unwrap();
        assert_eq!(text.kind, SourceKind::Text);
        assert_eq!(text.size, 11);
        assert_eq!(text.crc32, crc32fast::hash(b"Hello world"));
        assert_eq!(report.entry("c.log").unwrap().kind, SourceKind::Stream);
    }

    #[test]
    fn test_options_apply_to_new_entries() {
        let mut table = FileTable::new();
        table.add_str("plain.txt", "not compressed");

        let packer = Packer::new(PackOptions::default().with_compression(Compression::Stored));
        let bytes = packer.pack(&mut table).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let file = archive.by_name("plain.txt").unwrap();
        assert_eq!(file.compression(), zip::CompressionMethod::Stored);
        assert_eq!(file.compressed_size(), file.size());
    }

    #[test]
    fn test_unix_permissions_reach_output() {
        let mut table = FileTable::new();
        table
            .add_str("script.sh", "#!/bin/sh\n")
            .add_bytes("data.bin", vec![0u8; 16]);

        let packer = Packer::new(PackOptions::default().with_unix_permissions(0o640));
        let mut archive = ZipArchive::new(Cursor::new(packer.pack(&mut table).unwrap())).unwrap();

        for name in ["script.sh", "data.bin"] {
            let file = archive.by_name(name).unwrap();
            assert_eq!(file.unix_mode().unwrap() & 0o777, 0o640);
        }
    }

    #[test]
    fn test_large_file_archive_round_trips() {
        let mut table = FileTable::new();
        table
            .add_str("small.txt", "zip64 framed")
            .add_reader("stream.bin", Cursor::new(vec![42u8; 4096]));

        let packer = Packer::new(PackOptions::default().with_large_file(true));
        let (bytes, report) = packer.pack_with_report(&mut table).unwrap();
        assert_eq!(report.len(), 2);

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut text = String::new();
        archive
            .by_name("small.txt")
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "zip64 framed");

        let mut data = Vec::new();
        archive
            .by_name("stream.bin")
            .unwrap()
            .read_to_end(&mut data)
            .unwrap();
        assert_eq!(data, vec![42u8; 4096]);
    }

    #[test]
    fn test_concat_leaves_writer_open() {
        let mut first = FileTable::new();
        first.add_str("one.txt", "1");
        let mut second = FileTable::new();
        second.add_str("two.txt", "2");

        let packer = Packer::default();
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let report_one = packer.concat(&mut zip, &mut first).unwrap();
        let report_two = packer.concat(&mut zip, &mut second).unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        assert_eq!(report_one.archive_size, 0);
        assert_eq!(report_two.len(), 1);

        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert_eq!(archive.len(), 2);
        assert!(names.contains(&"one.txt"));
        assert!(names.contains(&"two.txt"));
    }
}
