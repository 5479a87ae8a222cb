//! Round-trip tests: every source kind packed and read back with the zip codec

use std::io::{Cursor, Read, Write};
use tempfile::tempdir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};
use zipper_rs::{FileTable, Packer, SourceArchive};

const SIMPLE_NAME: &str = "zipper/file/test.name";
const SIMPLE_VALUE: &[u8] = b"Hello world";

/// Helper: open packed bytes as an archive
fn open(bytes: Vec<u8>) -> ZipArchive<Cursor<Vec<u8>>> {
    ZipArchive::new(Cursor::new(bytes)).unwrap()
}

/// Helper: decompressed content of `name`, if present
fn content(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> Option<Vec<u8>> {
    let mut file = archive.by_name(name).ok()?;
    let mut data = Vec::new();
    file.read_to_end(&mut data).unwrap();
    Some(data)
}

/// Helper: pack the table and check it holds exactly `name` => `value`
fn check_single_entry(table: &mut FileTable, name: &str, value: &[u8]) {
    let mut archive = open(table.pack().unwrap());
    assert_eq!(archive.len(), 1);
    assert_eq!(content(&mut archive, name).unwrap(), value);
}

#[test]
fn test_add_bytes() {
    let mut table = FileTable::new();
    table.add_bytes(SIMPLE_NAME, SIMPLE_VALUE);
    check_single_entry(&mut table, SIMPLE_NAME, SIMPLE_VALUE);
}

#[test]
fn test_add_str() {
    let mut table = FileTable::new();
    table.add_str(SIMPLE_NAME, "Hello world");
    check_single_entry(&mut table, SIMPLE_NAME, SIMPLE_VALUE);
}

#[test]
fn test_add_reader() {
    let mut table = FileTable::new();
    table.add_reader(SIMPLE_NAME, Cursor::new(SIMPLE_VALUE.to_vec()));
    check_single_entry(&mut table, SIMPLE_NAME, SIMPLE_VALUE);
}

#[test]
fn test_add_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("simple.data");
    std::fs::write(&path, SIMPLE_VALUE).unwrap();

    let mut table = FileTable::new();
    table.add_file(SIMPLE_NAME, &path);
    check_single_entry(&mut table, SIMPLE_NAME, SIMPLE_VALUE);
}

#[test]
fn test_add_archive_entry() {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file(SIMPLE_NAME, SimpleFileOptions::default())
        .unwrap();
    zip.write_all(SIMPLE_VALUE).unwrap();
    let source = SourceArchive::from_bytes(zip.finish().unwrap().into_inner()).unwrap();

    let mut table = FileTable::new();
    table.add_archive_entry(SIMPLE_NAME, source.entry(SIMPLE_NAME).unwrap());
    check_single_entry(&mut table, SIMPLE_NAME, SIMPLE_VALUE);
}

#[test]
fn test_hello_world_scenario() {
    let mut table = FileTable::new();
    table.add_bytes("a/b.txt", b"Hello world".to_vec());

    let mut archive = open(table.pack().unwrap());
    assert_eq!(archive.len(), 1);
    assert_eq!(content(&mut archive, "a/b.txt").unwrap(), b"Hello world");

    table.remove("a/b.txt");
    let archive = open(table.pack().unwrap());
    assert_eq!(archive.len(), 0);
}

#[test]
fn test_mixed_sources_round_trip() {
    let dir = tempdir().unwrap();
    let disk_path = dir.path().join("disk.bin");
    let disk_data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    std::fs::write(&disk_path, &disk_data).unwrap();

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file("old/readme.md", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"# borrowed").unwrap();
    let source = SourceArchive::from_bytes(zip.finish().unwrap().into_inner()).unwrap();

    let mut table = FileTable::new();
    table
        .add_bytes("bytes.bin", vec![0u8, 159, 146, 150])
        .add_str("text/notes.txt", "line one\nline two\n")
        .add_reader("stream.log", Cursor::new(b"streamed".repeat(100)))
        .add_file("files/disk.bin", &disk_path)
        .add_archive_entries(&source);

    let expected: Vec<(&str, Vec<u8>)> = vec![
        ("bytes.bin", vec![0u8, 159, 146, 150]),
        ("files/disk.bin", disk_data.clone()),
        ("old/readme.md", b"# borrowed".to_vec()),
        ("stream.log", b"streamed".repeat(100)),
        ("text/notes.txt", b"line one\nline two\n".to_vec()),
    ];

    let mut archive = open(table.pack().unwrap());
    assert_eq!(archive.len(), expected.len());

    for (index, (name, data)) in expected.iter().enumerate() {
        // Entries are written in name order
        assert_eq!(archive.by_index(index).unwrap().name(), *name);
        assert_eq!(&content(&mut archive, name).unwrap(), data);
    }
}

#[test]
fn test_many_entries_round_trip() {
    let mut table = FileTable::new();
    for i in 0..250 {
        table.add_str(format!("dir{}/file{}.txt", i % 7, i), format!("content {}", i));
    }

    let mut archive = open(table.pack().unwrap());
    assert_eq!(archive.len(), 250);

    for i in 0..250 {
        let name = format!("dir{}/file{}.txt", i % 7, i);
        let expected = format!("content {}", i);
        assert_eq!(content(&mut archive, &name).unwrap(), expected.as_bytes());
    }
}

#[test]
fn test_empty_entries() {
    let mut table = FileTable::new();
    table
        .add_bytes("empty.bin", Vec::new())
        .add_str("empty.txt", "")
        .add_reader("empty.stream", std::io::empty());

    let mut archive = open(table.pack().unwrap());
    assert_eq!(archive.len(), 3);
    for name in ["empty.bin", "empty.txt", "empty.stream"] {
        assert!(content(&mut archive, name).unwrap().is_empty());
    }
}

#[test]
fn test_pack_is_fresh_each_time() {
    let mut table = FileTable::new();
    table.add_str("a.txt", "first");
    let first = table.pack().unwrap();

    table.add_str("b.txt", "second");
    let second = table.pack().unwrap();

    assert_eq!(open(first).len(), 1);
    assert_eq!(open(second).len(), 2);
}

#[test]
fn test_write_to_matches_pack() {
    let mut table = FileTable::new();
    table
        .add_bytes(SIMPLE_NAME, SIMPLE_VALUE)
        .add_str("other.txt", "other");

    let mut buffer = Vec::new();
    let written = table.write_to(&mut buffer).unwrap();
    assert_eq!(written, buffer.len() as u64);

    let mut from_sink = open(buffer);
    let mut from_pack = open(table.pack().unwrap());
    assert_eq!(from_sink.len(), from_pack.len());
    for name in [SIMPLE_NAME, "other.txt"] {
        assert_eq!(
            content(&mut from_sink, name).unwrap(),
            content(&mut from_pack, name).unwrap()
        );
    }
}

#[test]
fn test_write_to_seekable_streams_into_sink() {
    let mut table = FileTable::new();
    table.add_str("a.txt", "streamed straight into the sink");

    let (sink, report) = Packer::default()
        .write_to_seekable(&mut table, Cursor::new(Vec::new()))
        .unwrap();
    let bytes = sink.into_inner();

    assert_eq!(report.archive_size, bytes.len() as u64);
    let mut archive = open(bytes);
    assert_eq!(
        content(&mut archive, "a.txt").unwrap(),
        b"streamed straight into the sink"
    );
}

#[test]
fn test_write_to_path() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("out.zip");

    let mut table = FileTable::new();
    table.add_str("inside.txt", "on disk");

    let report = Packer::default().write_to_path(&mut table, &target).unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(
        std::fs::metadata(&target).unwrap().len(),
        report.archive_size
    );

    let mut archive = open(std::fs::read(&target).unwrap());
    assert_eq!(content(&mut archive, "inside.txt").unwrap(), b"on disk");
}
