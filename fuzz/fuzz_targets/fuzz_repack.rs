#![no_main]

use libfuzzer_sys::fuzz_target;
use zipper_rs::{FileTable, SourceArchive};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as a source archive - should never panic
    let source = match SourceArchive::from_bytes(data.to_vec()) {
        Ok(s) => s,
        Err(_) => return, // Expected for invalid data
    };

    let mut table = FileTable::from_archive(&source);

    // Reading entries may fail on corrupt data, but must not panic
    let names: Vec<String> = table.names().map(str::to_string).collect();
    for name in &names {
        let _ = table.read(name);
    }

    // Re-framing borrowed entries copies them raw
    let _ = table.pack();
});
