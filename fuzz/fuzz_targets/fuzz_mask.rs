#![no_main]

use libfuzzer_sys::fuzz_target;
use zipper_rs::FileTable;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let (mask, names) = text.split_once('\n').unwrap_or((text.as_ref(), ""));

    let mut table = FileTable::new();
    for name in names.lines() {
        table.add_str(name, "");
    }
    let before = table.len();

    match table.remove_by_mask(mask) {
        Ok(removed) => assert_eq!(before - removed, table.len()),
        // A rejected mask never touches the table
        Err(_) => assert_eq!(before, table.len()),
    }

    let _ = table.pack();
});
