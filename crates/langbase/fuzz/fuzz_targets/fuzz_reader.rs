//! Fuzz target for the tolerant table reader.
//!
//! Malformed rows must end up rejected, never as a panic or a row with the
//! wrong number of values.

#![no_main]

use langbase::TableReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    if let Ok((table, _rejected)) = TableReader::new().read_bytes(data, "fuzz") {
        for row in &table.rows {
            assert_eq!(row.len(), table.column_count());
        }
    }
});
