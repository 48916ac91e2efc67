//! Fuzz target for the quote normalizer.
//!
//! Checks that normalizing arbitrary bytes never panics and that the
//! canonical output always parses without a file-level error.

#![no_main]

use langbase::{QuoteNormalizer, TableReader};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let Ok((canonical, stats)) = QuoteNormalizer::new().normalize_bytes(data) else {
        return;
    };
    if stats.records == 0 {
        return;
    }

    let (table, rejected) = TableReader::new()
        .read_bytes(&canonical, "fuzz")
        .expect("canonical output must parse");
    assert_eq!(table.row_count() + rejected.len() + 1, stats.records);
});
