#![no_main]
//! Checks that kerning compression loses nothing but zero adjustments.

use compact_metrics::{kerning, CharacterSet, KerningTable};
use libfuzzer_sys::fuzz_target;

const PAIR_LIMIT: usize = 2_000;

fuzz_target!(|pairs: Vec<(u8, u8, i8)>| {
    let charset = CharacterSet::generate();
    let char_at = |ix: u8| charset.at(ix as usize % charset.len());

    let table: KerningTable = pairs
        .iter()
        .take(PAIR_LIMIT)
        .filter_map(|(left, right, adjustment)| {
            let (left, right) = (char_at(*left)?, char_at(*right)?);
            // a few distinct values, so runs actually form
            Some((left.to_string(), right.to_string(), (*adjustment % 4) as f64 / 2.0))
        })
        .collect();

    let compressed =
        kerning::compress(&table, &charset).expect("single characters always compress");
    let restored = kerning::decompress(&compressed, &charset).expect("compressed keys are valid");
    assert_eq!(restored, table.without_defaults());
});
