#![no_main]
//! Loads arbitrary compact documents; malformed input must be rejected
//! with an error, never a panic.

use compact_metrics::{expand, minify, CompactDocument, Error};
use libfuzzer_sys::fuzz_target;

fn load(data: &[u8]) -> Result<(), Error> {
    let Ok(text) = std::str::from_utf8(data) else {
        return Ok(());
    };
    let compact = CompactDocument::from_json(text)?;
    let expanded = expand(&compact)?;
    let _ = minify(&expanded);
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = load(data);
});
