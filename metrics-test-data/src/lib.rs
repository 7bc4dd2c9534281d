//! test data shared between the compact-metrics crates.
//!
//! Everything here is JSON text; tests parse it with the types under test.

use serde_json::{json, Map, Value};

pub static SERIF_16PX: &str = include_str!("../test_data/serif_16px.json");

/// [`SERIF_16PX`], in the legacy compact encoding.
pub static SERIF_16PX_LEGACY: &str = include_str!("../test_data/serif_16px.legacy.json");

pub static MONO_12PX: &str = include_str!("../test_data/mono_12px.json");

/// Baseline metrics shared by every generated document.
pub const BASE_METRICS: [f64; 5] = [12.0, 3.0, 9.5, 0.0, -3.0];

/// The shape shared by the first group of [`grouped_metrics_document`].
pub const GROUP_ONE: [f64; 5] = [8.0, 0.0, 7.5, 10.5, 0.0];

/// The shape shared by the second group of [`grouped_metrics_document`].
pub const GROUP_TWO: [f64; 5] = [4.5, 0.25, 4.25, 7.0, 2.0];

/// Compact documents that must be rejected when expanded.
pub mod malformed {
    /// Integer glyph entries with neither lookup table.
    pub static NO_TABLES: &str = r#"{
        "k": {},
        "b": { "fba": 12, "fbd": 3, "hb": 9.5, "ab": 0, "ib": -3 },
        "g": [0, null, 1],
        "s": null
    }"#;

    /// A tuplet table without the value table it indexes.
    pub static NO_VALUE_TABLE: &str = r#"{
        "k": {},
        "b": { "fba": 12, "fbd": 3, "hb": 9.5, "ab": 0, "ib": -3 },
        "g": [0, null, 0],
        "t": [[0, 0, 0, 0, 0]],
        "s": null
    }"#;

    /// Explicit and indexed glyph entries in the same array.
    pub static MIXED_ENTRIES: &str = r#"{
        "k": {},
        "b": { "fba": 12, "fbd": 3, "hb": 9.5, "ab": 0, "ib": -3 },
        "v": [0, 1, 2, 3, 4],
        "g": [[1, 0, 1, 1, 0], 0],
        "s": null
    }"#;

    /// A well formed tuplet document whose glyph array is too short.
    pub static SHORT_GLYPH_ARRAY: &str = r#"{
        "k": {},
        "b": { "fba": 12, "fbd": 3, "hb": 9.5, "ab": 0, "ib": -3 },
        "v": [0, 4.5],
        "g": [0, 0, null],
        "t": [[1, 0, 1, 1, 0]],
        "s": null
    }"#;
}

/// The JSON object describing one character.
pub fn character_metrics(glyph: [f64; 5], base: [f64; 5]) -> Value {
    json!({
        "width": glyph[0],
        "actualBoundingBoxLeft": glyph[1],
        "actualBoundingBoxRight": glyph[2],
        "actualBoundingBoxAscent": glyph[3],
        "actualBoundingBoxDescent": glyph[4],
        "fontBoundingBoxAscent": base[0],
        "fontBoundingBoxDescent": base[1],
        "hangingBaseline": base[2],
        "alphabeticBaseline": base[3],
        "ideographicBaseline": base[4],
    })
}

/// A metrics document from `(character, glyph metrics)` pairs and kerning.
pub fn metrics_document(
    glyphs: impl IntoIterator<Item = (char, [f64; 5])>,
    kerning: Value,
) -> String {
    let characters: Map<String, Value> = glyphs
        .into_iter()
        .map(|(c, glyph)| (c.to_string(), character_metrics(glyph, BASE_METRICS)))
        .collect();
    json!({
        "kerningTable": kerning,
        "characterMetrics": characters,
    })
    .to_string()
}

/// A document where the first 50 characters share [`GROUP_ONE`], the next
/// 50 share [`GROUP_TWO`] and every remaining character has its own metrics.
pub fn grouped_metrics_document(chars: &[char]) -> String {
    let glyphs = chars.iter().enumerate().map(|(i, c)| {
        let glyph = match i {
            0..50 => GROUP_ONE,
            50..100 => GROUP_TWO,
            _ => {
                let step = (i - 100) as f64 * 0.125;
                [3.0 + step, -0.5, 2.5 + step, 6.0 + step / 2.0, 1.0]
            }
        };
        (*c, glyph)
    });
    let kerning = json!({
        "A": { "V": -1.0, "W": -1.0, "Y": -0.75 },
        "L": { "T": -1.25 },
    });
    metrics_document(glyphs, kerning)
}

/// A document containing only `c`.
pub fn single_character_document(c: char) -> String {
    metrics_document([(c, [6.25, 0.5, 5.75, 7.0, 0.125])], json!({}))
}

/// A document with pseudo-random metrics and kerning for every character.
///
/// Values are multiples of 1/16 so they survive rounding unchanged. The same
/// `seed` always produces the same document.
pub fn varied_metrics_document(chars: &[char], seed: u64) -> String {
    let mut state = seed;
    let mut next = move |modulus: u64| {
        // constants from Knuth's MMIX
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) % modulus
    };
    let mut sixteenths = |max: u64| next(max * 16) as f64 / 16.0;

    let glyphs: Vec<_> = chars
        .iter()
        .map(|c| {
            let width = sixteenths(12);
            let ascent = sixteenths(10);
            (
                *c,
                [width, sixteenths(1) - 0.5, width - sixteenths(1), ascent, sixteenths(4)],
            )
        })
        .collect();

    let mut kerning = Map::new();
    for (i, left) in chars.iter().enumerate().step_by(3) {
        let mut row = Map::new();
        let adjustment = -sixteenths(2);
        for right in chars.iter().skip(i % 7).step_by(5) {
            if adjustment != 0.0 {
                row.insert(right.to_string(), json!(adjustment));
            }
        }
        if !row.is_empty() {
            kerning.insert(left.to_string(), Value::Object(row));
        }
    }
    metrics_document(glyphs, Value::Object(kerning))
}
