//! The verbose, in-memory metrics document.
//!
//! This is what the capture pipeline produces at build time and what the
//! runtime metrics store receives back from [`expand`](crate::expand).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{baseline::BaseMetrics, Error};

/// The five scalars that vary from character to character.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlyphMetrics {
    pub width: f64,
    pub actual_bounding_box_left: f64,
    pub actual_bounding_box_right: f64,
    pub actual_bounding_box_ascent: f64,
    pub actual_bounding_box_descent: f64,
}

/// Metrics of one character, as measured by the capture pipeline.
///
/// The last five fields are the same for every character of a font; see
/// [`BaseMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterMetrics {
    pub width: f64,
    pub actual_bounding_box_left: f64,
    pub actual_bounding_box_right: f64,
    pub actual_bounding_box_ascent: f64,
    pub actual_bounding_box_descent: f64,
    pub font_bounding_box_ascent: f64,
    pub font_bounding_box_descent: f64,
    pub hanging_baseline: f64,
    pub alphabetic_baseline: f64,
    pub ideographic_baseline: f64,
}

/// Sparse pair adjustments: left key → right key → adjustment.
///
/// Absent pairs have an adjustment of zero. Keys are normally single
/// characters, but any string is accepted and carried through compression
/// as a literal.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KerningTable(BTreeMap<String, BTreeMap<String, f64>>);

/// Everything known about one font configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDocument {
    #[serde(default)]
    pub kerning_table: KerningTable,
    pub character_metrics: BTreeMap<char, CharacterMetrics>,
    #[serde(default)]
    pub space_advancement_override_for_small_sizes_in_px: Option<f64>,
}

impl GlyphMetrics {
    /// Field names in the order used by [`to_array`][Self::to_array].
    pub const FIELD_NAMES: [&'static str; 5] = [
        "width",
        "actualBoundingBoxLeft",
        "actualBoundingBoxRight",
        "actualBoundingBoxAscent",
        "actualBoundingBoxDescent",
    ];

    pub fn to_array(self) -> [f64; 5] {
        [
            self.width,
            self.actual_bounding_box_left,
            self.actual_bounding_box_right,
            self.actual_bounding_box_ascent,
            self.actual_bounding_box_descent,
        ]
    }

    pub fn from_array(values: [f64; 5]) -> Self {
        let [width, left, right, ascent, descent] = values;
        GlyphMetrics {
            width,
            actual_bounding_box_left: left,
            actual_bounding_box_right: right,
            actual_bounding_box_ascent: ascent,
            actual_bounding_box_descent: descent,
        }
    }
}

impl CharacterMetrics {
    /// Combine per-character and font-wide metrics into one record.
    pub fn from_parts(glyph: GlyphMetrics, base: BaseMetrics) -> Self {
        CharacterMetrics {
            width: glyph.width,
            actual_bounding_box_left: glyph.actual_bounding_box_left,
            actual_bounding_box_right: glyph.actual_bounding_box_right,
            actual_bounding_box_ascent: glyph.actual_bounding_box_ascent,
            actual_bounding_box_descent: glyph.actual_bounding_box_descent,
            font_bounding_box_ascent: base.font_bounding_box_ascent,
            font_bounding_box_descent: base.font_bounding_box_descent,
            hanging_baseline: base.hanging_baseline,
            alphabetic_baseline: base.alphabetic_baseline,
            ideographic_baseline: base.ideographic_baseline,
        }
    }

    pub fn glyph(&self) -> GlyphMetrics {
        GlyphMetrics {
            width: self.width,
            actual_bounding_box_left: self.actual_bounding_box_left,
            actual_bounding_box_right: self.actual_bounding_box_right,
            actual_bounding_box_ascent: self.actual_bounding_box_ascent,
            actual_bounding_box_descent: self.actual_bounding_box_descent,
        }
    }

    pub fn base(&self) -> BaseMetrics {
        BaseMetrics {
            font_bounding_box_ascent: self.font_bounding_box_ascent,
            font_bounding_box_descent: self.font_bounding_box_descent,
            hanging_baseline: self.hanging_baseline,
            alphabetic_baseline: self.alphabetic_baseline,
            ideographic_baseline: self.ideographic_baseline,
        }
    }
}

impl KerningTable {
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the adjustment for a pair, replacing any previous value.
    pub fn insert(&mut self, left: impl Into<String>, right: impl Into<String>, adjustment: f64) {
        self.0
            .entry(left.into())
            .or_default()
            .insert(right.into(), adjustment);
    }

    /// The adjustment for a pair, or `0.0` if the pair is not kerned.
    pub fn get(&self, left: &str, right: &str) -> f64 {
        self.0
            .get(left)
            .and_then(|row| row.get(right))
            .copied()
            .unwrap_or(0.0)
    }

    /// All adjustments with `left` as the first character.
    pub fn row(&self, left: &str) -> Option<&BTreeMap<String, f64>> {
        self.0.get(left)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, f64>)> + '_ {
        self.0.iter().map(|(left, row)| (left.as_str(), row))
    }

    /// The number of stored pairs.
    pub fn pair_count(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeMap::is_empty)
    }

    /// A copy with zero adjustments and empty rows removed.
    ///
    /// This is the form a table has after a trip through a compact document.
    pub fn without_defaults(&self) -> KerningTable {
        KerningTable(
            self.0
                .iter()
                .filter_map(|(left, row)| {
                    let row: BTreeMap<_, _> = row
                        .iter()
                        .filter(|(_, adjustment)| **adjustment != 0.0)
                        .map(|(right, adjustment)| (right.clone(), *adjustment))
                        .collect();
                    (!row.is_empty()).then(|| (left.clone(), row))
                })
                .collect(),
        )
    }
}

impl<L: Into<String>, R: Into<String>> FromIterator<(L, R, f64)> for KerningTable {
    fn from_iter<T: IntoIterator<Item = (L, R, f64)>>(iter: T) -> Self {
        let mut table = KerningTable::new();
        for (left, right, adjustment) in iter {
            table.insert(left, right, adjustment);
        }
        table
    }
}

impl MetricsDocument {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    /// The metrics of one character, if the document covers it.
    pub fn metrics_for(&self, c: char) -> Option<&CharacterMetrics> {
        self.character_metrics.get(&c)
    }

    /// The kerning adjustment between two characters.
    pub fn kerning(&self, left: char, right: char) -> f64 {
        let mut left_buf = [0; 4];
        let mut right_buf = [0; 4];
        self.kerning_table
            .get(left.encode_utf8(&mut left_buf), right.encode_utf8(&mut right_buf))
    }

    /// A copy whose kerning table has no zero adjustments.
    pub fn without_default_kerning(&self) -> MetricsDocument {
        MetricsDocument {
            kerning_table: self.kerning_table.without_defaults(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kerning_defaults_to_zero() {
        let table: KerningTable = [("A", "V", -1.5), ("T", "o", -0.75)].into_iter().collect();
        assert_eq!(table.get("A", "V"), -1.5);
        assert_eq!(table.get("V", "A"), 0.0);
        assert_eq!(table.get("Q", "u"), 0.0);
        assert_eq!(table.pair_count(), 2);
    }

    #[test]
    fn pruning_defaults() {
        let table: KerningTable = [("A", "V", -1.0), ("A", "W", 0.0), ("B", "B", 0.0)]
            .into_iter()
            .collect();
        let pruned = table.without_defaults();
        assert_eq!(pruned.pair_count(), 1);
        assert!(pruned.row("B").is_none());
        assert_eq!(pruned.get("A", "V"), -1.0);
        assert!(KerningTable::new().is_empty());
    }

    #[test]
    fn document_json_field_names() {
        let json = r#"{
            "kerningTable": { "A": { "V": -2 } },
            "characterMetrics": {
                "A": {
                    "width": 10, "actualBoundingBoxLeft": 0, "actualBoundingBoxRight": 10,
                    "actualBoundingBoxAscent": 12, "actualBoundingBoxDescent": 0,
                    "fontBoundingBoxAscent": 14, "fontBoundingBoxDescent": 4,
                    "hangingBaseline": 11, "alphabeticBaseline": 0, "ideographicBaseline": -4
                }
            },
            "spaceAdvancementOverrideForSmallSizesInPx": null
        }"#;
        let doc = MetricsDocument::from_json(json).unwrap();
        assert_eq!(doc.kerning('A', 'V'), -2.0);
        let metrics = doc.metrics_for('A').unwrap();
        assert_eq!(metrics.glyph().to_array(), [10.0, 0.0, 10.0, 12.0, 0.0]);
        assert_eq!(metrics.base().ideographic_baseline, -4.0);
        assert_eq!(doc.space_advancement_override_for_small_sizes_in_px, None);

        let reparsed = MetricsDocument::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn parts_recombine() {
        let glyph = GlyphMetrics::from_array([5.0, 0.5, 4.5, 7.0, 0.25]);
        let base = BaseMetrics {
            font_bounding_box_ascent: 9.0,
            font_bounding_box_descent: 3.0,
            hanging_baseline: 7.5,
            alphabetic_baseline: 0.0,
            ideographic_baseline: -3.0,
        };
        let metrics = CharacterMetrics::from_parts(glyph, base);
        assert_eq!(metrics.glyph(), glyph);
        assert_eq!(metrics.base(), base);
    }
}
