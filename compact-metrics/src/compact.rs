//! The compact, serializable form of a metrics document.

use serde::{Deserialize, Serialize};

use crate::{baseline::BaseMetrics, kerning::CompressedKerning, tuplet_table::Tuplet, Error};

/// One entry of the glyph array.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GlyphEntry {
    /// The five per-character scalars, written out in full.
    Explicit([f64; 5]),
    /// An index into the tuplet table, or into the flattened value table.
    Indexed(u32),
}

/// The decoding strategy a compact document requires.
///
/// Selected once by [`Tier::detect`] from the shape of the glyph array and
/// the presence of the lookup tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Glyph entries are explicit 5-element arrays; no lookup tables.
    Legacy,
    /// Glyph entries index a flattened 5×N value array in `v`.
    ValueIndexed,
    /// Glyph entries index tuplets in `t`, which index values in `v`.
    #[default]
    TupletIndexed,
}

/// A compact metrics document, as embedded in distributed assets.
///
/// `g` has one entry per character of the canonical character set, in
/// order; `null` marks a character the source document did not cover.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompactDocument {
    /// Kerning, with range keys.
    pub k: CompressedKerning,
    /// Baseline metrics shared by every character.
    pub b: BaseMetrics,
    /// Value lookup table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<Vec<f64>>,
    /// Glyph array.
    pub g: Vec<Option<GlyphEntry>>,
    /// Tuplet lookup table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<Vec<Tuplet>>,
    /// Space advance override for small sizes, in pixels.
    pub s: Option<f64>,
}

impl Tier {
    /// Determine how `document` must be decoded.
    ///
    /// Explicit glyph entries always mean [`Tier::Legacy`], whatever tables
    /// are present. Indexed entries need `t` and `v`, or `v` alone.
    pub fn detect(document: &CompactDocument) -> Result<Tier, Error> {
        let mut explicit = false;
        let mut indexed = false;
        for entry in document.g.iter().flatten() {
            match entry {
                GlyphEntry::Explicit(_) => explicit = true,
                GlyphEntry::Indexed(_) => indexed = true,
            }
        }

        match (explicit, indexed) {
            (true, true) => Err(Error::MixedGlyphEncodings),
            (true, false) => Ok(Tier::Legacy),
            _ => match (document.t.is_some(), document.v.is_some()) {
                (true, true) => Ok(Tier::TupletIndexed),
                (true, false) => Err(Error::MissingValueTable),
                (false, true) => Ok(Tier::ValueIndexed),
                (false, false) if indexed => Err(Error::MissingTupletTable),
                (false, false) => Ok(Tier::Legacy),
            },
        }
    }
}

impl CompactDocument {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    /// The tier this document would be decoded with.
    pub fn tier(&self) -> Result<Tier, Error> {
        Tier::detect(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(g: Vec<Option<GlyphEntry>>) -> CompactDocument {
        CompactDocument {
            k: Default::default(),
            b: Default::default(),
            v: None,
            g,
            t: None,
            s: None,
        }
    }

    #[test]
    fn glyph_entry_shapes() {
        let entries: Vec<Option<GlyphEntry>> =
            serde_json::from_str("[[1, 2.5, 3, 4, 5], 7, null]").unwrap();
        assert_eq!(
            entries,
            vec![
                Some(GlyphEntry::Explicit([1.0, 2.5, 3.0, 4.0, 5.0])),
                Some(GlyphEntry::Indexed(7)),
                None
            ]
        );
        assert!(serde_json::from_str::<GlyphEntry>("[1, 2, 3]").is_err());
        assert!(serde_json::from_str::<GlyphEntry>("-1").is_err());
        assert!(serde_json::from_str::<GlyphEntry>("1.5").is_err());
    }

    #[test]
    fn optional_tables_are_omitted() {
        let doc = document(vec![Some(GlyphEntry::Indexed(0))]);
        let json = doc.to_json().unwrap();
        assert!(!json.contains("\"v\""));
        assert!(!json.contains("\"t\""));
        assert!(json.contains("\"s\":null"));
        assert_eq!(CompactDocument::from_json(&json).unwrap(), doc);
    }

    #[test]
    fn detects_tiers() {
        let explicit = Some(GlyphEntry::Explicit([0.0; 5]));
        let indexed = Some(GlyphEntry::Indexed(0));

        let mut doc = document(vec![explicit, None]);
        assert_eq!(doc.tier().unwrap(), Tier::Legacy);
        // tables are ignored when entries are explicit
        doc.t = Some(vec![]);
        assert_eq!(doc.tier().unwrap(), Tier::Legacy);

        let mut doc = document(vec![None, indexed]);
        doc.v = Some(vec![0.0; 5]);
        assert_eq!(doc.tier().unwrap(), Tier::ValueIndexed);
        doc.t = Some(vec![[0; 5]]);
        assert_eq!(doc.tier().unwrap(), Tier::TupletIndexed);

        let doc = document(vec![None, None]);
        assert_eq!(doc.tier().unwrap(), Tier::Legacy);
    }

    #[test]
    fn missing_tables() {
        let mut doc = document(vec![Some(GlyphEntry::Indexed(0))]);
        let err = doc.tier().unwrap_err();
        assert!(matches!(err, Error::MissingTupletTable));
        let message = err.to_string();
        assert!(message.contains("tuplet lookup table"), "{message}");
        assert!(message.contains("value lookup table"), "{message}");

        doc.t = Some(vec![[0; 5]]);
        let err = doc.tier().unwrap_err();
        assert!(matches!(err, Error::MissingValueTable));
        assert!(err.to_string().contains("value lookup table"));
    }

    #[test]
    fn mixed_entries() {
        let doc = document(vec![
            Some(GlyphEntry::Explicit([0.0; 5])),
            Some(GlyphEntry::Indexed(0)),
        ]);
        assert!(matches!(doc.tier(), Err(Error::MixedGlyphEncodings)));
    }
}
