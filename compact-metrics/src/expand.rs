//! Expanding compact documents back into full metrics documents

use crate::{
    baseline::BaseMetrics,
    charset::CharacterSet,
    compact::{CompactDocument, GlyphEntry, Tier},
    kerning,
    metrics::{CharacterMetrics, GlyphMetrics, MetricsDocument},
    tuplet_table::Tuplet,
    validate::Validate,
    Error,
};

/// Per-character records in canonical order; `None` for absent characters.
type DecodedGlyphs = Vec<Option<[f64; 5]>>;

/// Reconstructs [`MetricsDocument`]s from their compact form.
#[derive(Clone, Debug, Default)]
pub struct Expander {
    charset: CharacterSet,
}

impl Expander {
    pub fn new() -> Self {
        Self::with_character_set(CharacterSet::generate())
    }

    pub fn with_character_set(charset: CharacterSet) -> Self {
        Expander { charset }
    }

    /// Expand `compact` into the document it was minified from.
    pub fn expand(&self, compact: &CompactDocument) -> Result<MetricsDocument, Error> {
        let tier = Tier::detect(compact)?;
        log::debug!("expanding compact document with {tier:?} glyph encoding");
        compact.validate().map_err(Error::InvalidDocument)?;

        let glyphs = match tier {
            Tier::Legacy => decode_legacy(&compact.g),
            Tier::ValueIndexed => {
                decode_value_indexed(&compact.g, compact.v.as_deref().unwrap_or_default())?
            }
            Tier::TupletIndexed => decode_tuplet_indexed(
                &compact.g,
                compact.t.as_deref().unwrap_or_default(),
                compact.v.as_deref().unwrap_or_default(),
            )?,
        };

        Ok(MetricsDocument {
            kerning_table: kerning::decompress(&compact.k, &self.charset)?,
            character_metrics: attach_base_metrics(&self.charset, glyphs, compact.b),
            space_advancement_override_for_small_sizes_in_px: compact.s,
        })
    }
}

/// Expand `compact` using the canonical character set.
pub fn expand(compact: &CompactDocument) -> Result<MetricsDocument, Error> {
    Expander::new().expand(compact)
}

fn attach_base_metrics(
    charset: &CharacterSet,
    glyphs: DecodedGlyphs,
    base: BaseMetrics,
) -> std::collections::BTreeMap<char, CharacterMetrics> {
    charset
        .iter()
        .zip(glyphs)
        .filter_map(|(c, record)| {
            let glyph = GlyphMetrics::from_array(record?);
            Some((c, CharacterMetrics::from_parts(glyph, base)))
        })
        .collect()
}

/// Glyph entries are the metrics themselves.
pub(crate) fn decode_legacy(g: &[Option<GlyphEntry>]) -> DecodedGlyphs {
    g.iter()
        .map(|entry| match entry {
            Some(GlyphEntry::Explicit(record)) => Some(*record),
            _ => None,
        })
        .collect()
}

/// Glyph entries index records of five consecutive values in `v`.
pub(crate) fn decode_value_indexed(
    g: &[Option<GlyphEntry>],
    v: &[f64],
) -> Result<DecodedGlyphs, Error> {
    g.iter()
        .map(|entry| {
            let Some(GlyphEntry::Indexed(index)) = entry else {
                return Ok(None);
            };
            let start = *index as usize * 5;
            let record: [f64; 5] = v
                .get(start..start + 5)
                .and_then(|slice| slice.try_into().ok())
                .ok_or(Error::ValueIndexOutOfRange {
                    index: *index,
                    len: v.len() / 5,
                })?;
            Ok(Some(record))
        })
        .collect()
}

/// Glyph entries index tuplets in `t`, whose entries index values in `v`.
pub(crate) fn decode_tuplet_indexed(
    g: &[Option<GlyphEntry>],
    t: &[Tuplet],
    v: &[f64],
) -> Result<DecodedGlyphs, Error> {
    let lookup = |index: u32| {
        v.get(index as usize)
            .copied()
            .ok_or(Error::ValueIndexOutOfRange {
                index,
                len: v.len(),
            })
    };
    g.iter()
        .map(|entry| {
            let Some(GlyphEntry::Indexed(index)) = entry else {
                return Ok(None);
            };
            let tuplet = t.get(*index as usize).ok_or(Error::TupletIndexOutOfRange {
                index: *index,
                len: t.len(),
            })?;
            let mut record = [0.0; 5];
            for (slot, value_ix) in record.iter_mut().zip(tuplet) {
                *slot = lookup(*value_ix)?;
            }
            Ok(Some(record))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const A: [f64; 5] = [6.5, 0.25, 6.0, 7.0, 0.0];
    const B: [f64; 5] = [3.0, -0.5, 2.5, 7.0, 2.0];

    #[test]
    fn legacy_decoding() {
        let g = [Some(GlyphEntry::Explicit(A)), None, Some(GlyphEntry::Explicit(B))];
        assert_eq!(decode_legacy(&g), vec![Some(A), None, Some(B)]);
    }

    #[test]
    fn value_indexed_decoding() {
        let v: Vec<f64> = B.iter().chain(A.iter()).copied().collect();
        let g = [
            Some(GlyphEntry::Indexed(1)),
            Some(GlyphEntry::Indexed(0)),
            None,
            Some(GlyphEntry::Indexed(1)),
        ];
        let decoded = decode_value_indexed(&g, &v).unwrap();
        assert_eq!(decoded, vec![Some(A), Some(B), None, Some(A)]);

        let out_of_range = [Some(GlyphEntry::Indexed(2))];
        assert!(decode_value_indexed(&out_of_range, &v).is_err());
    }

    #[test]
    fn tuplet_indexed_decoding() {
        let v = vec![7.0, 0.0, 6.5, 0.25, 6.0, 3.0, -0.5, 2.5, 2.0];
        let t = vec![[2, 3, 4, 0, 1], [5, 6, 7, 0, 8]];
        let g = [Some(GlyphEntry::Indexed(1)), Some(GlyphEntry::Indexed(0))];
        let decoded = decode_tuplet_indexed(&g, &t, &v).unwrap();
        assert_eq!(decoded, vec![Some(B), Some(A)]);

        let bad_value = vec![[9, 0, 0, 0, 0]];
        assert!(decode_tuplet_indexed(&g[1..], &bad_value, &v).is_err());
        assert!(decode_tuplet_indexed(&g[..1], &t[..1], &v).is_err());
    }

    #[test]
    fn base_metrics_attach_to_every_character() {
        let charset = CharacterSet::generate();
        let base = BaseMetrics {
            font_bounding_box_ascent: 11.0,
            font_bounding_box_descent: 3.0,
            hanging_baseline: 9.0,
            alphabetic_baseline: 0.0,
            ideographic_baseline: -3.0,
        };
        let mut glyphs = vec![None; charset.len()];
        glyphs[1] = Some(A);
        glyphs[33] = Some(B);
        let metrics = attach_base_metrics(&charset, glyphs, base);
        assert_eq!(metrics.len(), 2);
        assert!(metrics.values().all(|m| m.base() == base));
        assert_eq!(metrics[&'A'].glyph().to_array(), B);
        assert_eq!(metrics[&'!'].glyph().to_array(), A);
    }

    #[test]
    fn rejects_malformed_documents() {
        let compact = CompactDocument {
            k: Default::default(),
            b: Default::default(),
            v: Some(vec![1.0]),
            g: vec![Some(GlyphEntry::Indexed(0))],
            t: Some(vec![[0; 5]]),
            s: None,
        };
        // the glyph array does not cover the character set
        assert!(matches!(expand(&compact), Err(Error::InvalidDocument(_))));
    }
}
