//! Font-wide baseline metrics shared by every character.

use serde::{Deserialize, Serialize};

use crate::{charset::CharacterSet, metrics::MetricsDocument, Error};

/// The five scalars that every character of a font reports identically.
///
/// They are stored once, in the `b` field of a compact document, and
/// attached to every character again on expansion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseMetrics {
    #[serde(rename = "fba")]
    pub font_bounding_box_ascent: f64,
    #[serde(rename = "fbd")]
    pub font_bounding_box_descent: f64,
    #[serde(rename = "hb")]
    pub hanging_baseline: f64,
    #[serde(rename = "ab")]
    pub alphabetic_baseline: f64,
    #[serde(rename = "ib")]
    pub ideographic_baseline: f64,
}

impl BaseMetrics {
    /// Field names in the order used by [`to_array`][Self::to_array].
    pub const FIELD_NAMES: [&'static str; 5] = [
        "fontBoundingBoxAscent",
        "fontBoundingBoxDescent",
        "hangingBaseline",
        "alphabeticBaseline",
        "ideographicBaseline",
    ];

    pub fn to_array(self) -> [f64; 5] {
        [
            self.font_bounding_box_ascent,
            self.font_bounding_box_descent,
            self.hanging_baseline,
            self.alphabetic_baseline,
            self.ideographic_baseline,
        ]
    }

    /// Factor the shared baseline metrics out of a document.
    ///
    /// Characters are visited in canonical order and compared bit for bit
    /// against the first one. Fails if the document is empty, names a
    /// character outside `charset`, or if any character disagrees.
    pub fn extract(document: &MetricsDocument, charset: &CharacterSet) -> Result<Self, Error> {
        if let Some(unknown) = document
            .character_metrics
            .keys()
            .find(|c| !charset.contains(**c))
        {
            return Err(Error::UnknownCharacter(*unknown));
        }

        let mut characters = charset
            .iter()
            .filter_map(|c| document.character_metrics.get(&c).map(|m| (c, m.base())));
        let (_, base) = characters.next().ok_or(Error::EmptyDocument)?;
        if let Some(value) = base.to_array().into_iter().find(|v| !v.is_finite()) {
            return Err(Error::NonFiniteValue(value));
        }

        let expected = base.to_array().map(f64::to_bits);
        for (character, other) in characters {
            let found = other.to_array().map(f64::to_bits);
            if let Some(i) = (0..5).find(|i| expected[*i] != found[*i]) {
                return Err(Error::InconsistentBaseMetrics {
                    character,
                    field: Self::FIELD_NAMES[i],
                });
            }
        }
        Ok(base)
    }
}

#[cfg(test)]
mod tests {
    use crate::metrics::{CharacterMetrics, GlyphMetrics};

    use super::*;

    fn base() -> BaseMetrics {
        BaseMetrics {
            font_bounding_box_ascent: 15.0,
            font_bounding_box_descent: 4.0,
            hanging_baseline: 12.5,
            alphabetic_baseline: 0.0,
            ideographic_baseline: -4.0,
        }
    }

    fn document(chars: &str, base: BaseMetrics) -> MetricsDocument {
        MetricsDocument {
            character_metrics: chars
                .chars()
                .map(|c| {
                    let glyph = GlyphMetrics::from_array([c as u32 as f64, 0.0, 1.0, 2.0, 3.0]);
                    (c, CharacterMetrics::from_parts(glyph, base))
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn extracts_shared_metrics() {
        let doc = document("abc", base());
        let extracted = BaseMetrics::extract(&doc, &CharacterSet::generate()).unwrap();
        assert_eq!(extracted, base());
    }

    #[test]
    fn rejects_divergent_character() {
        let mut doc = document("abc", base());
        doc.character_metrics
            .get_mut(&'b')
            .unwrap()
            .hanging_baseline = 12.25;
        let err = BaseMetrics::extract(&doc, &CharacterSet::generate()).unwrap_err();
        assert!(matches!(
            err,
            Error::InconsistentBaseMetrics {
                character: 'b',
                field: "hangingBaseline"
            }
        ));
    }

    #[test]
    fn negative_zero_is_a_divergence() {
        let mut doc = document("xy", base());
        doc.character_metrics
            .get_mut(&'y')
            .unwrap()
            .alphabetic_baseline = -0.0;
        assert!(BaseMetrics::extract(&doc, &CharacterSet::generate()).is_err());
    }

    #[test]
    fn rejects_empty_and_unknown() {
        let charset = CharacterSet::generate();
        let empty = MetricsDocument::default();
        assert!(matches!(
            BaseMetrics::extract(&empty, &charset),
            Err(Error::EmptyDocument)
        ));
        let unknown = document("a\u{0100}", base());
        assert!(matches!(
            BaseMetrics::extract(&unknown, &charset),
            Err(Error::UnknownCharacter('\u{0100}'))
        ));
    }

    #[test]
    fn compact_field_names() {
        let json = serde_json::to_value(base()).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 5);
        for key in ["fba", "fbd", "hb", "ab", "ib"] {
            assert!(keys.iter().any(|k| k == key), "missing {key}");
        }
    }
}
