//! Building compact documents from full metrics documents

use std::collections::BTreeMap;

use crate::{
    baseline::BaseMetrics,
    charset::CharacterSet,
    compact::{CompactDocument, GlyphEntry, Tier},
    expand::Expander,
    kerning,
    metrics::MetricsDocument,
    round::MetricRound,
    tuplet_table::TupletTable,
    value_table::ValueTable,
    Error,
};

/// Options controlling how documents are minified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MinifyOptions {
    /// The glyph encoding to emit.
    pub tier: Tier,
    /// Expand every result again and compare it against the input.
    pub verify: bool,
}

/// Builds [`CompactDocument`]s.
#[derive(Clone, Debug, Default)]
pub struct Minifier {
    charset: CharacterSet,
    options: MinifyOptions,
}

impl MinifyOptions {
    /// Builder style method to set the output tier.
    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    /// Builder style method to enable the round-trip check.
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}

impl Minifier {
    pub fn new(options: MinifyOptions) -> Self {
        Minifier {
            charset: CharacterSet::generate(),
            options,
        }
    }

    pub fn options(&self) -> MinifyOptions {
        self.options
    }

    /// Convert `document` into its compact form.
    ///
    /// Fails if the document is empty, contains characters outside the
    /// character set or non-finite values, or if its characters disagree on
    /// the baseline metrics. With verification enabled, also fails with
    /// [`Error::BuildIntegrity`] if the result does not expand back to
    /// `document` (ignoring zero kerning adjustments).
    pub fn minify(&self, document: &MetricsDocument) -> Result<CompactDocument, Error> {
        let base = BaseMetrics::extract(document, &self.charset)?;
        if let Some(space) = document
            .space_advancement_override_for_small_sizes_in_px
            .filter(|px| !px.is_finite())
        {
            return Err(Error::NonFiniteValue(space));
        }

        let records: Vec<Option<[f64; 5]>> = self
            .charset
            .iter()
            .map(|c| document.metrics_for(c).map(|m| m.glyph().to_array()))
            .collect();
        let values = ValueTable::build(records.iter().flatten().flatten().copied())?;
        let tuplets = TupletTable::build(records.iter().flatten().copied(), &values)?;

        let glyph_index = |record: &[f64; 5]| -> Result<u32, Error> {
            let tuplet = values.tuplet_for(*record)?;
            tuplets.index_of(&tuplet).ok_or_else(|| {
                Error::BuildIntegrity(format!("no tuplet was assigned to {record:?}"))
            })
        };

        let (v, g, t) = match self.options.tier {
            Tier::Legacy => {
                let g = records
                    .iter()
                    .map(|record| record.map(|r| GlyphEntry::Explicit(r.metric_round())))
                    .collect();
                (None, g, None)
            }
            Tier::ValueIndexed => {
                let mut flattened = Vec::with_capacity(tuplets.len() * 5);
                for tuplet in tuplets.tuplets() {
                    flattened.extend(values.resolve(&tuplet)?);
                }
                (Some(flattened), glyph_entries(&records, glyph_index)?, None)
            }
            Tier::TupletIndexed => (
                Some(values.values()),
                glyph_entries(&records, glyph_index)?,
                Some(tuplets.tuplets()),
            ),
        };

        let compact = CompactDocument {
            k: kerning::compress(&document.kerning_table, &self.charset)?,
            b: base,
            v,
            g,
            t,
            s: document.space_advancement_override_for_small_sizes_in_px,
        };
        log::debug!(
            "minified {} characters into {} values and {} tuplets ({:?})",
            document.character_metrics.len(),
            values.len(),
            tuplets.len(),
            self.options.tier
        );

        if self.options.verify {
            self.verify(document, &compact)?;
        }
        Ok(compact)
    }

    fn verify(&self, document: &MetricsDocument, compact: &CompactDocument) -> Result<(), Error> {
        let expanded = Expander::with_character_set(self.charset.clone())
            .expand(compact)
            .map_err(|e| Error::BuildIntegrity(format!("compact document does not expand: {e}")))?;
        let expected = document.without_default_kerning();
        match describe_mismatch(&self.charset, &expected, &expanded) {
            None => Ok(()),
            Some(detail) => {
                log::error!("round trip mismatch: {detail}");
                Err(Error::BuildIntegrity(detail))
            }
        }
    }
}

fn glyph_entries(
    records: &[Option<[f64; 5]>],
    glyph_index: impl Fn(&[f64; 5]) -> Result<u32, Error>,
) -> Result<Vec<Option<GlyphEntry>>, Error> {
    records
        .iter()
        .map(|record| {
            record
                .as_ref()
                .map(|r| glyph_index(r).map(GlyphEntry::Indexed))
                .transpose()
        })
        .collect()
}

/// Describe the first difference between two documents, if any.
fn describe_mismatch(
    charset: &CharacterSet,
    expected: &MetricsDocument,
    actual: &MetricsDocument,
) -> Option<String> {
    if expected == actual {
        return None;
    }
    for c in charset.iter() {
        let (want, got) = (expected.metrics_for(c), actual.metrics_for(c));
        if want != got {
            return Some(format!(
                "metrics of {c:?} differ: expected {want:?}, found {got:?}"
            ));
        }
    }
    if let Some(c) = expected
        .character_metrics
        .keys()
        .chain(actual.character_metrics.keys())
        .find(|c| expected.metrics_for(**c) != actual.metrics_for(**c))
    {
        return Some(format!("metrics of {c:?} differ"));
    }
    for (left, row) in expected.kerning_table.rows() {
        for (right, adjustment) in row {
            let found = actual.kerning_table.get(left, right);
            if found != *adjustment {
                return Some(format!(
                    "kerning of ({left:?}, {right:?}) differs: expected {adjustment}, found {found}"
                ));
            }
        }
    }
    if expected.kerning_table != actual.kerning_table {
        return Some(format!(
            "expanded kerning table has {} pairs, expected {}",
            actual.kerning_table.pair_count(),
            expected.kerning_table.pair_count()
        ));
    }
    Some(format!(
        "space advance override differs: expected {:?}, found {:?}",
        expected.space_advancement_override_for_small_sizes_in_px,
        actual.space_advancement_override_for_small_sizes_in_px
    ))
}

/// Minify `document` with the default options.
pub fn minify(document: &MetricsDocument) -> Result<CompactDocument, Error> {
    Minifier::new(MinifyOptions::default()).minify(document)
}

/// Minify `document`, failing instead of emitting a document that does not
/// expand back to the input.
pub fn minify_with_verification(document: &MetricsDocument) -> Result<CompactDocument, Error> {
    Minifier::new(MinifyOptions::default().with_verification(true)).minify(document)
}

/// Minify many font configurations, keyed by font identity.
///
/// Fonts are independent of each other; with the `rayon` feature enabled
/// they are processed in parallel. The first failure is returned, tagged
/// with the key of the font that caused it.
pub fn minify_all(
    documents: &BTreeMap<String, MetricsDocument>,
    options: MinifyOptions,
) -> Result<BTreeMap<String, CompactDocument>, Error> {
    let minifier = Minifier::new(options);
    let minify_one = |(font, document): (&String, &MetricsDocument)| {
        minifier
            .minify(document)
            .map(|compact| (font.clone(), compact))
            .map_err(|source| Error::Font {
                font: font.clone(),
                source: Box::new(source),
            })
    };

    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        documents.par_iter().map(minify_one).collect()
    }

    #[cfg(not(feature = "rayon"))]
    {
        documents.iter().map(minify_one).collect()
    }
}
