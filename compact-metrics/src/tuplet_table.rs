//! Building the table of distinct per-character metric tuples

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::{value_table::ValueTable, Error};

/// The five per-character scalars of one glyph, as [`ValueTable`] indices.
pub type Tuplet = [u32; 5];

/// One distinct tuplet and the number of characters that use it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TupletEntry {
    pub tuplet: Tuplet,
    pub count: usize,
}

/// Deduplicated, frequency-ranked glyph shapes.
///
/// Glyphs that share all five metrics (spaces, many punctuation marks)
/// collapse into one entry. The most shared shape gets index 0; ties are
/// ordered by the tuplet itself, ascending.
#[derive(Clone, Debug, Default)]
pub struct TupletTable {
    entries: Vec<TupletEntry>,
    lookup: HashMap<Tuplet, u32>,
}

impl TupletTable {
    /// Build the table from per-character records, in canonical order.
    ///
    /// Every value of every record must be present in `values`.
    pub fn build(
        records: impl IntoIterator<Item = [f64; 5]>,
        values: &ValueTable,
    ) -> Result<Self, Error> {
        let mut counts: IndexMap<Tuplet, usize> = IndexMap::new();
        for record in records {
            *counts.entry(values.tuplet_for(record)?).or_default() += 1;
        }
        Ok(Self::from_counts(counts))
    }

    fn from_counts(counts: IndexMap<Tuplet, usize>) -> Self {
        let mut entries = counts
            .into_iter()
            .map(|(tuplet, count)| TupletEntry { tuplet, count })
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tuplet.cmp(&b.tuplet)));
        let lookup = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.tuplet, i as u32))
            .collect();
        log::debug!("built tuplet table with {} distinct glyph shapes", entries.len());
        TupletTable { entries, lookup }
    }

    /// The index of `tuplet`, if it is in the table.
    pub fn index_of(&self, tuplet: &Tuplet) -> Option<u32> {
        self.lookup.get(tuplet).copied()
    }

    pub fn get(&self, index: u32) -> Option<&Tuplet> {
        self.entries.get(index as usize).map(|entry| &entry.tuplet)
    }

    pub fn entries(&self) -> &[TupletEntry] {
        &self.entries
    }

    /// The tuplets in index order, as stored in a compact document.
    pub fn tuplets(&self) -> Vec<Tuplet> {
        self.entries.iter().map(|entry| entry.tuplet).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
