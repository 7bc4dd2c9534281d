//! Building the table of distinct metric values

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::{round::MetricRound, tuplet_table::Tuplet, Error};

/// One distinct value and the number of times it occurs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueEntry {
    pub value: f64,
    pub count: usize,
}

/// Deduplicated, frequency-ranked scalar values.
///
/// The most common value gets index 0. Values with equal counts are ordered
/// by ascending value, so building twice from the same input yields
/// identical tables.
#[derive(Clone, Debug, Default)]
pub struct ValueTable {
    entries: Vec<ValueEntry>,
    // rounded value bits -> index
    lookup: HashMap<u64, u32>,
}

impl ValueTable {
    /// Build a table from every occurrence of every value.
    ///
    /// Values are rounded with [`MetricRound`] before they are counted.
    pub fn build(values: impl IntoIterator<Item = f64>) -> Result<Self, Error> {
        let mut counts: IndexMap<u64, usize> = IndexMap::new();
        for value in values {
            if !value.is_finite() {
                return Err(Error::NonFiniteValue(value));
            }
            *counts.entry(value.metric_round().to_bits()).or_default() += 1;
        }

        let mut entries = counts
            .into_iter()
            .map(|(bits, count)| ValueEntry {
                value: f64::from_bits(bits),
                count,
            })
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.value.total_cmp(&b.value))
        });

        let lookup = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.value.to_bits(), i as u32))
            .collect();
        log::debug!("built value table with {} distinct values", entries.len());
        Ok(ValueTable { entries, lookup })
    }

    /// The index of `value`, after rounding.
    pub fn index(&self, value: f64) -> Result<u32, Error> {
        self.lookup
            .get(&value.metric_round().to_bits())
            .copied()
            .ok_or(Error::UnknownValue(value))
    }

    /// The value stored at `index`.
    pub fn value(&self, index: u32) -> Result<f64, Error> {
        self.entries
            .get(index as usize)
            .map(|entry| entry.value)
            .ok_or(Error::ValueIndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    /// Map a record of five values to their indices.
    pub fn tuplet_for(&self, record: [f64; 5]) -> Result<Tuplet, Error> {
        let mut tuplet = [0; 5];
        for (slot, value) in tuplet.iter_mut().zip(record) {
            *slot = self.index(value)?;
        }
        Ok(tuplet)
    }

    /// Resolve a tuplet back to its five values.
    pub fn resolve(&self, tuplet: &Tuplet) -> Result<[f64; 5], Error> {
        let mut record = [0.0; 5];
        for (slot, index) in record.iter_mut().zip(tuplet) {
            *slot = self.value(*index)?;
        }
        Ok(record)
    }

    pub fn entries(&self) -> &[ValueEntry] {
        &self.entries
    }

    /// The values in index order, as stored in a compact document.
    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|entry| entry.value).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranked_by_frequency() {
        let table = ValueTable::build([3.0, 1.0, 3.0, 2.0, 3.0, 1.0]).unwrap();
        assert_eq!(table.values(), vec![3.0, 1.0, 2.0]);
        assert_eq!(table.entries()[0].count, 3);
        assert_eq!(table.index(3.0).unwrap(), 0);
        assert_eq!(table.index(2.0).unwrap(), 2);
    }

    #[test]
    fn ties_break_by_ascending_value() {
        let table = ValueTable::build([5.5, -1.0, 2.0, 5.5, -1.0, 2.0]).unwrap();
        assert_eq!(table.values(), vec![-1.0, 2.0, 5.5]);
    }

    #[test]
    fn deterministic() {
        let input = [0.25, 7.0, 0.25, 7.0, 1.5, 9.75, 1.5, 0.0];
        let one = ValueTable::build(input).unwrap();
        let two = ValueTable::build(input.iter().rev().copied()).unwrap();
        assert_eq!(one.entries(), two.entries());
    }

    #[test]
    fn values_are_rounded_before_counting() {
        let table = ValueTable::build([1.00001, 1.0, 0.99999]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].count, 3);
        assert_eq!(table.index(1.00002).unwrap(), 0);
    }

    #[test]
    fn unknown_lookups_fail() {
        let table = ValueTable::build([1.0, 2.0]).unwrap();
        assert!(matches!(table.index(3.0), Err(Error::UnknownValue(_))));
        assert!(matches!(
            table.value(2),
            Err(Error::ValueIndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn tuplets_resolve() {
        let table = ValueTable::build([4.0, 4.0, 0.0, 1.0, 2.0]).unwrap();
        let tuplet = table.tuplet_for([4.0, 0.0, 1.0, 2.0, 4.0]).unwrap();
        assert_eq!(tuplet, [0, 1, 2, 3, 0]);
        assert_eq!(table.resolve(&tuplet).unwrap(), [4.0, 0.0, 1.0, 2.0, 4.0]);
    }

    #[test]
    fn rejects_non_finite() {
        assert!(ValueTable::build([1.0, f64::NAN]).is_err());
        assert!(ValueTable::build([f64::INFINITY]).is_err());
    }
}
