//! Range compression of kerning tables
//!
//! Kerning tables are sparse, but where they are populated they tend to be
//! regular: accented variants of a letter kern identically, and a row often
//! assigns one adjustment to a whole run of characters. Both axes are
//! compressed by replacing runs of characters that are consecutive in
//! [`CharacterSet`] order with a single range key of the form `"a-z"`.
//!
//! Because the hyphen is itself part of the character set, a key is only read
//! as a range when it is exactly three characters long, the middle one is the
//! only hyphen, and both ends are members of the character set. Every other
//! key is a literal. See [`KerningKey::parse`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{charset::CharacterSet, metrics::KerningTable, Error};

/// The character separating the two ends of a range key.
pub const RANGE_SEPARATOR: char = '-';

/// A kerning table whose keys may be range keys.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompressedKerning(BTreeMap<String, BTreeMap<String, f64>>);

/// The interpretation of one key of a [`CompressedKerning`] table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KerningKey<'a> {
    /// Every character from `start` to `end`, inclusive, in canonical order.
    Range { start: char, end: char },
    /// A key that stands for itself.
    Literal(&'a str),
}

impl<'a> KerningKey<'a> {
    /// Decide whether `key` is a range key or a literal.
    ///
    /// A key is a range only if it contains exactly one separator, both sides
    /// of it are exactly one character, and both sides are in `charset`.
    pub fn parse(key: &'a str, charset: &CharacterSet) -> Self {
        if key.matches(RANGE_SEPARATOR).count() != 1 {
            return KerningKey::Literal(key);
        }
        let Some((start, end)) = key.split_once(RANGE_SEPARATOR) else {
            return KerningKey::Literal(key);
        };
        match (single_char(start), single_char(end)) {
            (Some(start), Some(end)) if charset.contains(start) && charset.contains(end) => {
                KerningKey::Range { start, end }
            }
            _ => KerningKey::Literal(key),
        }
    }

    /// The keys of the uncompressed table this key stands for.
    fn expand(self, charset: &CharacterSet) -> Result<Vec<String>, Error> {
        match self {
            KerningKey::Literal(key) => Ok(vec![key.to_owned()]),
            KerningKey::Range { start, end } => {
                let invalid = || Error::InvalidRangeKey(format!("{start}{RANGE_SEPARATOR}{end}"));
                let first = charset.index_of(start).ok_or_else(invalid)?;
                let last = charset.index_of(end).ok_or_else(invalid)?;
                if first > last {
                    return Err(invalid());
                }
                Ok(charset.as_slice()[first..=last]
                    .iter()
                    .map(char::to_string)
                    .collect())
            }
        }
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

impl CompressedKerning {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of (possibly range-keyed) rows.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn row(&self, key: &str) -> Option<&BTreeMap<String, f64>> {
        self.0.get(key)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, f64>)> + '_ {
        self.0.iter().map(|(key, row)| (key.as_str(), row))
    }

    /// Insert a row directly, without any interpretation of the keys.
    pub fn insert_row(&mut self, key: impl Into<String>, row: BTreeMap<String, f64>) {
        self.0.insert(key.into(), row);
    }
}

/// Compress `table` by collapsing runs on both axes.
///
/// Zero adjustments are dropped, and rows left empty are omitted. Keys that
/// are not single characters of `charset` are carried through as literals;
/// a literal that would later be read back as a range is an error.
pub fn compress(table: &KerningTable, charset: &CharacterSet) -> Result<CompressedKerning, Error> {
    let mut positional = Vec::new();
    let mut result = CompressedKerning::new();

    for (left, row) in table.rows() {
        let row = compress_row(row, charset)?;
        if row.is_empty() {
            continue;
        }
        match charset.index_of_key(left) {
            Some(position) => positional.push((position, row)),
            None => {
                check_literal(left, charset)?;
                result.insert_row(left, row);
            }
        }
    }
    positional.sort_by_key(|(position, _)| *position);

    for (start, end, row) in iter_runs(&positional) {
        if start != end {
            log::trace!(
                "collapsing {} identical kerning rows starting at {:?}",
                end - start + 1,
                charset.at(start)
            );
        }
        for key in run_keys(start, end, charset) {
            result.insert_row(key, row.clone());
        }
    }
    log::debug!(
        "compressed {} kerning rows into {}",
        table.rows().count(),
        result.len()
    );
    Ok(result)
}

/// Expand range keys on both axes, restoring the uncompressed table.
pub fn decompress(
    compressed: &CompressedKerning,
    charset: &CharacterSet,
) -> Result<KerningTable, Error> {
    let mut table = KerningTable::new();
    for (left_key, row) in compressed.rows() {
        let lefts = KerningKey::parse(left_key, charset).expand(charset)?;
        for (right_key, adjustment) in row {
            let rights = KerningKey::parse(right_key, charset).expand(charset)?;
            for left in &lefts {
                for right in &rights {
                    table.insert(left.as_str(), right.as_str(), *adjustment);
                }
            }
        }
    }
    Ok(table)
}

/// Compress the right axis of one row.
fn compress_row(
    row: &BTreeMap<String, f64>,
    charset: &CharacterSet,
) -> Result<BTreeMap<String, f64>, Error> {
    let mut positional = Vec::new();
    let mut result = BTreeMap::new();
    for (right, adjustment) in row.iter().filter(|(_, adj)| **adj != 0.0) {
        if !adjustment.is_finite() {
            return Err(Error::NonFiniteValue(*adjustment));
        }
        match charset.index_of_key(right) {
            Some(position) => positional.push((position, *adjustment)),
            None => {
                check_literal(right, charset)?;
                result.insert(right.clone(), *adjustment);
            }
        }
    }
    positional.sort_by_key(|(position, _)| *position);

    for (start, end, adjustment) in iter_runs(&positional) {
        for key in run_keys(start, end, charset) {
            result.insert(key, adjustment);
        }
    }
    Ok(result)
}

fn check_literal(key: &str, charset: &CharacterSet) -> Result<(), Error> {
    match KerningKey::parse(key, charset) {
        KerningKey::Literal(_) => Ok(()),
        KerningKey::Range { .. } => Err(Error::AmbiguousKerningKey(key.to_owned())),
    }
}

/// Group `(position, value)` items, sorted by position, into maximal runs
/// of consecutive positions that share a value.
///
/// Yields `(first_position, last_position, value)`.
fn iter_runs<T: PartialEq + Clone>(
    items: &[(usize, T)],
) -> impl Iterator<Item = (usize, usize, T)> + '_ {
    let mut iter = items.iter();
    let mut prev: Option<(usize, usize, &T)> = None;

    std::iter::from_fn(move || {
        for (position, value) in iter.by_ref() {
            match prev.take() {
                None => prev = Some((*position, *position, value)),
                Some((start, end, prev_value)) if end + 1 == *position && prev_value == value => {
                    prev = Some((start, *position, prev_value))
                }
                Some((start, end, prev_value)) => {
                    prev = Some((*position, *position, value));
                    return Some((start, end, prev_value.clone()));
                }
            }
        }
        prev.take()
            .map(|(start, end, value)| (start, end, value.clone()))
    })
}

/// The keys that spell out the run `start..=end`.
///
/// A run that begins or ends with the separator itself cannot be written as
/// a range, so the hyphen is split off into its own key.
fn run_keys(start: usize, end: usize, charset: &CharacterSet) -> Vec<String> {
    let chars = &charset.as_slice()[start..=end];
    let mut keys = Vec::with_capacity(3);
    let (mut lo, mut hi) = (0, chars.len() - 1);
    if lo < hi && chars[lo] == RANGE_SEPARATOR {
        keys.push(RANGE_SEPARATOR.to_string());
        lo += 1;
    }
    let mut trailing_separator = false;
    if lo < hi && chars[hi] == RANGE_SEPARATOR {
        trailing_separator = true;
        hi -= 1;
    }
    if lo == hi {
        keys.push(chars[lo].to_string());
    } else {
        keys.push(format!("{}{RANGE_SEPARATOR}{}", chars[lo], chars[hi]));
    }
    if trailing_separator {
        keys.push(RANGE_SEPARATOR.to_string());
    }
    keys
}

impl From<BTreeMap<String, BTreeMap<String, f64>>> for CompressedKerning {
    fn from(rows: BTreeMap<String, BTreeMap<String, f64>>) -> Self {
        CompressedKerning(rows)
    }
}
