//! The canonical character set.
//!
//! Every array-shaped field of a compact document is positionally aligned
//! with this sequence, and every range key in a compressed kerning table is
//! interpreted against its order.

use std::collections::HashMap;

/// The number of characters in the canonical set.
pub const CHARACTER_COUNT: usize = 204;

/// The zero-width soft hyphen, the only Latin-1 character left out.
const SOFT_HYPHEN: char = '\u{00AD}';

/// Marker glyph drawn in place of characters the font cannot render.
pub const FULL_BLOCK: char = '\u{2588}';

/// Windows-1252 punctuation and symbols, in their Unicode form.
const WINDOWS_1252_SELECTION: [char; 13] = [
    '\u{2013}', // en dash
    '\u{2014}', // em dash
    '\u{2018}', // left single quotation mark
    '\u{2019}', // right single quotation mark
    '\u{201C}', // left double quotation mark
    '\u{201D}', // right double quotation mark
    '\u{2022}', // bullet
    '\u{2026}', // horizontal ellipsis
    '\u{2030}', // per mille sign
    '\u{2039}', // single left-pointing angle quotation mark
    '\u{203A}', // single right-pointing angle quotation mark
    '\u{20AC}', // euro sign
    '\u{2122}', // trade mark sign
];

/// The fixed, ordered alphabet that compact documents are indexed against.
///
/// The sequence is sorted by code point, so it is independent of locale and
/// platform. Lookups in both directions are constant time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterSet {
    chars: Vec<char>,
    positions: HashMap<char, usize>,
}

impl CharacterSet {
    /// Generate the canonical character set.
    pub fn generate() -> Self {
        let printable_ascii = ' '..='~';
        let latin1 = ('\u{00A0}'..='\u{00FF}').filter(|c| *c != SOFT_HYPHEN);
        let mut chars: Vec<char> = printable_ascii
            .chain(latin1)
            .chain(WINDOWS_1252_SELECTION)
            .chain(std::iter::once(FULL_BLOCK))
            .collect();
        chars.sort_unstable();
        chars.dedup();
        debug_assert_eq!(chars.len(), CHARACTER_COUNT);

        let positions = chars.iter().enumerate().map(|(i, c)| (*c, i)).collect();
        CharacterSet { chars, positions }
    }

    /// The position of `c` in canonical order, if it is part of the set.
    pub fn index_of(&self, c: char) -> Option<usize> {
        self.positions.get(&c).copied()
    }

    /// The character at position `index`.
    pub fn at(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }

    pub fn contains(&self, c: char) -> bool {
        self.positions.contains_key(&c)
    }

    /// If `key` is exactly one character of this set, return its position.
    pub fn index_of_key(&self, key: &str) -> Option<usize> {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.index_of(c),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    pub fn as_slice(&self) -> &[char] {
        &self.chars
    }
}

impl Default for CharacterSet {
    fn default() -> Self {
        Self::generate()
    }
}
