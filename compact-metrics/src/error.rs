//! Errors produced while minifying or expanding metrics documents

use thiserror::Error;

use crate::validate::ValidationReport;

/// An error that occurred while building or loading a compact document.
///
/// Build-time errors (`EmptyDocument` through `BuildIntegrity`) abort the
/// font being processed. Load-time errors are returned to the caller, which
/// may decide to fall back to a degraded rendering mode.
#[derive(Debug, Error)]
pub enum Error {
    #[error("metrics document contains no characters")]
    EmptyDocument,

    #[error("character {0:?} is not part of the character set")]
    UnknownCharacter(char),

    #[error("metric values must be finite, found {0}")]
    NonFiniteValue(f64),

    #[error("character {character:?} disagrees with the shared {field} of the font")]
    InconsistentBaseMetrics {
        character: char,
        field: &'static str,
    },

    #[error("value {0} is not present in the value lookup table")]
    UnknownValue(f64),

    #[error("index {index} is out of range for a value lookup table of length {len}")]
    ValueIndexOutOfRange { index: u32, len: usize },

    #[error("index {index} is out of range for a tuplet lookup table of length {len}")]
    TupletIndexOutOfRange { index: u32, len: usize },

    #[error("literal kerning key {0:?} would be read back as a character range")]
    AmbiguousKerningKey(String),

    #[error("build integrity check failed, refusing to emit a corrupt document: {0}")]
    BuildIntegrity(String),

    #[error("glyph indices require a value lookup table, but 'v' is missing")]
    MissingValueTable,

    #[error(
        "glyph indices require a tuplet lookup table ('t') or a value lookup table ('v'), \
         but neither is present"
    )]
    MissingTupletTable,

    #[error("range key {0:?} runs backwards through the character set")]
    InvalidRangeKey(String),

    #[error("glyph entries mix explicit metrics with table indices")]
    MixedGlyphEncodings,

    #[error("malformed compact document: {0}")]
    InvalidDocument(ValidationReport),

    #[error("font '{font}': {source}")]
    Font {
        font: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Error reading JSON: {0}")]
    Json(#[from] serde_json::Error),
}
