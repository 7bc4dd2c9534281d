//! Compact encoding of per-character font metrics.
//!
//! Text measurement without a rendering engine needs, for every supported
//! font configuration, the canvas metrics of a fixed set of characters along
//! with their kerning. This crate converts such a [`MetricsDocument`] into a
//! much smaller [`CompactDocument`] suitable for embedding in distributed
//! assets, and expands compact documents back without loss.
//!
//! Documents are keyed by the canonical [`CharacterSet`]. Shared baseline
//! metrics are stored once, repeated scalars are deduplicated through a
//! [`ValueTable`] and a [`TupletTable`], and kerning rows and columns that
//! hold identical adjustments for consecutive characters are collapsed into
//! range keys such as `"A-Z"`.
//!
//! ```
//! # fn main() -> Result<(), compact_metrics::Error> {
//! use compact_metrics::{expand, minify_with_verification, MetricsDocument};
//!
//! let json = r#"{
//!     "kerningTable": { "A": { "V": -1.5 } },
//!     "characterMetrics": {
//!         "A": {
//!             "width": 9.5,
//!             "actualBoundingBoxLeft": 0.25,
//!             "actualBoundingBoxRight": 9.25,
//!             "actualBoundingBoxAscent": 10,
//!             "actualBoundingBoxDescent": 0,
//!             "fontBoundingBoxAscent": 14,
//!             "fontBoundingBoxDescent": 4,
//!             "hangingBaseline": 11.2,
//!             "alphabeticBaseline": 0,
//!             "ideographicBaseline": -4
//!         }
//!     }
//! }"#;
//! let document = MetricsDocument::from_json(json)?;
//! let compact = minify_with_verification(&document)?;
//! assert_eq!(expand(&compact)?, document);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod baseline;
mod charset;
mod compact;
mod error;
mod expand;
pub mod kerning;
mod metrics;
mod minify;
mod round;
mod tuplet_table;
pub mod validate;
mod value_table;

pub use baseline::BaseMetrics;
pub use charset::{CharacterSet, CHARACTER_COUNT, FULL_BLOCK};
pub use compact::{CompactDocument, GlyphEntry, Tier};
pub use error::Error;
pub use expand::{expand, Expander};
pub use kerning::{CompressedKerning, KerningKey};
pub use metrics::{CharacterMetrics, GlyphMetrics, KerningTable, MetricsDocument};
pub use minify::{minify, minify_all, minify_with_verification, Minifier, MinifyOptions};
pub use round::{MetricRound, METRIC_DECIMALS};
pub use tuplet_table::{Tuplet, TupletEntry, TupletTable};
pub use value_table::{ValueEntry, ValueTable};
