//! Structural validation of compact documents before decoding

use std::fmt::{Debug, Display};

use crate::{
    charset::CHARACTER_COUNT,
    compact::{CompactDocument, GlyphEntry, Tier},
};

/// Checks that a value is well formed, reporting every problem found.
///
/// Compact documents come from asset files, so they are checked for the
/// invariants the decoder relies on (array lengths, index bounds) before any
/// lookup happens.
pub trait Validate {
    /// Ensure that this value is well formed, reporting any errors.
    ///
    /// This calls [validate_impl][Self::validate_impl] and collects errors.
    fn validate(&self) -> Result<(), ValidationReport> {
        let mut ctx = ValidationCtx::default();
        self.validate_impl(&mut ctx);
        if ctx.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationReport { errors: ctx.errors })
        }
    }

    fn validate_impl(&self, ctx: &mut ValidationCtx);
}

/// A context for collecting validation errors.
///
/// Tracks the path (`CompactDocument.t[3]`) at which each error is reported.
#[derive(Clone, Debug, Default)]
pub struct ValidationCtx {
    cur_location: Vec<LocationElem>,
    errors: Vec<ValidationError>,
}

#[derive(Debug, Clone)]
struct ValidationError {
    error: String,
    location: Vec<LocationElem>,
}

/// One or more validation errors.
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

#[derive(Debug, Clone)]
enum LocationElem {
    Table(&'static str),
    Field(&'static str),
    Index(usize),
}

impl ValidationCtx {
    /// Run the provided closure in the context of a new table.
    pub fn in_table(&mut self, name: &'static str, f: impl FnOnce(&mut ValidationCtx)) {
        self.with_elem(LocationElem::Table(name), f);
    }

    /// Run the provided closure in the context of a new field.
    pub fn in_field(&mut self, name: &'static str, f: impl FnOnce(&mut ValidationCtx)) {
        self.with_elem(LocationElem::Field(name), f);
    }

    /// Run the provided closure for every item of `items`, tracking the index.
    pub fn in_array<T>(&mut self, items: &[T], mut f: impl FnMut(&mut ValidationCtx, &T)) {
        for (i, item) in items.iter().enumerate() {
            self.with_elem(LocationElem::Index(i), |ctx| f(ctx, item));
        }
    }

    /// Report a new error, associating it with the current path.
    pub fn report(&mut self, msg: impl Display) {
        self.errors.push(ValidationError {
            location: self.cur_location.clone(),
            error: msg.to_string(),
        });
    }

    fn with_elem(&mut self, elem: LocationElem, f: impl FnOnce(&mut ValidationCtx)) {
        self.cur_location.push(elem);
        f(self);
        self.cur_location.pop();
    }
}

impl ValidationReport {
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let [error] = self.errors.as_slice() {
            return write!(f, "{error}");
        }
        write!(f, "{} validation errors:", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}

impl Debug for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, elem) in self.location.iter().enumerate() {
            match elem {
                LocationElem::Table(name) if i == 0 => write!(f, "{name}"),
                LocationElem::Table(name) | LocationElem::Field(name) => write!(f, ".{name}"),
                LocationElem::Index(idx) => write!(f, "[{idx}]"),
            }?;
        }
        if !self.location.is_empty() {
            f.write_str(": ")?;
        }
        f.write_str(&self.error)
    }
}

impl Validate for CompactDocument {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        // tier errors are reported by `Tier::detect` before validation runs
        let tier = self.tier().unwrap_or_default();
        let values = self.v.as_deref().unwrap_or_default();
        let tuplets = self.t.as_deref().unwrap_or_default();

        // the number of distinct targets a glyph index may refer to
        let index_bound = match tier {
            Tier::Legacy => 0,
            Tier::ValueIndexed => values.len() / 5,
            Tier::TupletIndexed => tuplets.len(),
        };

        ctx.in_table("CompactDocument", |ctx| {
            ctx.in_field("b", |ctx| {
                if self.b.to_array().iter().any(|v| !v.is_finite()) {
                    ctx.report("baseline metrics must be finite");
                }
            });
            ctx.in_field("g", |ctx| {
                if self.g.len() != CHARACTER_COUNT {
                    ctx.report(format_args!(
                        "expected {CHARACTER_COUNT} glyph entries, found {}",
                        self.g.len()
                    ));
                }
                ctx.in_array(&self.g, |ctx, entry| match entry {
                    Some(GlyphEntry::Explicit(record)) if record.iter().any(|v| !v.is_finite()) => {
                        ctx.report("metrics must be finite")
                    }
                    Some(GlyphEntry::Indexed(index)) if *index as usize >= index_bound => ctx
                        .report(format_args!(
                            "index {index} out of bounds for {index_bound} entries"
                        )),
                    _ => (),
                });
            });
            ctx.in_field("v", |ctx| {
                if tier == Tier::ValueIndexed && values.len() % 5 != 0 {
                    ctx.report(format_args!(
                        "flattened value table length {} is not a multiple of 5",
                        values.len()
                    ));
                }
                ctx.in_array(values, |ctx, value| {
                    if !value.is_finite() {
                        ctx.report("values must be finite");
                    }
                });
            });
            if tier == Tier::TupletIndexed {
                ctx.in_field("t", |ctx| {
                    ctx.in_array(tuplets, |ctx, tuplet| {
                        if let Some(index) = tuplet.iter().find(|ix| **ix as usize >= values.len())
                        {
                            ctx.report(format_args!(
                                "value index {index} out of bounds for {} values",
                                values.len()
                            ));
                        }
                    });
                });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuplet_document() -> CompactDocument {
        let mut g = vec![None; CHARACTER_COUNT];
        g[0] = Some(GlyphEntry::Indexed(0));
        g[1] = Some(GlyphEntry::Indexed(1));
        CompactDocument {
            k: Default::default(),
            b: Default::default(),
            v: Some(vec![1.0, 2.0]),
            g,
            t: Some(vec![[0, 0, 0, 0, 0], [1, 1, 0, 0, 1]]),
            s: None,
        }
    }

    #[test]
    fn well_formed() {
        assert!(tuplet_document().validate().is_ok());
    }

    #[test]
    fn reports_every_problem_with_location() {
        let mut doc = tuplet_document();
        doc.g[5] = Some(GlyphEntry::Indexed(2));
        doc.t.as_mut().unwrap()[1] = [0, 0, 9, 0, 0];
        doc.g.pop();

        let report = doc.validate().unwrap_err();
        assert_eq!(report.len(), 3);
        let message = report.to_string();
        assert!(message.contains("CompactDocument.g: expected 204"), "{message}");
        assert!(message.contains("CompactDocument.g[5]: index 2"), "{message}");
        assert!(message.contains("CompactDocument.t[1]: value index 9"), "{message}");
    }

    #[test]
    fn flattened_values_must_be_whole_records() {
        let mut doc = tuplet_document();
        doc.t = None;
        doc.v = Some(vec![1.0; 7]);
        let report = doc.validate().unwrap_err();
        let message = report.to_string();
        assert!(message.contains("not a multiple of 5"), "{message}");
        // one whole record, so index 1 is out of bounds
        assert!(message.contains("CompactDocument.g[1]"), "{message}");
    }

    #[test]
    fn single_error_format() {
        let mut doc = tuplet_document();
        doc.b.hanging_baseline = f64::NAN;
        let report = doc.validate().unwrap_err();
        assert_eq!(
            report.to_string(),
            "CompactDocument.b: baseline metrics must be finite"
        );
    }
}
