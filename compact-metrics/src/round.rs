//! Rounding of metric values to the precision stored in compact documents.

/// The number of decimal places kept for every per-character scalar.
pub const METRIC_DECIMALS: i32 = 4;

/// Rounding to [`METRIC_DECIMALS`] decimal places.
///
/// Halves round towards positive infinity, and the result is never `-0.0`,
/// so equal inputs always map to bit-identical outputs.
pub trait MetricRound {
    fn metric_round(self) -> Self;
}

impl MetricRound for f64 {
    #[inline]
    fn metric_round(self) -> f64 {
        let scale = 10f64.powi(METRIC_DECIMALS);
        (self * scale + 0.5).floor() / scale
    }
}

impl<const N: usize> MetricRound for [f64; N] {
    #[inline]
    fn metric_round(self) -> [f64; N] {
        self.map(MetricRound::metric_round)
    }
}
