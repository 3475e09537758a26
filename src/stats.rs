//! Small numeric helpers shared across the pipeline.
//!
//! Rounding is half-to-even and the percentile uses linear interpolation
//! between order statistics; both must match the statistics the models were
//! fitted against, so they are pinned here and tested.

/// Round to `digits` decimal places, ties to even.
pub fn round_to(x: f64, digits: i32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let factor = 10f64.powi(digits);
    (x * factor).round_ties_even() / factor
}

/// Round to 2 decimal places (monetary fields).
pub fn round2(x: f64) -> f64 {
    round_to(x, 2)
}

/// Linear-interpolated percentile of `values`, `q` in [0, 100].
///
/// Returns `None` for an empty slice. Non-finite inputs are the caller's
/// problem; counts and capped monetary fields are always finite here.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("finite values"));

    let pos = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let frac = pos - lo as f64;
    if lo + 1 < sorted.len() {
        Some(sorted[lo] + frac * (sorted[lo + 1] - sorted[lo]))
    } else {
        Some(sorted[lo])
    }
}

/// Arithmetic mean, ignoring NaN entries (missing values).
pub fn nan_mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        if v.is_finite() {
            sum += v;
            n += 1;
        }
    }
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

/// First quartile, third quartile, and the IQR cap bounds for one field.
#[derive(Debug, Clone, Copy)]
pub struct IqrBounds {
    pub lower: f64,
    pub upper: f64,
}

/// Tukey fences at 1.5 IQR over `values` (NaN entries skipped).
pub fn iqr_bounds(values: &[f64]) -> Option<IqrBounds> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let q1 = percentile(&finite, 25.0)?;
    let q3 = percentile(&finite, 75.0)?;
    let iqr = q3 - q1;
    Some(IqrBounds {
        lower: q1 - 1.5 * iqr,
        upper: q3 + 1.5 * iqr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_to_even() {
        assert_eq!(round_to(0.5, 0), 0.0);
        assert_eq!(round_to(1.5, 0), 2.0);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(3.145001), 3.15);
    }

    #[test]
    fn test_percentile_interpolates() {
        let v = [1.0, 2.0, 3.0, 4.0];
        // position 2.25 between 3 and 4
        assert_eq!(percentile(&v, 75.0), Some(3.25));
        assert_eq!(percentile(&v, 0.0), Some(1.0));
        assert_eq!(percentile(&v, 100.0), Some(4.0));
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(percentile(&[7.0], 75.0), Some(7.0));
    }

    #[test]
    fn test_iqr_bounds() {
        let v = [1.0, 2.0, 3.0, 4.0, 100.0];
        let b = iqr_bounds(&v).unwrap();
        // Q1 = 2, Q3 = 4, IQR = 2
        assert_eq!(b.lower, -1.0);
        assert_eq!(b.upper, 7.0);
    }

    #[test]
    fn test_nan_mean_skips_missing() {
        assert_eq!(nan_mean([1.0, f64::NAN, 3.0]), 2.0);
        assert!(nan_mean([f64::NAN]).is_nan());
    }
}
