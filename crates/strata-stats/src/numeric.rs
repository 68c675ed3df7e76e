//! Small numeric kernels with explicit edge-case contracts.

/// Median of `values`; the mean of the two middle order statistics when the
/// count is even. Returns `None` for an empty slice or any NaN.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some(0.5 * (sorted[mid - 1] + sorted[mid]))
    }
}

/// Arithmetic mean, `None` when empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Unbiased sample standard deviation (divisor `n - 1`).
///
/// A single sample has zero spread, so `n == 1` yields `Some(0.0)` rather
/// than NaN. Returns `None` when empty.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let centre = mean(values)?;
    if values.len() == 1 {
        return Some(0.0);
    }
    let sum_sq: f64 = values.iter().map(|v| (v - centre).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[300.0, 100.0, 200.0]), Some(200.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[7.0]), Some(7.0));
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[1.0, f64::NAN]), None);
    }

    #[test]
    fn sample_std_uses_bessel_correction() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let sd = sample_std(&values).unwrap();
        assert!((sd - 2.138_089_935_299_395).abs() < 1e-12);
    }

    #[test]
    fn single_sample_has_zero_spread() {
        assert_eq!(sample_std(&[42.0]), Some(0.0));
        assert_eq!(sample_std(&[]), None);
    }
}
