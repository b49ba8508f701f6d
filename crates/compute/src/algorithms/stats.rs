//! Population statistics shared by every detection rule.
//!
//! All functions are pure and return `None` when the statistic is
//! undefined for the input (empty slice, fewer than two samples for a
//! sample standard deviation, percentile outside `(0, 1]`).

use claimscope_rules::PercentileMethod;

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_stddev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mu = mean(values)?;
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Percentile `p` in `(0, 1]`.
///
/// Nearest-rank returns the smallest sample with at least `p` of the
/// population at or below it (`rank = ceil(p * n)`, minimum 1). Linear
/// interpolates between the two closest ranks.
pub fn percentile(values: &[f64], p: f64, method: PercentileMethod) -> Option<f64> {
    if values.is_empty() || !(p > 0.0 && p <= 1.0) {
        return None;
    }
    let sorted = sorted(values);
    let n = sorted.len();

    match method {
        PercentileMethod::NearestRank => {
            // 1e-9 keeps 0.9 * 10 from rounding up to rank 10.
            let rank = ((p * n as f64) - 1e-9).ceil().max(1.0) as usize;
            Some(sorted[rank.min(n) - 1])
        }
        PercentileMethod::Linear => {
            let h = (n - 1) as f64 * p;
            let lower = h.floor() as usize;
            let upper = h.ceil() as usize;
            let frac = h - lower as f64;
            Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
        }
    }
}

/// Median; the mean of the two middle samples for an even count.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_basic() {
        assert_eq!(mean(&[2.0, 4.0, 6.0]), Some(4.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn stddev_uses_sample_denominator() {
        // Deviations from 5: -3, -1, 1, 3 -> squares sum 20 -> 20 / 3.
        let sd = sample_stddev(&[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert!((sd - (20.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn stddev_needs_two_samples() {
        assert_eq!(sample_stddev(&[7.0]), None);
        assert_eq!(sample_stddev(&[3.0, 3.0, 3.0]), Some(0.0));
    }

    #[test]
    fn nearest_rank_percentile() {
        let values: Vec<f64> = (1..=10).map(|v| v as f64 * 10.0).collect();
        assert_eq!(percentile(&values, 0.9, PercentileMethod::NearestRank), Some(90.0));
        assert_eq!(percentile(&values, 0.5, PercentileMethod::NearestRank), Some(50.0));
        assert_eq!(percentile(&values, 1.0, PercentileMethod::NearestRank), Some(100.0));
        // Tiny p still picks the first sample.
        assert_eq!(percentile(&values, 0.01, PercentileMethod::NearestRank), Some(10.0));
    }

    #[test]
    fn nearest_rank_ignores_input_order() {
        let values = [40.0, 10.0, 30.0, 20.0];
        assert_eq!(percentile(&values, 0.75, PercentileMethod::NearestRank), Some(30.0));
    }

    #[test]
    fn linear_percentile_interpolates() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(percentile(&values, 0.5, PercentileMethod::Linear), Some(30.0));
        let p90 = percentile(&values, 0.9, PercentileMethod::Linear).unwrap();
        assert!((p90 - 46.0).abs() < 1e-9);
    }

    #[test]
    fn percentile_rejects_bad_input() {
        assert_eq!(percentile(&[], 0.9, PercentileMethod::NearestRank), None);
        assert_eq!(percentile(&[1.0], 0.0, PercentileMethod::NearestRank), None);
        assert_eq!(percentile(&[1.0], 1.5, PercentileMethod::Linear), None);
        assert_eq!(percentile(&[1.0], f64::NAN, PercentileMethod::Linear), None);
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }
}
