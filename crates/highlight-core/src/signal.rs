//! Small numeric helpers shared by the detectors

/// Arithmetic mean; `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation; `None` for an empty slice
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let mu = mean(values)?;
    let var = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// Min-max scale into [0, 1]. A constant series maps to all zeros.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    if range.is_nan() || range <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - min) / range).collect()
}

/// Centered moving average with zero padding at the edges.
///
/// Output has the input's length; each value is the window sum divided by
/// the full window size, so edge frames are attenuated.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let n = values.len();
    // Window covers [i - (window - 1 - lead), i + lead]
    let lead = (window - 1) / 2;
    let lag = window - 1 - lead;

    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    for v in values {
        prefix.push(prefix.last().copied().unwrap_or(0.0) + v);
    }

    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(lag);
            let hi = (i + lead + 1).min(n);
            (prefix[hi] - prefix[lo]) / window as f64
        })
        .collect()
}

/// First difference: out[i] = values[i + 1] - values[i]
pub fn diff(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mean_and_std() {
        assert_eq!(mean(&[]), None);
        assert_abs_diff_eq!(mean(&[1.0, 2.0, 3.0]).unwrap(), 2.0);
        assert_abs_diff_eq!(std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap(), 2.0);
        assert_abs_diff_eq!(std_dev(&[0.05; 20]).unwrap(), 0.0);
    }

    #[test]
    fn test_normalize_bounds() {
        let norm = normalize(&[3.0, -1.0, 7.0, 2.5]);
        assert_abs_diff_eq!(norm[1], 0.0);
        assert_abs_diff_eq!(norm[2], 1.0);
        assert!(norm.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_normalize_constant_is_zero() {
        assert_eq!(normalize(&[0.4; 6]), vec![0.0; 6]);
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn test_moving_average_matches_centered_convolution() {
        // window 3: neighbors on both sides
        let out = moving_average(&[3.0, 3.0, 3.0, 3.0], 3);
        assert_abs_diff_eq!(out[0], 2.0);
        assert_abs_diff_eq!(out[1], 3.0);
        assert_abs_diff_eq!(out[3], 2.0);

        // window 4: one extra frame behind
        let out = moving_average(&[0.0, 4.0, 0.0, 0.0, 0.0], 4);
        assert_abs_diff_eq!(out[0], 1.0);
        assert_abs_diff_eq!(out[1], 1.0);
        assert_abs_diff_eq!(out[2], 1.0);
        assert_abs_diff_eq!(out[3], 1.0);
        assert_abs_diff_eq!(out[4], 0.0);
    }

    #[test]
    fn test_diff() {
        assert_eq!(diff(&[1.0, 4.0, 2.0]), vec![3.0, -2.0]);
        assert!(diff(&[1.0]).is_empty());
    }
}
