//! Statistical utility functions shared across modules
//!
//! Missing abundance values are stored as NaN; every helper here skips them
//! the way pandas' `skipna=True` reductions do.

use std::cmp::Ordering;

/// Collect the non-missing values of a slice-like iterator
pub fn present_values<'a, I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    values.into_iter().copied().filter(|v| !v.is_nan()).collect()
}

/// Median of the non-missing values, NaN when none are present
pub fn nan_median<'a, I>(values: I) -> f64
where
    I: IntoIterator<Item = &'a f64>,
{
    let mut present = present_values(values);
    if present.is_empty() {
        return f64::NAN;
    }
    present.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let n = present.len();
    if n % 2 == 1 {
        present[n / 2]
    } else {
        (present[n / 2 - 1] + present[n / 2]) / 2.0
    }
}

/// Average ranks (1-based) with ties sharing the mean of their positions.
/// R equivalent: rank(x, ties.method = "average")
///
/// Also returns the size of every tie group, which the rank-sum variance
/// correction needs.
pub fn average_ranks(values: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; n];
    let mut tie_sizes = Vec::new();
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // positions i..j (0-based) share rank mean((i+1)..=j)
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = avg_rank;
        }
        tie_sizes.push(j - i);
        i = j;
    }

    (ranks, tie_sizes)
}

/// Linear interpolation into a sorted slice at fractional position `pos` in [0, len-1]
pub fn interpolate_sorted(sorted: &[f64], pos: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = pos.clamp(0.0, (n - 1) as f64);
            let lo = pos.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            let frac = pos - lo as f64;
            sorted[lo] + frac * (sorted[hi] - sorted[lo])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_median_odd_even() {
        assert_eq!(nan_median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(nan_median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
    }

    #[test]
    fn test_nan_median_skips_missing() {
        assert!((nan_median(&[f64::NAN, -0.3, 0.1, f64::NAN]) + 0.1).abs() < 1e-12);
        assert!(nan_median(&[f64::NAN, f64::NAN]).is_nan());
        assert!(nan_median(&[] as &[f64]).is_nan());
    }

    #[test]
    fn test_average_ranks_with_ties() {
        let (ranks, ties) = average_ranks(&[10.0, 20.0, 10.0, 30.0]);
        assert_eq!(ranks, vec![1.5, 3.0, 1.5, 4.0]);
        assert_eq!(ties, vec![2, 1, 1]);
    }

    #[test]
    fn test_interpolate_sorted() {
        let sorted = [1.0, 2.0, 4.0];
        assert_eq!(interpolate_sorted(&sorted, 0.0), 1.0);
        assert_eq!(interpolate_sorted(&sorted, 1.5), 3.0);
        assert_eq!(interpolate_sorted(&sorted, 2.0), 4.0);
        assert_eq!(interpolate_sorted(&[7.0], 0.3), 7.0);
    }
}
