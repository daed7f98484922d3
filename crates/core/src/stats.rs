//! Statistical primitives shared by every analyzer.
//!
//! Conventions: population standard deviation (divide by n); every ratio
//! guards its denominator and yields 0 instead of dividing by zero.
//! Sentinel substitutions for "insufficient data" live at the call sites,
//! not here.

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / (xs.len() as f64)
}

/// Population standard deviation; 0 for an empty slice.
pub fn std_dev(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let m = mean(xs);
    let var = xs
        .iter()
        .map(|x| {
            let d = x - m;
            d * d
        })
        .sum::<f64>()
        / (xs.len() as f64);
    var.sqrt()
}

/// Coefficient of variation (stdev / mean); 0 when the mean is 0.
pub fn coefficient_of_variation(xs: &[f64]) -> f64 {
    let m = mean(xs);
    if m == 0.0 {
        return 0.0;
    }
    std_dev(xs) / m
}

/// Z-score of `value` against a known mean/stdev; 0 when stdev is 0.
pub fn z_score(value: f64, mean: f64, std_dev: f64) -> f64 {
    if std_dev == 0.0 {
        return 0.0;
    }
    (value - mean) / std_dev
}

/// Mean absolute percentage error between actuals and fitted values.
///
/// Periods with zero (or negative) actual demand are excluded from the
/// denominator. Returns 100 when no period qualifies, so a confidence of
/// `100 - MAPE` bottoms out rather than overstating fit.
pub fn mape(actual: &[f64], fitted: &[f64]) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for (a, f) in actual.iter().zip(fitted.iter()) {
        if *a > 0.0 {
            total += ((a - f) / a).abs() * 100.0;
            count += 1;
        }
    }
    if count == 0 {
        return 100.0;
    }
    total / count as f64
}

/// Round to 2 decimals (monetary convention).
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
