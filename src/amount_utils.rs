//! Lenient numeric coercion and the rounding rules shared by every projection.
//!
//! Amounts arrive from SQLite columns that may hold text, integers, reals or
//! nulls. Nothing here ever yields `NaN` or an infinity: malformed input
//! collapses to zero (or `None` where absence is meaningful, as for goals).

use rusqlite::types::ValueRef;

/// Parse a monetary string, treating anything malformed or non-finite as 0.
pub fn parse_amount(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

pub fn amount_from_sql(value: ValueRef<'_>) -> f64 {
    optional_amount_from_sql(value).unwrap_or(0.0)
}

/// Like [`amount_from_sql`] but keeps "no usable number" distinguishable.
pub fn optional_amount_from_sql(value: ValueRef<'_>) -> Option<f64> {
    match value {
        ValueRef::Integer(i) => Some(i as f64),
        ValueRef::Real(f) if f.is_finite() => Some(f),
        ValueRef::Real(_) => None,
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    }
}

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// `part / total * 100`, rounded, and 0 whenever `total` is not positive.
pub fn ratio_percent(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        round2(part * 100.0 / total)
    } else {
        0.0
    }
}

/// Percentage share of each value in the sum of all values.
///
/// Shares are rounded to hundredths of a percent using largest-remainder
/// apportionment, so a non-empty set with a positive total always sums to
/// exactly 100.00. A zero total yields all zeros.
pub fn percent_shares(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total <= 0.0 || values.iter().any(|v| *v < 0.0 || !v.is_finite()) {
        return values.iter().map(|v| ratio_percent(*v, total)).collect();
    }

    const UNITS: i64 = 10_000;

    let raw: Vec<f64> = values
        .iter()
        .map(|v| v / total * UNITS as f64)
        .collect();
    let mut units: Vec<i64> = raw.iter().map(|r| (r + 1e-9).floor() as i64).collect();

    let mut by_remainder: Vec<usize> = (0..raw.len()).collect();
    by_remainder.sort_by(|&a, &b| {
        let ra = raw[a] - units[a] as f64;
        let rb = raw[b] - units[b] as f64;
        rb.total_cmp(&ra).then(a.cmp(&b))
    });

    let deficit = UNITS - units.iter().sum::<i64>();
    for &idx in by_remainder.iter().take(deficit.max(0) as usize) {
        units[idx] += 1;
    }

    units.into_iter().map(|u| u as f64 / 100.0).collect()
}
