//! Shared numeric coercion for every metric column.

/// Strip thousands separators and percent signs, then parse.
///
/// Anything unparseable (including `NaN`/`inf`) becomes `0`.
///
/// ```ignore
/// assert_eq!(to_number("1,234%"), 1234.0);
/// assert_eq!(to_number("abc"), 0.0);
/// ```
pub fn to_number(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != '%').collect();
    match cleaned.trim().parse::<f64>() {
        // `+ 0.0` folds -0 into 0
        Ok(value) if value.is_finite() => value + 0.0,
        _ => 0.0,
    }
}

/// Coerce an optional cell, `0` when the column is absent.
pub fn to_number_opt(raw: Option<&str>) -> f64 {
    raw.map(to_number).unwrap_or(0.0)
}
