/// Placeholder shown for a metric that is undefined (zero denominator).
pub const UNDEFINED_METRIC: &str = "—";

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use scorebook_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge exact midpoints so 1.005 rounds up despite its binary form.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();
    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` is "0.xx"; keep ".xx".
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format an optional metric to two decimal places, rendering `None` as
/// [`UNDEFINED_METRIC`] instead of a misleading zero.
///
/// # Examples
///
/// ```
/// use scorebook_core::formatting::format_metric;
///
/// assert_eq!(format_metric(Some(34.5)), "34.50");
/// assert_eq!(format_metric(Some(0.0)), "0.00");
/// assert_eq!(format_metric(None), "—");
/// ```
pub fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(v) => format_number(v, 2),
        None => UNDEFINED_METRIC.to_string(),
    }
}

/// Format an integer count with thousands separators.
///
/// ```
/// use scorebook_core::formatting::format_count;
///
/// assert_eq!(format_count(12_345), "12,345");
/// ```
pub fn format_count(value: u32) -> String {
    group_thousands(&value.to_string())
}

/// Render any displayable option, using [`UNDEFINED_METRIC`] for `None`.
pub fn display_or_dash<T: std::fmt::Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| UNDEFINED_METRIC.to_string())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
