/// Format an integer weight with thousands separators.
///
/// # Examples
///
/// ```
/// use milkweight_core::formatting::format_weight;
///
/// assert_eq!(format_weight(6305), "6,305");
/// assert_eq!(format_weight(-1200000), "-1,200,000");
/// ```
pub fn format_weight(weight: i64) -> String {
    let grouped = group_thousands(&weight.unsigned_abs().to_string());
    if weight < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format a percentage with two decimals and no grouping, as written to
/// exported reports (`"33.33"`).
pub fn format_percent(value: f64) -> String {
    let rounded = round_to(value, 2);
    // Avoid printing "-0.00".
    if rounded == 0.0 {
        return "0.00".to_string();
    }
    format!("{:.2}", rounded)
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero.
///
/// # Examples
///
/// ```
/// use milkweight_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    round_to((part / whole) * 100.0, decimal_places)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn round_to(value: f64, decimal_places: u32) -> f64 {
    let factor = 10_f64.powi(decimal_places as i32);
    (value * factor).round() / factor
}

/// Insert a comma every three digits from the right of a digit string.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
