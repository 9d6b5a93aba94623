//! Plain-text rendering helpers shared by the dashboard commands.

/// `$1,234.56`; grouping makes pool TVLs scannable.
pub fn usd(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u128;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}${grouped}.{frac:02}", if negative { "-" } else { "" })
}

/// `12.34%`, with tiny-but-nonzero rates kept visible.
pub fn percent(value: f64) -> String {
    if value > 0.0 && value < 0.01 {
        "<0.01%".to_string()
    } else {
        format!("{value:.2}%")
    }
}

/// Risk band for a borrow-limit utilization figure.
pub fn utilization_band(ratio: f64) -> &'static str {
    if ratio <= 40.0 {
        "safe"
    } else if ratio <= 60.0 {
        "moderate"
    } else if ratio <= 80.0 {
        "elevated"
    } else {
        "high"
    }
}

/// A fixed-width utilization bar: `[######........] 42.0% of $1,000.00 (moderate)`.
pub fn utilization_bar(ratio: f64, limit_usd: f64) -> String {
    const WIDTH: usize = 24;
    let clamped = ratio.clamp(0.0, 100.0);
    let filled = (clamped / 100.0 * WIDTH as f64).round() as usize;
    let bar: String = "#".repeat(filled) + &".".repeat(WIDTH - filled);
    format!(
        "[{bar}] {clamped:.1}% of {} borrow limit ({})",
        usd(limit_usd),
        utilization_band(ratio)
    )
}

/// Liquidation warning threshold, rendered under the bar when crossed.
pub fn utilization_warning(ratio: f64) -> Option<String> {
    if ratio > 95.0 {
        Some(format!(
            "  WARNING: {ratio:.1}% of your borrow limit is in use — close to liquidation!"
        ))
    } else {
        None
    }
}
