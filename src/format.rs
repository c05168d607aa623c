//! Rupiah and count formatting for tables and summary cards.

/// Whole rupiah with `.` thousands separators, e.g. `Rp 1.234.567`.
///
/// Fractions are truncated toward zero; negatives render as `-Rp 1.000`.
pub fn idr(amount: f64) -> String {
    if !amount.is_finite() {
        return "Rp -".to_string();
    }
    let whole = amount.trunc() as i64;
    let sign = if whole < 0 { "-" } else { "" };
    format!("{sign}Rp {}", group_thousands(whole.unsigned_abs(), '.'))
}

/// Short rupiah amount for dense columns: `Rp 1.5B`, `Rp 320.0M`, else [`idr`].
pub fn idr_compact(amount: f64) -> String {
    let abs = amount.abs();
    let sign = if amount < 0.0 { "-" } else { "" };
    if abs >= 1e9 {
        format!("{sign}Rp {:.1}B", abs / 1e9)
    } else if abs >= 1e6 {
        format!("{sign}Rp {:.1}M", abs / 1e6)
    } else {
        idr(amount)
    }
}

/// Billions with two decimals, the "Total Value (Bn)" cell.
pub fn billions(value_raw: f64) -> String {
    format!("{:.2}", value_raw.abs() / crate::BILLION)
}

/// Share lots or volumes: `1.2M`, `3.4K`, else the plain count with separators.
pub fn count_compact(n: i64) -> String {
    let abs = n.unsigned_abs();
    let sign = if n < 0 { "-" } else { "" };
    if abs >= 1_000_000 {
        format!("{sign}{:.1}M", abs as f64 / 1e6)
    } else if abs >= 1_000 {
        format!("{sign}{:.1}K", abs as f64 / 1e3)
    } else {
        format!("{sign}{abs}")
    }
}

/// Signed percentage with two decimals: `+1.25%`, `-0.40%`.
pub fn signed_pct(pct: f64) -> String {
    format!("{pct:+.2}%")
}

fn group_thousands(n: u64, sep: char) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}
