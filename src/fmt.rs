use chrono::{NaiveDateTime, Timelike};

/// Insert a comma every three digits from the right: 1234567 → 1,234,567
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

fn dollars(val: f64, plus: bool) -> String {
    let cents = format!("{:.2}", val.abs());
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let sign = if val < 0.0 && cents != "0.00" {
        "-"
    } else if plus && cents != "0.00" {
        "+"
    } else {
        ""
    };
    format!("{sign}${}.{frac}", group_thousands(whole))
}

/// Dollar amount with thousands separators: $1,234.56, -$4.50
pub fn money(val: f64) -> String {
    dollars(val, false)
}

/// Like [`money`] but inflows carry an explicit `+`: +$2,500.00, -$4.50
pub fn signed_money(val: f64) -> String {
    dollars(val, true)
}

/// Blank for an absent amount.
pub fn money_opt(val: Option<f64>) -> String {
    val.map(money).unwrap_or_default()
}

/// Date only when the timestamp sits at midnight.
pub fn timestamp(dt: &NaiveDateTime) -> String {
    if dt.num_seconds_from_midnight() == 0 {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
