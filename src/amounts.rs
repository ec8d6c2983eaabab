use std::sync::OnceLock;

use regex::Regex;

use crate::table::Cell;

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?(\d+\.?\d*|\.\d+)$").expect("valid amount regex"))
}

/// Strip currency markers and thousands separators and parse what is left.
///
/// Blank input and anything that still fails to parse yield `None`.
pub fn clean_amount(raw: &str) -> Option<f64> {
    let s = raw.replace(['$', ','], "");
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Amount value of a cell: numbers pass through, text is cleaned, missing is `None`.
pub fn cell_amount(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) => Some(*n),
        Cell::Text(s) => clean_amount(s),
        Cell::Missing => None,
    }
}

/// Whether a text value looks like a money amount once `$` and `,` are removed.
/// A single leading minus is allowed, so `-$4.50` and `$-4.50` pass but
/// `2024-01-05` does not.
pub fn looks_numeric(raw: &str) -> bool {
    let s = raw.replace(['$', ','], "");
    digits_re().is_match(s.trim())
}

/// A column is numeric when every present cell is a number or a numeric-looking string.
pub fn is_numeric_column(cells: &[Cell]) -> bool {
    cells.iter().all(|c| match c {
        Cell::Number(_) | Cell::Missing => true,
        Cell::Text(s) => looks_numeric(s),
    })
}
