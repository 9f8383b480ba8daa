//! Free-text location cell parsing.
//!
//! Spreadsheet authors write insertion points as `"12.5, 7"`, `"X=12.5,7 (left rail)"`
//! and so on. Only the first numeric pair in the text is used.

use std::sync::OnceLock;

use regex::Regex;

/// Digits and dots, a comma with optional whitespace, digits and dots.
const PAIR_PATTERN: &str = r"([0-9.]+)\s*,\s*([0-9.]+)";

fn pair_regex() -> Option<&'static Regex> {
    static PAIR: OnceLock<Option<Regex>> = OnceLock::new();
    PAIR.get_or_init(|| Regex::new(PAIR_PATTERN).ok()).as_ref()
}

/// Insertion point of a symbol in drawing units.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Extract the first `x, y` pair from a location cell.
///
/// Numbers are read with a dot as decimal separator regardless of the
/// process locale. Returns `None` if there is no match or if either captured
/// group is not a valid number (e.g. `"1..2, 3"`).
pub fn extract(text: Option<&str>) -> Option<Point> {
    let caps = pair_regex()?.captures(text?)?;
    let x = parse_invariant(caps.get(1)?.as_str())?;
    let y = parse_invariant(caps.get(2)?.as_str())?;
    Some(Point::new(x, y))
}

/// Parse a number made of ASCII digits and at most one decimal point.
fn parse_invariant(s: &str) -> Option<f64> {
    if s.matches('.').count() > 1 || !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
