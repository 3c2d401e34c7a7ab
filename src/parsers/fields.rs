//! Normalization of raw listing text into typed values.
//!
//! Every function here is total: text that does not match yields `None`.

use regex::Regex;
use std::sync::LazyLock;

/// `1.234,50`: grouping with `.` or spaces, `,` decimals
const SUFFIXED_AMOUNT: &str =
    r"\d{1,3}(?:[.\x{a0}\x{202f}]\d{3})+(?:,\d{1,2})?|\d+(?:,\d{1,2})?";

/// `1,234.50`: grouping with `,`, `.` decimals
const PREFIXED_AMOUNT: &str = r"\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?|\d+(?:\.\d{1,2})?";

static CURRENCY_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"[€$£]\s*({PREFIXED_AMOUNT})|({SUFFIXED_AMOUNT})\s*[€$£]"
    ))
    .expect("currency regex")
});

static COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,3}(?:[.,\x{a0}]\d{3})+|\d+").expect("count regex"));

static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?").expect("decimal regex"));

static TRAVELERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:viajeros?|huéspedes|huésped|guests?|travell?ers?)\b")
        .expect("travelers regex")
});

static BEDROOMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:dormitorios?|habitaci[oó]n(?:es)?|bedrooms?)\b")
        .expect("bedrooms regex")
});

static BEDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(?:camas?|beds?)\b").expect("beds regex"));

static BATHS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)(?:[.,]\d+)?\s*(?:baños?|bathrooms?|baths?)\b").expect("baths regex")
});

/// Capacity figures pulled from a listing's amenity lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmenityCounts {
    pub travelers: Option<u32>,
    pub bedrooms: Option<u32>,
    pub beds: Option<u32>,
    pub baths: Option<u32>,
}

/// Reads the listed price and, when present, the discounted price.
///
/// Only amounts attached to a currency symbol count. A trailing symbol
/// (`1.234,50 €`) reads `,` as the decimal mark, a leading one (`$1,234.50`)
/// reads `.`. With more than two such amounts the first two are used.
pub fn parse_price_range(text: &str) -> (Option<f64>, Option<f64>) {
    let mut amounts = CURRENCY_TOKEN.captures_iter(text).filter_map(|caps| {
        match (caps.get(1), caps.get(2)) {
            (Some(m), _) => parse_amount(m.as_str(), '.'),
            (None, Some(m)) => parse_amount(m.as_str(), ','),
            (None, None) => None,
        }
    });
    let low = amounts.next();
    let high = low.and(amounts.next());
    (low, high)
}

/// Keeps digits and the `decimal` mark: `1.234,50` with `,` -> 1234.5
fn parse_amount(raw: &str, decimal: char) -> Option<f64> {
    let normalized: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == decimal)
        .map(|c| if c == decimal { '.' } else { c })
        .collect();
    normalized.parse().ok()
}

/// Extracts travelers, bedrooms, beds and baths from amenity lines.
///
/// The first line matching a category decides it.
pub fn parse_amenities<S: AsRef<str>>(lines: &[S]) -> AmenityCounts {
    let mut counts = AmenityCounts::default();
    for line in lines {
        let line = line.as_ref();
        fill(&mut counts.travelers, &TRAVELERS, line);
        fill(&mut counts.bedrooms, &BEDROOMS, line);
        fill(&mut counts.beds, &BEDS, line);
        fill(&mut counts.baths, &BATHS, line);
    }
    counts
}

fn fill(slot: &mut Option<u32>, pattern: &Regex, line: &str) {
    if slot.is_some() {
        return;
    }
    *slot = pattern
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok());
}

/// Picks the review count: the short count when present, otherwise the
/// first number in the link-embedded count.
pub fn resolve_review_count(primary: Option<&str>, secondary: Option<&str>) -> Option<u32> {
    match primary.map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) => parse_count(text),
        None => secondary.and_then(parse_count),
    }
}

/// First integer in `text`, thousands separators allowed
pub fn parse_count(text: &str) -> Option<u32> {
    let token = COUNT.find(text)?;
    token
        .as_str()
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .ok()
}

/// First decimal number in `text`, with `,` or `.` as separator
pub fn parse_rating(text: &str) -> Option<f64> {
    let token = DECIMAL.find(text)?;
    token.as_str().replace(',', ".").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_price_line() {
        assert_eq!(parse_price_range("85 € noche"), (Some(85.0), None));
        assert_eq!(parse_price_range("€ 85 night"), (Some(85.0), None));
    }

    #[test]
    fn test_thousands_and_decimals() {
        assert_eq!(
            parse_price_range("1.234,50 € mes"),
            (Some(1234.5), None)
        );
        assert_eq!(parse_price_range("2\u{a0}100 €"), (Some(2100.0), None));
    }

    #[test]
    fn test_count_and_rating() {
        assert_eq!(parse_count("1.234 reseñas"), Some(1234));
        assert_eq!(parse_count("(12)"), Some(12));
        assert_eq!(parse_count("Nuevo"), None);
        assert_eq!(parse_rating("4,85"), Some(4.85));
        assert_eq!(parse_rating("Valoración 4.9 de 5"), Some(4.9));
        assert_eq!(parse_rating("Nuevo"), None);
    }

    #[test]
    fn test_blank_primary_falls_back() {
        assert_eq!(resolve_review_count(Some("  "), Some("8 reseñas")), Some(8));
    }
}
