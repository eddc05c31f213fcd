//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use marketlist_geo::Coordinate;
use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print a dimmed key/value line
    pub fn field(key: &str, value: &str) {
        println!("  {:<14} {}", format!("{key}:").dimmed(), value);
    }
}

/// Format a distance in miles for display
pub fn format_miles(miles: f64) -> String {
    if miles < 0.1 {
        format!("{:.0} ft", miles * 5280.0)
    } else {
        format!("{:.2} mi", miles)
    }
}

/// Format a whole-dollar amount with thousands separators
pub fn format_dollars(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Format a coordinate as "lat, lon" with five decimals
pub fn format_coordinate(coord: &Coordinate) -> String {
    format!("{:.5}, {:.5}", coord.latitude, coord.longitude)
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_miles() {
        assert_eq!(format_miles(13.8093), "13.81 mi");
        assert_eq!(format_miles(0.05), "264 ft");
    }

    #[test]
    fn test_format_dollars() {
        assert_eq!(format_dollars(0), "$0");
        assert_eq!(format_dollars(950), "$950");
        assert_eq!(format_dollars(1_250_000), "$1,250,000");
        assert_eq!(format_dollars(-42_000), "-$42,000");
    }

    #[test]
    fn test_format_coordinate() {
        assert_eq!(format_coordinate(&Coordinate::new(42.3, -71.1)), "42.30000, -71.10000");
    }

    #[test]
    fn test_format_count_singular() {
        assert_eq!(format_count(1, "property", "properties"), "1 property");
    }

    #[test]
    fn test_format_count_plural() {
        assert_eq!(format_count(5, "property", "properties"), "5 properties");
    }
}
