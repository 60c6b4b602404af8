//! # Display Formats
//!
//! Fixed money, date and rate formats shared by the receipt encoder and the
//! fallback renderer. None of them depend on the host locale, so a receipt
//! printed twice comes out identical.

use chrono::{DateTime, FixedOffset};

/// Currency symbol placed before every amount.
pub const CURRENCY_SYMBOL: &str = "$";

/// `day/month/year hour:minute`, zero padded, 24h clock.
pub const DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Format an amount as `$1,234.56`.
///
/// ```
/// use boleta::format::money;
///
/// assert_eq!(money(1234.5), "$1,234.50");
/// assert_eq!(money(0.0), "$0.00");
/// ```
pub fn money(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // "-0.00" is not a thing on a receipt
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{CURRENCY_SYMBOL}{grouped}.{frac_part}")
}

/// Format a timestamp as `dd/mm/yyyy HH:MM` in its own offset.
pub fn datetime(at: &DateTime<FixedOffset>) -> String {
    at.format(DATETIME_FORMAT).to_string()
}

/// Format a tax rate without trailing zeros: `10`, `7.5`, `12.25`.
pub fn rate(percent: f64) -> String {
    let fixed = format!("{:.2}", percent);
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_grouping() {
        assert_eq!(money(5.0), "$5.00");
        assert_eq!(money(999.999), "$1,000.00");
        assert_eq!(money(12345.6), "$12,345.60");
        assert_eq!(money(1234567.891), "$1,234,567.89");
    }

    #[test]
    fn test_money_rounding() {
        assert_eq!(money(0.129), "$0.13");
        assert_eq!(money(10.004), "$10.00");
    }

    #[test]
    fn test_money_negative() {
        assert_eq!(money(-3.5), "-$3.50");
        assert_eq!(money(-0.001), "$0.00");
    }

    #[test]
    fn test_datetime_uses_own_offset() {
        let at = DateTime::parse_from_rfc3339("2024-03-05T09:07:00-03:00").unwrap();
        assert_eq!(datetime(&at), "05/03/2024 09:07");
    }

    #[test]
    fn test_rate() {
        assert_eq!(rate(10.0), "10");
        assert_eq!(rate(7.5), "7.5");
        assert_eq!(rate(12.25), "12.25");
        assert_eq!(rate(0.0), "0");
    }
}
