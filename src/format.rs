//! Pure display helpers. Amounts are carried in minor units (cents)
//! everywhere; conversion to a decimal happens only here.

use chrono::{DateTime, Utc};

/// Final price after an optional percentage discount. A discount of zero
/// or less leaves the price untouched.
pub fn calculate_discount_price(price: i64, discount_percent: i64) -> i64 {
    if discount_percent > 0 {
        price - price * discount_percent / 100
    } else {
        price
    }
}

/// `123456` -> `$1,234.56`
pub fn format_currency(minor_units: i64) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let abs = minor_units.unsigned_abs();
    format!("{sign}${}.{:02}", group_thousands(abs / 100), abs % 100)
}

/// Plain decimal form for machine-readable output: `123456` -> `1234.56`.
pub fn format_amount(minor_units: i64) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let abs = minor_units.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Five-slot star string, rounded to the nearest whole star.
pub fn star_rating(rating: f64) -> String {
    let filled = (rating.clamp(0.0, 5.0).round()) as usize;
    let mut stars = "\u{2605}".repeat(filled);
    stars.push_str(&"\u{2606}".repeat(5 - filled));
    stars
}

/// Human date for list views, e.g. `Mar 05, 2026`.
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Timestamp form used in exported reports.
pub fn format_report_timestamp(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn discount_price_cases() {
        assert_eq!(calculate_discount_price(100, 20), 80);
        assert_eq!(calculate_discount_price(100, 0), 100);
        assert_eq!(calculate_discount_price(2599, 50), 1300);
        assert_eq!(calculate_discount_price(999, -5), 999);
    }

    #[test]
    fn currency_grouping() {
        assert_eq!(format_currency(0), "$0.00");
        assert_eq!(format_currency(950), "$9.50");
        assert_eq!(format_currency(123456), "$1,234.56");
        assert_eq!(format_currency(100000000), "$1,000,000.00");
        assert_eq!(format_currency(-2500), "-$25.00");
    }

    #[test]
    fn plain_amount() {
        assert_eq!(format_amount(123456), "1234.56");
        assert_eq!(format_amount(5), "0.05");
    }

    #[test]
    fn stars() {
        assert_eq!(star_rating(0.0), "\u{2606}\u{2606}\u{2606}\u{2606}\u{2606}");
        assert_eq!(star_rating(3.4), "\u{2605}\u{2605}\u{2605}\u{2606}\u{2606}");
        assert_eq!(star_rating(4.5), "\u{2605}\u{2605}\u{2605}\u{2605}\u{2605}");
        assert_eq!(star_rating(9.9), "\u{2605}\u{2605}\u{2605}\u{2605}\u{2605}");
    }

    #[test]
    fn dates() {
        let date = Utc.with_ymd_and_hms(2026, 3, 5, 14, 30, 9).unwrap();
        assert_eq!(format_date(date), "Mar 05, 2026");
        assert_eq!(format_report_timestamp(date), "2026-03-05 14:30:09");
    }
}
