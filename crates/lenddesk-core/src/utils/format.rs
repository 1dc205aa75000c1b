use chrono::DateTime;

use crate::models::user::MAX_TIER;

/// Placeholder for empty values in the detail view.
pub const NOT_AVAILABLE: &str = "N/A";

/// Case-insensitive substring match. `needle` should already be lowercased.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// The value, or `N/A` when blank.
pub fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_AVAILABLE
    } else {
        value
    }
}

/// Format a join date like "May 15, 2020 10:00 AM".
/// Unparseable input is returned unchanged.
pub fn format_date_joined(date: &str) -> String {
    match DateTime::parse_from_rfc3339(date) {
        Ok(dt) => dt.format("%b %-d, %Y %-I:%M %p").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Filled and empty stars for an account tier, clamped to 1..=3.
pub fn tier_stars(tier: u8) -> String {
    let filled = tier.clamp(1, MAX_TIER) as usize;
    let empty = MAX_TIER as usize - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

/// Thousands separators: 102453 -> "102,453".
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Lendsqr", "lend"));
        assert!(contains_ignore_case("Lendsqr", ""));
        assert!(!contains_ignore_case("Iridia", "lend"));
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        // Counts characters, not bytes
        assert_eq!(truncate_string("₦200,000", 8), "₦200,000");
    }

    #[test]
    fn test_or_na() {
        assert_eq!(or_na(""), "N/A");
        assert_eq!(or_na("   "), "N/A");
        assert_eq!(or_na("Single"), "Single");
    }

    #[test]
    fn test_format_date_joined() {
        assert_eq!(format_date_joined("2020-05-15T10:00:00.000Z"), "May 15, 2020 10:00 AM");
        assert_eq!(format_date_joined("2023-01-03T16:05:00Z"), "Jan 3, 2023 4:05 PM");
        assert_eq!(format_date_joined("yesterday"), "yesterday");
    }

    #[test]
    fn test_tier_stars() {
        assert_eq!(tier_stars(1), "★☆☆");
        assert_eq!(tier_stars(3), "★★★");
        assert_eq!(tier_stars(0), "★☆☆");
        assert_eq!(tier_stars(9), "★★★");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(453), "453");
        assert_eq!(format_count(2453), "2,453");
        assert_eq!(format_count(102453), "102,453");
        assert_eq!(format_count(1000000), "1,000,000");
    }
}
