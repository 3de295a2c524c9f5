//! Date helper functions

use chrono::{DateTime, FixedOffset, Locale};

/// Format a store timestamp with a date-fns style pattern in a locale
///
/// Timestamps that are missing or cannot be parsed render as an empty string.
///
/// # Examples
/// ```ignore
/// format_date(Some("2021-03-25T19:25:28+0000"), "dd MMM yyyy", "pt-BR") // -> "25 mar 2021"
/// ```
pub fn format_date(timestamp: Option<&str>, pattern: &str, locale: &str) -> String {
    let Some(date) = timestamp.and_then(parse_timestamp) else {
        return String::new();
    };

    let chrono_format = date_fns_to_chrono_format(pattern);
    date.format_localized(&chrono_format, parse_locale(locale))
        .to_string()
}

/// Parse the API's timestamps (`2021-03-25T19:25:28+0000`) as well as RFC 3339
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}

/// Format a timestamp for a `<time datetime="...">` attribute
pub fn date_xml(timestamp: Option<&str>) -> String {
    timestamp
        .and_then(parse_timestamp)
        .map(|date| date.format("%Y-%m-%dT%H:%M:%S%:z").to_string())
        .unwrap_or_default()
}

/// `pt-BR` → `pt_BR`; unknown locales fall back to POSIX
fn parse_locale(locale: &str) -> Locale {
    Locale::try_from(locale.replace('-', "_").as_str()).unwrap_or(Locale::POSIX)
}

/// Convert date-fns format tokens to chrono format
fn date_fns_to_chrono_format(format: &str) -> String {
    // Longest tokens first within each field
    let replacements = [
        // Year
        ("yyyy", "%Y"),
        ("yy", "%y"),
        // Month
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        // Day of week
        ("EEEE", "%A"),
        ("EEE", "%a"),
        // Day of month
        ("dd", "%d"),
        // Hour
        ("HH", "%H"),
        ("hh", "%I"),
        // Minute
        ("mm", "%M"),
        // Second
        ("ss", "%S"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_pt_br() {
        assert_eq!(
            format_date(Some("2021-03-25T19:25:28+0000"), "dd MMM yyyy", "pt-BR"),
            "25 mar 2021"
        );
    }

    #[test]
    fn test_format_date_en_us() {
        assert_eq!(
            format_date(Some("2021-03-25T19:25:28+00:00"), "dd MMM yyyy", "en-US"),
            "25 Mar 2021"
        );
    }

    #[test]
    fn test_missing_or_bad_timestamp() {
        assert_eq!(format_date(None, "dd MMM yyyy", "pt-BR"), "");
        assert_eq!(format_date(Some("yesterday"), "dd MMM yyyy", "pt-BR"), "");
    }

    #[test]
    fn test_date_fns_to_chrono() {
        assert_eq!(date_fns_to_chrono_format("dd MMM yyyy"), "%d %b %Y");
        assert_eq!(date_fns_to_chrono_format("yyyy-MM-dd HH:mm:ss"), "%Y-%m-%d %H:%M:%S");
    }

    #[test]
    fn test_date_xml() {
        assert_eq!(
            date_xml(Some("2021-03-25T19:25:28+0000")),
            "2021-03-25T19:25:28+00:00"
        );
    }
}
