//! Human-friendly duration strings as Prometheus rule files write them.

use std::time::Duration as StdDuration;

/// Parse durations like `"30m"`, `"1h30m"`, `"90s"`, `"500ms"` or `"0s"`.
///
/// Units compose largest-first the way `for:` values are written; `"0s"` is
/// a valid zero duration. A bare number (`"30"`), an unknown unit, or an
/// empty string parses to `None`.
pub fn parse_duration(s: &str) -> Option<StdDuration> {
    if s.is_empty() {
        return None;
    }

    let bytes = s.as_bytes();
    let mut total_ms: u64 = 0;
    let mut i = 0;

    while i < bytes.len() {
        let num_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == num_start {
            return None;
        }
        let n: u64 = s[num_start..i].parse().ok()?;

        let unit_start = i;
        while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
            i += 1;
        }
        let ms = match &s[unit_start..i] {
            "d" => n.checked_mul(86_400_000)?,
            "h" => n.checked_mul(3_600_000)?,
            "m" => n.checked_mul(60_000)?,
            "s" => n.checked_mul(1_000)?,
            "ms" => n,
            _ => return None,
        };
        total_ms = total_ms.checked_add(ms)?;
    }

    Some(StdDuration::from_millis(total_ms))
}

/// Render a duration largest-unit-first: `"1h30m"`, `"45s"`, `"0s"`.
pub fn format_duration(d: chrono::Duration) -> String {
    let total_ms = d.num_milliseconds().max(0);
    if total_ms == 0 {
        return "0s".to_string();
    }

    let ms = total_ms % 1_000;
    let mut secs = total_ms / 1_000;
    let days = secs / 86_400;
    secs %= 86_400;
    let hours = secs / 3_600;
    secs %= 3_600;
    let mins = secs / 60;
    secs %= 60;

    let mut out = String::new();
    if days > 0 {
        out.push_str(&format!("{days}d"));
    }
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if mins > 0 {
        out.push_str(&format!("{mins}m"));
    }
    if secs > 0 {
        out.push_str(&format!("{secs}s"));
    }
    if ms > 0 {
        out.push_str(&format!("{ms}ms"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_valid() {
        assert_eq!(parse_duration("30m"), Some(StdDuration::from_secs(30 * 60)));
        assert_eq!(parse_duration("1h"), Some(StdDuration::from_secs(3600)));
        assert_eq!(
            parse_duration("2h30m"),
            Some(StdDuration::from_secs(2 * 3600 + 30 * 60))
        );
        assert_eq!(parse_duration("90s"), Some(StdDuration::from_secs(90)));
        assert_eq!(parse_duration("500ms"), Some(StdDuration::from_millis(500)));
        assert_eq!(parse_duration("1d"), Some(StdDuration::from_secs(86_400)));
    }

    #[test]
    fn parse_duration_zero() {
        assert_eq!(parse_duration("0s"), Some(StdDuration::ZERO));
        assert_eq!(parse_duration("0m"), Some(StdDuration::ZERO));
    }

    #[test]
    fn parse_duration_invalid() {
        assert_eq!(parse_duration("banana"), None);
        assert_eq!(parse_duration("30"), None); // no unit
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("10x"), None);
        assert_eq!(parse_duration("m30"), None);
    }

    #[test]
    fn format_duration_units() {
        assert_eq!(format_duration(chrono::Duration::zero()), "0s");
        assert_eq!(format_duration(chrono::Duration::seconds(45)), "45s");
        assert_eq!(format_duration(chrono::Duration::seconds(600)), "10m");
        assert_eq!(
            format_duration(chrono::Duration::seconds(5400)),
            "1h30m"
        );
        assert_eq!(
            format_duration(chrono::Duration::milliseconds(1500)),
            "1s500ms"
        );
        // Negative never happens for chronological samples; clamp to zero.
        assert_eq!(format_duration(chrono::Duration::seconds(-5)), "0s");
    }

    #[test]
    fn parse_format_round_trip() {
        for text in ["30m", "1h30m", "45s", "2d4h"] {
            let parsed = parse_duration(text).unwrap();
            let back = format_duration(chrono::Duration::from_std(parsed).unwrap());
            assert_eq!(back, text);
        }
    }
}
