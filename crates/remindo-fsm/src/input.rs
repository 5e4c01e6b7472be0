// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Free-text input parsers. Each returns `None` on malformed input so the
//! calling step can re-prompt without advancing.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, NaiveTime};
use regex::Regex;

/// Strict 24-hour `hh:mm`, both fields zero-padded.
static TIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[0-9]|1[0-9]|2[0-3]):[0-5][0-9]$").expect("time pattern"));

/// `<integer> <unit>`, unit optional.
static INTERVAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,9})\s*(\S*)$").expect("interval pattern"));

/// Parses `hh:mm`. `"9:5"` and `"25:00"` are rejected.
pub fn parse_time(input: &str) -> Option<NaiveTime> {
    let input = input.trim();
    if !TIME_PATTERN.is_match(input) {
        return None;
    }
    NaiveTime::parse_from_str(input, "%H:%M").ok()
}

/// Parses a repeat interval into seconds.
///
/// Units are `ч`/`h` for hours and `м`/`m` for minutes, case-insensitive; a
/// bare number means minutes. The magnitude must be positive.
pub fn parse_repeat_interval(input: &str) -> Option<i64> {
    let captures = INTERVAL_PATTERN.captures(input.trim())?;
    let magnitude: i64 = captures.get(1)?.as_str().parse().ok()?;
    if magnitude <= 0 {
        return None;
    }
    let unit = captures.get(2).map(|m| m.as_str().to_lowercase()).unwrap_or_default();
    let factor = match unit.as_str() {
        "ч" | "h" => 3600,
        "м" | "m" | "" => 60,
        _ => return None,
    };
    magnitude.checked_mul(factor)
}

/// Whether a picked calendar date may be used as a fire date: anything from
/// yesterday on, which leaves slack for users ahead of the server's zone.
pub fn date_allowed(date: NaiveDate, today: NaiveDate) -> bool {
    date >= today - Duration::days(1)
}

/// Trims free text and rejects blank input.
pub fn non_blank(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn time_accepts_strict_24h() {
        assert_eq!(parse_time("23:59"), NaiveTime::from_hms_opt(23, 59, 0));
        assert_eq!(parse_time("00:00"), NaiveTime::from_hms_opt(0, 0, 0));
        assert_eq!(parse_time(" 07:30 "), NaiveTime::from_hms_opt(7, 30, 0));
    }

    #[test]
    fn time_rejects_loose_forms() {
        for bad in ["25:00", "9:5", "24:00", "12:60", "12-30", "1230", "", "ab:cd"] {
            assert_eq!(parse_time(bad), None, "{bad} should be rejected");
        }
    }

    #[test]
    fn interval_units() {
        assert_eq!(parse_repeat_interval("10 ч"), Some(36_000));
        assert_eq!(parse_repeat_interval("10 м"), Some(600));
        assert_eq!(parse_repeat_interval("2 H"), Some(7_200));
        assert_eq!(parse_repeat_interval("5 M"), Some(300));
        assert_eq!(parse_repeat_interval("45"), Some(2_700));
        assert_eq!(parse_repeat_interval("3ч"), Some(10_800));
    }

    #[test]
    fn interval_rejects_garbage() {
        for bad in ["ten м", "10 x", "0 м", "-5 м", "10 м м", "", "м"] {
            assert_eq!(parse_repeat_interval(bad), None, "{bad} should be rejected");
        }
    }

    #[test]
    fn yesterday_is_the_earliest_date() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert!(date_allowed(today, today));
        assert!(date_allowed(today - Duration::days(1), today));
        assert!(!date_allowed(today - Duration::days(2), today));
    }

    proptest! {
        #[test]
        fn every_valid_clock_reading_parses(h in 0u32..24, m in 0u32..60) {
            let text = format!("{h:02}:{m:02}");
            prop_assert_eq!(parse_time(&text), NaiveTime::from_hms_opt(h, m, 0));
        }

        #[test]
        fn hours_are_sixty_minutes(n in 1i64..10_000) {
            let hours = parse_repeat_interval(&format!("{n} ч")).unwrap();
            let minutes = parse_repeat_interval(&format!("{} м", n * 60)).unwrap();
            prop_assert_eq!(hours, minutes);
        }
    }
}
