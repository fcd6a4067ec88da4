//! Date resolution for free-form Korean/numeric date expressions.
//!
//! Patterns are tried in table order and the first one that yields a
//! constructible date wins. Within a pattern, matches whose month/day are
//! out of range are skipped in favor of later matches; a match whose
//! month/day are in range but not constructible (e.g. 2월 30일) abandons the
//! pattern entirely.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};

/// Raw numbers captured by a date pattern, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DateParts {
    year: Option<i32>,
    month: u32,
    day: u32,
}

/// A compiled date pattern with its capture extractor.
struct DatePattern {
    name: &'static str,
    regex: Regex,
    extract: fn(&Captures) -> Option<DateParts>,
}

fn capture_num<T: std::str::FromStr>(caps: &Captures, idx: usize) -> Option<T> {
    caps.get(idx)?.as_str().parse().ok()
}

fn year_month_day(caps: &Captures) -> Option<DateParts> {
    Some(DateParts {
        year: Some(capture_num(caps, 1)?),
        month: capture_num(caps, 2)?,
        day: capture_num(caps, 3)?,
    })
}

fn month_day(caps: &Captures) -> Option<DateParts> {
    Some(DateParts {
        year: None,
        month: capture_num(caps, 1)?,
        day: capture_num(caps, 2)?,
    })
}

/// Ordered pattern table. Earlier entries take priority.
static DATE_PATTERNS: LazyLock<Vec<DatePattern>> = LazyLock::new(|| {
    vec![
        DatePattern {
            name: "korean_ymd",
            regex: Regex::new(r"([0-9]{4})년\s*([0-9]{1,2})월\s*([0-9]{1,2})일")
                .expect("valid regex"),
            extract: year_month_day,
        },
        DatePattern {
            name: "numeric_ymd",
            regex: Regex::new(r"([0-9]{4})[./-]([0-9]{1,2})[./-]([0-9]{1,2})")
                .expect("valid regex"),
            extract: year_month_day,
        },
        DatePattern {
            name: "korean_md",
            regex: Regex::new(r"([0-9]{1,2})월\s*([0-9]{1,2})일").expect("valid regex"),
            extract: month_day,
        },
        // The regex crate has no lookahead; the trailing group stands in for
        // "not followed by another digit".
        DatePattern {
            name: "slash_md",
            regex: Regex::new(r"([0-9]{1,2})/([0-9]{1,2})(?:[^0-9]|$)").expect("valid regex"),
            extract: month_day,
        },
    ]
});

/// Names of the date patterns in priority order.
pub fn pattern_names() -> Vec<&'static str> {
    DATE_PATTERNS.iter().map(|p| p.name).collect()
}

/// A resolved date together with how it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    pub date: NaiveDate,
    pub pattern: &'static str,
    /// True when the expression carried no usable year.
    pub year_inferred: bool,
    /// True when the year was pushed forward because the date had passed.
    pub rolled_over: bool,
}

/// Finds and resolves the first date expression in a text fragment.
#[derive(Debug, Clone, Copy)]
pub struct DateResolver {
    min_literal_year: i32,
}

impl Default for DateResolver {
    fn default() -> Self {
        Self::new(2000)
    }
}

impl DateResolver {
    pub fn new(min_literal_year: i32) -> Self {
        Self { min_literal_year }
    }

    /// Resolve the first date in `fragment` relative to `today`.
    pub fn resolve(&self, fragment: &str, today: NaiveDate) -> Option<NaiveDate> {
        self.resolve_detailed(fragment, today).map(|r| r.date)
    }

    pub fn resolve_detailed(&self, fragment: &str, today: NaiveDate) -> Option<ResolvedDate> {
        DATE_PATTERNS
            .iter()
            .find_map(|pattern| self.resolve_with(pattern, fragment, today))
    }

    fn resolve_with(
        &self,
        pattern: &DatePattern,
        fragment: &str,
        today: NaiveDate,
    ) -> Option<ResolvedDate> {
        let current_year = today.year();

        for caps in pattern.regex.captures_iter(fragment) {
            let Some(parts) = (pattern.extract)(&caps) else {
                continue;
            };

            if !(1..=12).contains(&parts.month) || !(1..=31).contains(&parts.day) {
                continue;
            }

            let year = match parts.year {
                Some(y) if y >= self.min_literal_year => y,
                _ => current_year,
            };

            // In range but not a real calendar day: give up on this pattern.
            let date = NaiveDate::from_ymd_opt(year, parts.month, parts.day)?;

            if parts.year.is_none() && date < today {
                let rolled = NaiveDate::from_ymd_opt(year + 1, parts.month, parts.day)?;
                return Some(ResolvedDate {
                    date: rolled,
                    pattern: pattern.name,
                    year_inferred: true,
                    rolled_over: true,
                });
            }

            return Some(ResolvedDate {
                date,
                pattern: pattern.name,
                year_inferred: parts.year.is_none(),
                rolled_over: false,
            });
        }

        None
    }
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn resolve(fragment: &str, today: NaiveDate) -> Option<NaiveDate> {
        DateResolver::default().resolve(fragment, today)
    }

    #[test]
    fn pattern_order_is_fixed() {
        assert_eq!(
            pattern_names(),
            vec!["korean_ymd", "numeric_ymd", "korean_md", "slash_md"]
        );
    }

    #[test]
    fn korean_full_date() {
        let today = date(2025, 1, 1);
        assert_eq!(resolve("2025년 3월 5일 마감", today), Some(date(2025, 3, 5)));
        assert_eq!(resolve("2025년3월5일", today), Some(date(2025, 3, 5)));
    }

    #[test]
    fn numeric_separators() {
        let today = date(2025, 1, 1);
        assert_eq!(resolve("기한 2025.04.10", today), Some(date(2025, 4, 10)));
        assert_eq!(resolve("기한 2025-4-10", today), Some(date(2025, 4, 10)));
        assert_eq!(resolve("기한 2025/04/10", today), Some(date(2025, 4, 10)));
    }

    #[test]
    fn full_date_beats_slash_in_same_fragment() {
        let today = date(2025, 1, 1);
        let resolved = DateResolver::default()
            .resolve_detailed("3/5 예정, 정식 일정은 2025년 3월 5일", today)
            .unwrap();
        assert_eq!(resolved.date, date(2025, 3, 5));
        assert_eq!(resolved.pattern, "korean_ymd");
        assert!(!resolved.year_inferred);
    }

    #[test]
    fn month_day_uses_current_year() {
        let today = date(2025, 3, 1);
        let resolved = DateResolver::default()
            .resolve_detailed("4월 2일 회의", today)
            .unwrap();
        assert_eq!(resolved.date, date(2025, 4, 2));
        assert!(resolved.year_inferred);
        assert!(!resolved.rolled_over);
    }

    #[test]
    fn past_month_day_rolls_to_next_year() {
        let today = date(2025, 6, 1);
        let resolved = DateResolver::default()
            .resolve_detailed("1월 10일 보고", today)
            .unwrap();
        assert_eq!(resolved.date, date(2026, 1, 10));
        assert!(resolved.rolled_over);
    }

    #[test]
    fn today_does_not_roll_over() {
        let today = date(2025, 6, 1);
        assert_eq!(resolve("6월 1일 회의", today), Some(date(2025, 6, 1)));
    }

    #[test]
    fn explicit_past_year_is_not_rolled() {
        let today = date(2025, 6, 1);
        assert_eq!(resolve("2024년 1월 10일", today), Some(date(2024, 1, 10)));
    }

    #[test]
    fn slash_month_day() {
        let today = date(2025, 3, 1);
        assert_eq!(resolve("제출 3/15 까지", today), Some(date(2025, 3, 15)));
        assert_eq!(resolve("제출 3/15", today), Some(date(2025, 3, 15)));
    }

    #[test]
    fn slash_followed_by_digit_is_ignored() {
        let today = date(2025, 3, 1);
        assert_eq!(resolve("비율 3/155 기준", today), None);
    }

    #[test]
    fn out_of_range_match_scans_to_later_match() {
        let today = date(2025, 1, 1);
        assert_eq!(resolve("13월 5일 아님, 4월 7일 맞음", today), Some(date(2025, 4, 7)));
    }

    #[test]
    fn out_of_range_falls_through_to_next_pattern() {
        let today = date(2025, 1, 1);
        // korean_md 13월 fails, slash_md picks up 5/20
        assert_eq!(resolve("13월 40일 또는 5/20", today), Some(date(2025, 5, 20)));
    }

    #[test]
    fn unconstructible_date_abandons_pattern() {
        let today = date(2025, 1, 1);
        // 2월 30일 is in range but impossible; the later 3월 1일 is not considered
        // by the same pattern, and slash_md picks up 6/7.
        assert_eq!(resolve("2월 30일, 3월 1일, 6/7", today), Some(date(2025, 6, 7)));
        assert_eq!(resolve("2월 30일, 3월 1일", today), None);
    }

    #[test]
    fn leap_day_rollover_into_non_leap_year_fails() {
        let today = date(2024, 3, 1);
        assert_eq!(resolve("2월 29일 마감", today), None);
    }

    #[test]
    fn placeholder_year_replaced_with_current_year() {
        let today = date(2025, 1, 1);
        assert_eq!(resolve("1999.05.06 제출", today), Some(date(2025, 5, 6)));
    }

    #[test]
    fn no_date_found() {
        let today = date(2025, 1, 1);
        assert_eq!(resolve("날짜가 없는 문장입니다", today), None);
        assert_eq!(resolve("", today), None);
    }

    #[test]
    fn custom_min_literal_year() {
        let today = date(2025, 1, 1);
        let resolver = DateResolver::new(2030);
        assert_eq!(
            resolver.resolve("2029년 5월 6일", today),
            Some(date(2025, 5, 6))
        );
    }
}
