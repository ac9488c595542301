//! Month grid generation for the date picker.
//!
//! [`build_grid`] is a pure function: the same inputs always produce the same
//! 42 cells. Rendering is left to the caller.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::WidgetError;
use crate::util::color::Rgb;
use crate::widgets::locale::Locale;

pub const GRID_ROWS: usize = 6;
pub const GRID_COLS: usize = 7;
pub const GRID_CELLS: usize = GRID_ROWS * GRID_COLS;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthRelation {
    Prev,
    Current,
    Next,
}

/// Visual state of a cell, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellStyle {
    Selected,
    Today,
    Special,
    Dimmed,
    Normal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub day_of_month: u32,
    pub epoch_day: i64,
    pub month_relation: MonthRelation,
    pub is_today: bool,
    pub is_selected: bool,
    pub is_disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_override: Option<Rgb>,
}

impl CalendarCell {
    pub fn style(&self) -> CellStyle {
        if self.is_selected {
            CellStyle::Selected
        } else if self.is_today {
            CellStyle::Today
        } else if self.is_disabled || self.color_override.is_some() {
            CellStyle::Special
        } else if self.month_relation != MonthRelation::Current {
            CellStyle::Dimmed
        } else {
            CellStyle::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecialDateRule {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    pub disabled: bool,
}

/// Colored or disabled days, keyed by day. Inserting a rule for a day that
/// already has one replaces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecialDates {
    rules: BTreeMap<NaiveDate, SpecialDateRule>,
}

impl SpecialDates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rule: SpecialDateRule) {
        self.rules.insert(rule.date, rule);
    }

    pub fn get(&self, date: NaiveDate) -> Option<&SpecialDateRule> {
        self.rules.get(&date)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Expand a range into per-day rules. Covers `start` up to but excluding
    /// `end`; a missing `end`, or one not after `start`, covers `start` only.
    /// Returns the number of days written.
    pub fn add_range(&mut self, range: &SpecialRange) -> usize {
        let end = range.end.filter(|end| *end > range.start);
        let mut written = 0;

        for date in range.start.iter_days() {
            if end.map_or(written > 0, |end| date >= end) {
                break;
            }
            self.insert(SpecialDateRule {
                date,
                color: range.color,
                disabled: range.disable,
            });
            written += 1;
        }

        written
    }
}

/// Host-supplied range of special days.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialRange {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    pub color: Option<Rgb>,
    pub disable: bool,
}

impl SpecialRange {
    /// Build a range from loosely formatted text. Returns `None` when the
    /// start date does not parse; an unparseable end is treated as absent.
    pub fn parse(start: &str, end: Option<&str>, color: Option<&str>, disable: bool) -> Option<Self> {
        let start = parse_date(start).ok()?;
        let end = end.and_then(|e| parse_date(e).ok());
        let color = color.and_then(|c| match c.parse::<Rgb>() {
            Ok(rgb) => Some(rgb),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        });

        Some(Self { start, end, color, disable })
    }
}

/// Result of a grid build: the 42 cells and the header label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarGrid {
    pub label: String,
    pub first_of_month: NaiveDate,
    pub cells: Vec<CalendarCell>,
}

impl CalendarGrid {
    pub fn rows(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(GRID_COLS)
    }

    pub fn position_of(&self, date: NaiveDate) -> Option<usize> {
        self.cells.iter().position(|c| c.date == date)
    }

    /// Plain text rendering in the style of `cal`: days outside the month
    /// are blank, today is marked with `*` and the selection with `<`.
    pub fn to_text(&self, day_names: &[String]) -> String {
        let width = GRID_COLS * 4;
        let mut out = format!("{:^width$}\n", self.label, width = width);

        for name in day_names {
            let short: String = name.chars().take(3).collect();
            out.push_str(&format!("{:>3} ", short));
        }
        out.truncate(out.trim_end().len());
        out.push('\n');

        for row in self.rows() {
            let mut line = String::new();
            for cell in row {
                if cell.month_relation != MonthRelation::Current {
                    line.push_str("    ");
                    continue;
                }
                let mark = if cell.is_selected {
                    '<'
                } else if cell.is_today {
                    '*'
                } else {
                    ' '
                };
                line.push_str(&format!("{:>3}{}", cell.day_of_month, mark));
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }

        out
    }
}

/// Build the 6×7 grid for the month containing `view_date`.
pub fn build_grid(
    view_date: NaiveDate,
    selected: NaiveDate,
    today: NaiveDate,
    week_start: Weekday,
    special: &SpecialDates,
    locale: &dyn Locale,
) -> CalendarGrid {
    let first = first_of_month(view_date);
    let start = grid_start(first, week_start);
    let target = (first.year(), first.month());

    let cells = start
        .iter_days()
        .take(GRID_CELLS)
        .map(|date| {
            let rule = special.get(date);
            let month_relation = match (date.year(), date.month()).cmp(&target) {
                std::cmp::Ordering::Less => MonthRelation::Prev,
                std::cmp::Ordering::Equal => MonthRelation::Current,
                std::cmp::Ordering::Greater => MonthRelation::Next,
            };

            CalendarCell {
                date,
                day_of_month: date.day(),
                epoch_day: epoch_day(date),
                month_relation,
                is_today: date == today,
                is_selected: date == selected,
                is_disabled: rule.is_some_and(|r| r.disabled),
                color_override: rule.and_then(|r| r.color),
            }
        })
        .collect();

    CalendarGrid {
        label: locale.format_month_year(first),
        first_of_month: first,
        cells,
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First visible day: the latest day on or before `first` that falls on
/// `week_start`. When `first` is itself on `week_start` the grid starts a
/// full week earlier, so row 0 always shows days of the previous month.
pub fn grid_start(first: NaiveDate, week_start: Weekday) -> NaiveDate {
    let back = (first.weekday().num_days_from_sunday() + 7 - week_start.num_days_from_sunday()) % 7;
    let back = if back == 0 { 7 } else { back };

    first.checked_sub_days(Days::new(back as u64)).unwrap_or(first)
}

pub fn epoch_day(date: NaiveDate) -> i64 {
    date.num_days_from_ce() as i64 - UNIX_EPOCH_DAYS_FROM_CE
}

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%a %b %d %Y",
    "%d %B %Y",
];

/// Parse a calendar day from the formats hosts commonly pass around,
/// including full RFC 3339 / RFC 2822 timestamps (time is dropped).
pub fn parse_date(text: &str) -> Result<NaiveDate, WidgetError> {
    let text = text.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(text)
                .or_else(|_| chrono::DateTime::parse_from_rfc2822(text))
                .ok()
                .map(|dt| dt.date_naive())
        })
        .ok_or_else(|| WidgetError::InvalidDate(text.to_string()))
}

/// [`parse_date`], substituting `fallback` for unparseable text.
pub fn parse_date_or(text: &str, fallback: NaiveDate) -> NaiveDate {
    match parse_date(text) {
        Ok(date) => date,
        Err(e) => {
            tracing::debug!("{}, using {}", e, fallback);
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::locale::FallbackLocale;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn grid(view: NaiveDate, week_start: Weekday) -> CalendarGrid {
        build_grid(
            view,
            ymd(2000, 1, 1),
            ymd(2000, 1, 2),
            week_start,
            &SpecialDates::new(),
            &FallbackLocale,
        )
    }

    #[test]
    fn test_february_2024_example() {
        let g = build_grid(
            ymd(2024, 2, 1),
            ymd(2024, 2, 14),
            ymd(2024, 2, 20),
            Weekday::Sun,
            &SpecialDates::new(),
            &FallbackLocale,
        );

        assert_eq!(g.cells.len(), 42);
        assert_eq!(g.cells[0].date, ymd(2024, 1, 28));
        assert_eq!(g.cells[6].date, ymd(2024, 2, 3));
        assert_eq!(g.label, "February 2024");

        let current = g
            .cells
            .iter()
            .filter(|c| c.month_relation == MonthRelation::Current)
            .count();
        assert_eq!(current, 29);

        let row0: Vec<u32> = g.rows().next().unwrap().iter().map(|c| c.day_of_month).collect();
        assert_eq!(row0, vec![28, 29, 30, 31, 1, 2, 3]);
    }

    #[test]
    fn test_every_grid_is_contiguous_and_aligned() {
        let starts = [Weekday::Sun, Weekday::Mon, Weekday::Wed, Weekday::Sat];
        for year in [1999, 2023, 2024, 2100] {
            for month in 1..=12 {
                for &ws in &starts {
                    let g = grid(ymd(year, month, 15), ws);
                    assert_eq!(g.cells.len(), GRID_CELLS);
                    assert_eq!(g.cells[0].date.weekday(), ws);
                    for pair in g.cells.windows(2) {
                        assert_eq!(pair[1].epoch_day, pair[0].epoch_day + 1);
                    }
                    // Lead days from the previous month are always shown
                    assert_eq!(g.cells[0].month_relation, MonthRelation::Prev);
                    assert_eq!(g.cells[41].month_relation, MonthRelation::Next);
                }
            }
        }
    }

    #[test]
    fn test_text_rendering_blanks_adjacent_months() {
        let g = build_grid(
            ymd(2024, 2, 1),
            ymd(2024, 2, 14),
            ymd(2024, 2, 20),
            Weekday::Sun,
            &SpecialDates::new(),
            &FallbackLocale,
        );
        let names: Vec<String> = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let text = g.to_text(&names);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0].trim(), "February 2024");
        assert_eq!(lines[1], "Sun Mon Tue Wed Thu Fri Sat");
        assert_eq!(lines[2], format!("{}  1   2   3", " ".repeat(16)));
        assert!(lines[4].contains(" 14<"));
        assert!(lines[5].contains(" 20*"));
    }

    #[test]
    fn test_first_on_week_start_shifts_back_a_week() {
        // 2023-10-01 is a Sunday
        let g = grid(ymd(2023, 10, 20), Weekday::Sun);
        assert_eq!(g.cells[0].date, ymd(2023, 9, 24));
        assert_eq!(g.cells[7].date, ymd(2023, 10, 1));

        // 2024-01-01 is a Monday
        let g = grid(ymd(2024, 1, 31), Weekday::Mon);
        assert_eq!(g.cells[0].date, ymd(2023, 12, 25));
    }

    #[test]
    fn test_monday_week_start() {
        let g = grid(ymd(2024, 2, 1), Weekday::Mon);
        assert_eq!(g.cells[0].date, ymd(2024, 1, 29));
        assert_eq!(g.cells[0].date.weekday(), Weekday::Mon);
    }

    #[test]
    fn test_builder_is_idempotent() {
        let mut special = SpecialDates::new();
        special.insert(SpecialDateRule {
            date: ymd(2024, 5, 9),
            color: Some(Rgb(1, 2, 3)),
            disabled: true,
        });
        let build = || {
            build_grid(
                ymd(2024, 5, 3),
                ymd(2024, 5, 9),
                ymd(2024, 5, 10),
                Weekday::Sun,
                &special,
                &FallbackLocale,
            )
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_flags_and_style_precedence() {
        let mut special = SpecialDates::new();
        for d in [9, 10, 11] {
            special.insert(SpecialDateRule {
                date: ymd(2024, 5, d),
                color: Some(Rgb(255, 0, 0)),
                disabled: d == 11,
            });
        }

        let g = build_grid(
            ymd(2024, 5, 1),
            ymd(2024, 5, 9),
            ymd(2024, 5, 10),
            Weekday::Sun,
            &special,
            &FallbackLocale,
        );
        let cell = |date| &g.cells[g.position_of(date).unwrap()];

        assert_eq!(cell(ymd(2024, 5, 9)).style(), CellStyle::Selected);
        assert_eq!(cell(ymd(2024, 5, 10)).style(), CellStyle::Today);
        assert_eq!(cell(ymd(2024, 5, 11)).style(), CellStyle::Special);
        assert!(cell(ymd(2024, 5, 11)).is_disabled);
        assert_eq!(cell(ymd(2024, 5, 12)).style(), CellStyle::Normal);
        assert_eq!(cell(ymd(2024, 4, 30)).style(), CellStyle::Dimmed);
        assert_eq!(cell(ymd(2024, 5, 12)).color_override, None);
    }

    #[test]
    fn test_selected_wins_over_today() {
        let day = ymd(2024, 5, 10);
        let g = build_grid(day, day, day, Weekday::Sun, &SpecialDates::new(), &FallbackLocale);
        let c = &g.cells[g.position_of(day).unwrap()];
        assert!(c.is_today && c.is_selected);
        assert_eq!(c.style(), CellStyle::Selected);
    }

    #[test]
    fn test_month_relation_across_year_boundary() {
        let g = grid(ymd(2024, 1, 5), Weekday::Sun);
        assert_eq!(g.cells[0].date.year(), 2023);
        assert_eq!(g.cells[0].month_relation, MonthRelation::Prev);

        let g = grid(ymd(2023, 12, 5), Weekday::Sun);
        let last = g.cells.last().unwrap();
        assert_eq!(last.date.year(), 2024);
        assert_eq!(last.month_relation, MonthRelation::Next);
    }

    #[test]
    fn test_epoch_day() {
        assert_eq!(epoch_day(ymd(1970, 1, 1)), 0);
        assert_eq!(epoch_day(ymd(1970, 1, 2)), 1);
        assert_eq!(epoch_day(ymd(1969, 12, 31)), -1);
        assert_eq!(epoch_day(ymd(2024, 2, 29)), 19782);
    }

    #[test]
    fn test_special_ranges() {
        let mut special = SpecialDates::new();
        let range = SpecialRange::parse("2024-03-01", Some("2024-03-04"), Some("#00ff00"), false).unwrap();
        assert_eq!(special.add_range(&range), 3);
        assert!(special.get(ymd(2024, 3, 3)).is_some());
        assert!(special.get(ymd(2024, 3, 4)).is_none());

        // Single day, later rule wins
        let single = SpecialRange::parse("March 02, 2024", None, None, true).unwrap();
        assert_eq!(special.add_range(&single), 1);
        let rule = special.get(ymd(2024, 3, 2)).unwrap();
        assert!(rule.disabled);
        assert_eq!(rule.color, None);
        assert_eq!(special.len(), 3);

        // End before start covers the start only
        let backwards = SpecialRange::parse("2024-06-10", Some("2024-06-01"), None, false).unwrap();
        assert_eq!(special.add_range(&backwards), 1);

        assert!(SpecialRange::parse("not a date", None, None, false).is_none());
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = ymd(2009, 6, 6);
        for text in [
            "2009-06-06",
            "2009/06/06",
            "06/06/2009",
            "June 06, 2009",
            "Jun 06, 2009",
            "Sat Jun 06 2009",
            "2009-06-06T23:10:00+00:00",
            "Sat, 06 Jun 2009 10:00:00 +0000",
        ] {
            assert_eq!(parse_date(text).unwrap(), expected, "format {:?}", text);
        }

        assert!(parse_date("someday").is_err());
        assert_eq!(parse_date_or("garbage", expected), expected);
    }
}
