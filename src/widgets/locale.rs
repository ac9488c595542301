//! Day/month names and header formatting for the date picker.

use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, NaiveDate, Weekday};
use std::borrow::Cow;
use std::fmt::Write;

pub const SHORT_DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Supplies locale-specific labels to the calendar.
pub trait Locale: Send + Sync {
    /// Short weekday label.
    fn day_name(&self, day: Weekday) -> Cow<'_, str>;

    /// Month label, `month` in 1..=12.
    fn month_name(&self, month: u32) -> Cow<'_, str>;

    fn first_day_of_week(&self) -> Weekday;

    /// Header label for the month containing `date`.
    fn format_month_year(&self, date: NaiveDate) -> String {
        format!("{} {}", self.month_name(date.month()), date.year())
    }
}

/// Static English table, week starting on Sunday.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackLocale;

impl Locale for FallbackLocale {
    fn day_name(&self, day: Weekday) -> Cow<'_, str> {
        Cow::Borrowed(SHORT_DAY_NAMES[day.num_days_from_sunday() as usize])
    }

    fn month_name(&self, month: u32) -> Cow<'_, str> {
        Cow::Borrowed(month_name(month))
    }

    fn first_day_of_week(&self) -> Weekday {
        Weekday::Sun
    }
}

/// Locale built from user configuration: optional replacement names, a
/// week start, and a strftime pattern for the header.
#[derive(Debug, Clone)]
pub struct ConfiguredLocale {
    day_names: Option<[String; 7]>,
    month_names: Option<[String; 12]>,
    week_start: Weekday,
    month_format: Option<String>,
}

impl ConfiguredLocale {
    pub fn new(week_start: Weekday) -> Self {
        Self {
            day_names: None,
            month_names: None,
            week_start,
            month_format: None,
        }
    }

    /// Sunday-first day names. Lists of the wrong length are ignored.
    pub fn with_day_names(mut self, names: &[String]) -> Self {
        match <[String; 7]>::try_from(names.to_vec()) {
            Ok(names) => self.day_names = Some(names),
            Err(_) => tracing::warn!("Ignoring day name list with {} entries", names.len()),
        }
        self
    }

    pub fn with_month_names(mut self, names: &[String]) -> Self {
        match <[String; 12]>::try_from(names.to_vec()) {
            Ok(names) => self.month_names = Some(names),
            Err(_) => tracing::warn!("Ignoring month name list with {} entries", names.len()),
        }
        self
    }

    /// Header pattern such as `%B %Y`. Invalid patterns are ignored so the
    /// default label is used instead.
    pub fn with_month_format(mut self, pattern: &str) -> Self {
        let sample = NaiveDate::default();
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
            || format_date(sample, pattern).is_none()
        {
            tracing::warn!("Ignoring invalid month format {:?}", pattern);
        } else {
            self.month_format = Some(pattern.to_string());
        }
        self
    }
}

impl Locale for ConfiguredLocale {
    fn day_name(&self, day: Weekday) -> Cow<'_, str> {
        let idx = day.num_days_from_sunday() as usize;
        match &self.day_names {
            Some(names) => Cow::Borrowed(names[idx].as_str()),
            None => Cow::Borrowed(SHORT_DAY_NAMES[idx]),
        }
    }

    fn month_name(&self, month: u32) -> Cow<'_, str> {
        match &self.month_names {
            Some(names) if (1..=12).contains(&month) => {
                Cow::Borrowed(names[month as usize - 1].as_str())
            }
            _ => Cow::Borrowed(month_name(month)),
        }
    }

    fn first_day_of_week(&self) -> Weekday {
        self.week_start
    }

    fn format_month_year(&self, date: NaiveDate) -> String {
        // Custom month names take priority over the pattern, which would
        // otherwise print chrono's English names.
        match (&self.month_format, &self.month_names) {
            (Some(pattern), None) => format_date(date, pattern)
                .unwrap_or_else(|| format!("{} {}", self.month_name(date.month()), date.year())),
            _ => format!("{} {}", self.month_name(date.month()), date.year()),
        }
    }
}

/// `None` when the pattern asks for fields a plain date does not have,
/// such as `%H`.
fn format_date(date: NaiveDate, pattern: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(pattern)).ok()?;
    Some(out)
}

fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get((month as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("?")
}

/// Map 0=Sunday..6=Saturday to a weekday; larger values wrap.
pub fn weekday_from_index(index: u8) -> Weekday {
    match index % 7 {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}
