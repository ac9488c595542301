//! Date picker: selection and view month state over a [`CalendarGrid`].
//!
//! Every setter ends in [`DatePicker::refresh`], which rebuilds the grid from
//! scratch.

use chrono::{Datelike, Months, NaiveDate, Weekday};

use crate::config::DatePickerConfig;
use crate::widgets::calendar::{
    build_grid, first_of_month, parse_date_or, CalendarGrid, SpecialDates, SpecialRange,
    GRID_CELLS, GRID_COLS,
};
use crate::widgets::locale::{weekday_from_index, ConfiguredLocale, FallbackLocale, Locale};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateEvent {
    Selected(NaiveDate),
}

pub struct DatePicker {
    value: NaiveDate,
    view_date: NaiveDate,
    today: NaiveDate,
    week_start: Weekday,
    special_dates: SpecialDates,
    locale: Box<dyn Locale>,
    grid: CalendarGrid,
    cursor: usize,
}

impl DatePicker {
    pub fn new(today: NaiveDate) -> Self {
        Self::with_locale(today, Box::new(FallbackLocale))
    }

    /// Week start comes from the locale.
    pub fn with_locale(today: NaiveDate, locale: Box<dyn Locale>) -> Self {
        let week_start = locale.first_day_of_week();
        let mut picker = Self {
            value: today,
            view_date: first_of_month(today),
            today,
            week_start,
            special_dates: SpecialDates::new(),
            locale,
            grid: CalendarGrid {
                label: String::new(),
                first_of_month: today,
                cells: Vec::new(),
            },
            cursor: 0,
        };
        picker.refresh();
        picker
    }

    pub fn from_config(config: &DatePickerConfig, today: NaiveDate) -> Self {
        let week_start = config.week_start_day.map(weekday_from_index).unwrap_or(Weekday::Sun);
        let mut locale = ConfiguredLocale::new(week_start);
        if let Some(fmt) = &config.month_format {
            locale = locale.with_month_format(fmt);
        }
        if let Some(names) = &config.day_names {
            locale = locale.with_day_names(names);
        }
        if let Some(names) = &config.month_names {
            locale = locale.with_month_names(names);
        }
        Self::with_locale(today, Box::new(locale))
    }

    pub fn value(&self) -> NaiveDate {
        self.value
    }

    pub fn view_date(&self) -> NaiveDate {
        self.view_date
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn grid(&self) -> &CalendarGrid {
        &self.grid
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn special_dates(&self) -> &SpecialDates {
        &self.special_dates
    }

    /// Weekday header labels, starting at the week start.
    pub fn day_names(&self) -> Vec<String> {
        let mut day = self.week_start;
        (0..GRID_COLS)
            .map(|_| {
                let name = self.locale.day_name(day).into_owned();
                day = day.succ();
                name
            })
            .collect()
    }

    /// Select `date` and show its month.
    pub fn set_value(&mut self, date: NaiveDate) {
        self.value = date;
        self.view_date = first_of_month(date);
        self.refresh();
    }

    /// Like [`set_value`](Self::set_value); unparseable text selects today.
    pub fn set_value_str(&mut self, text: &str) {
        let date = parse_date_or(text, self.today);
        self.set_value(date);
    }

    pub fn set_view_date(&mut self, date: NaiveDate) {
        self.view_date = first_of_month(date);
        self.refresh();
    }

    pub fn set_view_date_str(&mut self, text: &str) {
        let date = parse_date_or(text, self.today);
        self.set_view_date(date);
    }

    pub fn set_week_start(&mut self, week_start: Weekday) {
        self.week_start = week_start;
        self.refresh();
    }

    /// Update the notion of "today", e.g. after midnight.
    pub fn set_today(&mut self, today: NaiveDate) {
        if self.today != today {
            self.today = today;
            self.refresh();
        }
    }

    pub fn month_back(&mut self) {
        self.view_date = self
            .view_date
            .checked_sub_months(Months::new(1))
            .unwrap_or(self.view_date);
        self.refresh();
    }

    pub fn month_forward(&mut self) {
        self.view_date = self
            .view_date
            .checked_add_months(Months::new(1))
            .unwrap_or(self.view_date);
        self.refresh();
    }

    /// Jump back to today and select it.
    pub fn reset_date(&mut self) -> DateEvent {
        self.value = self.today;
        self.view_date = first_of_month(self.today);
        self.refresh();
        DateEvent::Selected(self.value)
    }

    /// Pick the day shown in grid cell `index`. Disabled days are ignored.
    pub fn select_cell(&mut self, index: usize) -> Option<DateEvent> {
        let cell = self.grid.cells.get(index)?;
        if cell.is_disabled {
            tracing::debug!("Ignoring selection of disabled day {}", cell.date);
            return None;
        }

        let date = cell.date;
        self.value = date;
        if (date.year(), date.month()) != (self.view_date.year(), self.view_date.month()) {
            self.view_date = first_of_month(date);
        }
        self.refresh();
        Some(DateEvent::Selected(date))
    }

    pub fn select_cursor(&mut self) -> Option<DateEvent> {
        self.select_cell(self.cursor)
    }

    /// Move the keyboard cursor. Leaving the grid pages to the adjacent
    /// month and keeps the cursor on the same date.
    pub fn move_cursor(&mut self, dx: i64, dy: i64) {
        let Some(current) = self.grid.cells.get(self.cursor).map(|c| c.date) else {
            return;
        };
        let offset = dx + dy * GRID_COLS as i64;
        let target = if offset >= 0 {
            current.checked_add_days(chrono::Days::new(offset as u64))
        } else {
            current.checked_sub_days(chrono::Days::new(offset.unsigned_abs()))
        };
        let Some(target) = target else {
            return;
        };

        if let Some(pos) = self.grid.position_of(target) {
            self.cursor = pos;
        } else {
            self.view_date = first_of_month(target);
            self.refresh();
            self.cursor = self.grid.position_of(target).unwrap_or(self.cursor);
        }
    }

    pub fn add_special_dates(&mut self, ranges: &[SpecialRange]) {
        let written: usize = ranges.iter().map(|r| self.special_dates.add_range(r)).sum();
        tracing::debug!("Added {} special days from {} ranges", written, ranges.len());
        self.refresh();
    }

    pub fn set_special_dates(&mut self, special: SpecialDates) {
        self.special_dates = special;
        self.refresh();
    }

    pub fn clear_special_dates(&mut self) {
        self.special_dates.clear();
        self.refresh();
    }

    /// Rebuild the grid. The cursor follows the selection when it is
    /// visible, otherwise it lands on the first day of the viewed month.
    pub fn refresh(&mut self) {
        self.grid = build_grid(
            self.view_date,
            self.value,
            self.today,
            self.week_start,
            &self.special_dates,
            self.locale.as_ref(),
        );

        let focus = self
            .grid
            .position_of(self.value)
            .filter(|&i| self.grid.cells[i].date.month() == self.view_date.month())
            .or_else(|| self.grid.position_of(self.grid.first_of_month));
        self.cursor = focus.unwrap_or(0).min(GRID_CELLS - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::color::Rgb;
    use crate::widgets::calendar::MonthRelation;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_shows_today() {
        let picker = DatePicker::new(ymd(2024, 2, 20));
        assert_eq!(picker.value(), ymd(2024, 2, 20));
        assert_eq!(picker.view_date(), ymd(2024, 2, 1));
        assert_eq!(picker.grid().label, "February 2024");
        assert_eq!(picker.grid().cells[picker.cursor()].date, ymd(2024, 2, 20));
    }

    #[test]
    fn test_constructor_grid_matches_builder() {
        let today = ymd(2023, 10, 1);
        let picker = DatePicker::new(today);
        let expected = build_grid(
            today,
            today,
            today,
            Weekday::Sun,
            &SpecialDates::new(),
            &FallbackLocale,
        );
        assert_eq!(picker.grid(), &expected);
        assert_eq!(picker.grid().cells.len(), GRID_CELLS);
    }

    #[test]
    fn test_month_navigation_clamps() {
        let mut picker = DatePicker::new(ymd(2024, 1, 31));
        picker.month_forward();
        assert_eq!(picker.view_date(), ymd(2024, 2, 1));
        assert_eq!(picker.grid().label, "February 2024");

        picker.month_back();
        picker.month_back();
        assert_eq!(picker.view_date(), ymd(2023, 12, 1));
        assert_eq!(picker.grid().label, "December 2023");
        // Navigation does not change the selection
        assert_eq!(picker.value(), ymd(2024, 1, 31));
    }

    #[test]
    fn test_reset_date() {
        let mut picker = DatePicker::new(ymd(2024, 5, 10));
        picker.set_value(ymd(2020, 1, 1));
        assert_eq!(picker.view_date(), ymd(2020, 1, 1));

        let event = picker.reset_date();
        assert_eq!(event, DateEvent::Selected(ymd(2024, 5, 10)));
        assert_eq!(picker.value(), ymd(2024, 5, 10));
        assert_eq!(picker.view_date(), ymd(2024, 5, 1));
    }

    #[test]
    fn test_invalid_text_falls_back_to_today() {
        let mut picker = DatePicker::new(ymd(2024, 5, 10));
        picker.set_value_str("2019-03-04");
        assert_eq!(picker.value(), ymd(2019, 3, 4));

        picker.set_value_str("the day after");
        assert_eq!(picker.value(), ymd(2024, 5, 10));

        picker.set_view_date_str("??");
        assert_eq!(picker.view_date(), ymd(2024, 5, 1));
    }

    #[test]
    fn test_select_cell_in_next_month_moves_view() {
        let mut picker = DatePicker::new(ymd(2024, 2, 20));
        let last = GRID_CELLS - 1;
        let cell = picker.grid().cells[last].clone();
        assert_eq!(cell.month_relation, MonthRelation::Next);

        let event = picker.select_cell(last);
        assert_eq!(event, Some(DateEvent::Selected(cell.date)));
        assert_eq!(picker.value(), cell.date);
        assert_eq!(picker.view_date(), ymd(2024, 3, 1));

        assert_eq!(picker.select_cell(99), None);
    }

    #[test]
    fn test_disabled_days_cannot_be_selected() {
        let mut picker = DatePicker::new(ymd(2024, 2, 20));
        picker.add_special_dates(&[SpecialRange {
            start: ymd(2024, 2, 5),
            end: None,
            color: Some(Rgb(200, 0, 0)),
            disable: true,
        }]);

        let idx = picker.grid().position_of(ymd(2024, 2, 5)).unwrap();
        assert!(picker.grid().cells[idx].is_disabled);
        assert_eq!(picker.select_cell(idx), None);
        assert_eq!(picker.value(), ymd(2024, 2, 20));

        picker.clear_special_dates();
        assert!(picker.select_cell(idx).is_some());
    }

    #[test]
    fn test_cursor_moves_across_months() {
        let mut picker = DatePicker::new(ymd(2024, 2, 29));
        picker.move_cursor(1, 0);
        // Mar 1 is still visible in the February grid
        assert_eq!(picker.grid().cells[picker.cursor()].date, ymd(2024, 3, 1));
        assert_eq!(picker.view_date(), ymd(2024, 2, 1));

        picker.move_cursor(0, 6);
        assert_eq!(picker.view_date(), ymd(2024, 4, 1));
        assert_eq!(picker.grid().cells[picker.cursor()].date, ymd(2024, 4, 12));

        let event = picker.select_cursor();
        assert_eq!(event, Some(DateEvent::Selected(ymd(2024, 4, 12))));
    }

    #[test]
    fn test_day_names_follow_week_start() {
        let mut picker = DatePicker::new(ymd(2024, 2, 20));
        assert_eq!(picker.day_names()[0], "Sun");

        picker.set_week_start(Weekday::Mon);
        let names = picker.day_names();
        assert_eq!(names[0], "Mon");
        assert_eq!(names[6], "Sun");
        assert_eq!(picker.grid().cells[0].date.weekday(), Weekday::Mon);
    }

    #[test]
    fn test_from_config() {
        let config = DatePickerConfig {
            week_start_day: Some(1),
            month_format: Some("%Y-%m".to_string()),
            day_names: None,
            month_names: None,
        };
        let picker = DatePicker::from_config(&config, ymd(2024, 7, 4));
        assert_eq!(picker.week_start(), Weekday::Mon);
        assert_eq!(picker.grid().label, "2024-07");
    }

    #[test]
    fn test_set_today_rerenders() {
        let mut picker = DatePicker::new(ymd(2024, 2, 20));
        picker.set_today(ymd(2024, 2, 21));
        let idx = picker.grid().position_of(ymd(2024, 2, 21)).unwrap();
        assert!(picker.grid().cells[idx].is_today);
    }
}
