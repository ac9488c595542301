use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::suggest::{self, SuggestionSource};
use crate::util::color::Rgb;
use crate::widgets::autocomplete::{AutoComplete, AutoCompleteEvent};
use crate::widgets::calendar::SpecialRange;
use crate::widgets::date_picker::{DateEvent, DatePicker};
use crate::widgets::debounce::QueryRequest;
use crate::widgets::decimal::DecimalInput;
use crate::widgets::integer_picker::{IntegerEvent, IntegerPicker, IntegerPickerBar};
use crate::widgets::item::Item;
use crate::widgets::lazy_list::{FetchRequest, LazyList};
use crate::widgets::menu::{Menu, MenuEvent, MenuItem};
use crate::widgets::notification::{InlineNotification, NotificationKind};
use crate::widgets::progress::{ProgressDialog, ProgressEvent, ProgressUpdate};
use crate::widgets::time_picker::TimePicker;

/// How long a notification stays in the status line
const NOTIFICATION_SECONDS: u64 = 3;

/// Length of the simulated export shown in the progress dialog
const EXPORT_DURATION: Duration = Duration::from_secs(4);

/// Rows in the agenda list
const AGENDA_DAYS: usize = 180;

const SPECIAL_COLOR: Rgb = Rgb(203, 166, 247);

type QueryResult = (u64, Result<Vec<String>, String>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Calendar,
    AutoComplete,
    Decimal,
    Time,
    Integer,
    Agenda,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Calendar,
        Section::AutoComplete,
        Section::Decimal,
        Section::Time,
        Section::Integer,
        Section::Agenda,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Calendar => "Calendar",
            Section::AutoComplete => "Autocomplete",
            Section::Decimal => "Decimal",
            Section::Time => "Time",
            Section::Integer => "Integer",
            Section::Agenda => "Agenda",
        }
    }

    fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
    Progress,
    Menu,
}

/// Actions offered by the calendar's context menu
const MENU_TODAY: usize = 0;
const MENU_MARK: usize = 1;
const MENU_DISABLE: usize = 2;
const MENU_CLEAR: usize = 3;

pub struct App {
    pub section: Section,
    pub popup: Popup,
    pub config: AppConfig,

    // Widgets
    pub date_picker: DatePicker,
    pub autocomplete: AutoComplete,
    pub decimal: DecimalInput,
    pub time_picker: TimePicker,
    pub integer_bar: IntegerPickerBar,
    pub menu: Menu,
    pub progress: ProgressDialog,

    // Agenda list, filled in batches
    pub agenda: LazyList,
    pub agenda_rows: Vec<String>,
    pub agenda_selected: usize,
    pub agenda_item: Item,
    pending_fetch: Option<FetchRequest>,

    // Status line (auto-clears after timeout)
    pub notification: Option<InlineNotification>,
    notification_time: Option<Instant>,

    // Suggestion queries run on the tokio blocking pool
    source: Arc<dyn SuggestionSource>,
    query_timeout: Duration,
    query_tx: mpsc::UnboundedSender<QueryResult>,
    query_rx: mpsc::UnboundedReceiver<QueryResult>,

    export_started: Option<Instant>,

    /// Terminal area, updated by the event loop before mouse handling
    pub viewport: Rect,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let today = Local::now().date_naive();
        Self::with_today(config, today)
    }

    pub fn with_today(config: AppConfig, today: NaiveDate) -> Result<Self> {
        let source = suggest::from_config(&config.autocomplete)?;
        tracing::info!("Using suggestion source: {}", source.name());
        let (query_tx, query_rx) = mpsc::unbounded_channel();

        let now = Local::now().time();
        let mut integer_bar =
            IntegerPickerBar::new(IntegerPicker::from_config(&config.integer_picker));
        integer_bar.label = "Reminders per day".to_string();
        integer_bar.set_sublabel("x toggles the picker on and off");

        let agenda = LazyList::with_max_count(AGENDA_DAYS);

        let mut app = Self {
            section: Section::Calendar,
            popup: Popup::None,

            date_picker: DatePicker::from_config(&config.date_picker, today),
            autocomplete: AutoComplete::from_config(&config.autocomplete),
            decimal: DecimalInput::from_config(&config.decimal),
            time_picker: TimePicker::new(now, &config.time_picker),
            integer_bar,
            menu: Menu::new(vec![
                MenuItem::new("Go to today").with_icon("◉"),
                MenuItem::new("Mark day").with_icon("★"),
                MenuItem::new("Disable day").with_icon("✗"),
                MenuItem::new("Clear marks"),
            ]),
            progress: ProgressDialog::from_config(&config.progress),

            agenda,
            agenda_rows: Vec::new(),
            agenda_selected: 0,
            agenda_item: Item::default(),
            pending_fetch: None,

            notification: None,
            notification_time: None,

            source,
            query_timeout: Duration::from_millis(config.autocomplete.query_timeout_ms),
            query_tx,
            query_rx,

            export_started: None,
            viewport: Rect::default(),

            config,
        };

        app.pending_fetch = app.agenda.on_setup_item(0);
        Ok(app)
    }

    /// Sections that take free text, where letter keys are not shortcuts
    pub fn is_typing(&self) -> bool {
        matches!(self.section, Section::AutoComplete | Section::Decimal)
    }

    /// Show a notification in the status line
    fn notify(&mut self, note: InlineNotification) {
        tracing::debug!("{}: {}", note.kind, note.content);
        self.notification = Some(note);
        self.notification_time = Some(Instant::now());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        self.handle_key_at(key, Instant::now())
    }

    pub fn handle_key_at(&mut self, key: KeyEvent, now: Instant) -> Result<()> {
        // Handle popups first
        if self.popup != Popup::None {
            return self.handle_popup_key(key);
        }

        match key.code {
            KeyCode::Tab => {
                self.leave_section();
                self.section = self.section.next();
                return Ok(());
            }
            KeyCode::BackTab => {
                self.leave_section();
                self.section = self.section.prev();
                return Ok(());
            }
            KeyCode::F(1) => {
                self.popup = Popup::Help;
                return Ok(());
            }
            KeyCode::Char('?') if !self.is_typing() => {
                self.popup = Popup::Help;
                return Ok(());
            }
            KeyCode::Char('p') if !self.is_typing() => {
                self.start_export();
                return Ok(());
            }
            _ => {}
        }

        match self.section {
            Section::Calendar => self.handle_calendar_key(key),
            Section::AutoComplete => self.handle_autocomplete_key(key, now),
            Section::Decimal => self.handle_decimal_key(key),
            Section::Time => self.handle_time_key(key),
            Section::Integer => self.handle_integer_key(key),
            Section::Agenda => self.handle_agenda_key(key, now),
        }
        Ok(())
    }

    /// Finish edits that commit on blur
    fn leave_section(&mut self) {
        match self.section {
            Section::Decimal => {
                self.decimal.commit();
            }
            Section::AutoComplete => self.autocomplete.hide_menu(),
            _ => {}
        }
    }

    fn handle_popup_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter | KeyCode::F(1)
                ) {
                    self.popup = Popup::None;
                }
            }
            Popup::Progress => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('c')) {
                    if let Some(ProgressEvent::Cancelled) = self.progress.cancel() {
                        self.export_started = None;
                        self.popup = Popup::None;
                        self.notify(InlineNotification::new(
                            NotificationKind::Warning,
                            "Export cancelled",
                        ));
                    }
                }
            }
            Popup::Menu => match key.code {
                KeyCode::Down | KeyCode::Char('j') => self.menu.highlight_next(),
                KeyCode::Up | KeyCode::Char('k') => self.menu.highlight_prev(),
                KeyCode::Enter | KeyCode::Char(' ') => {
                    let event = self.menu.select();
                    self.apply_menu_event(event);
                }
                KeyCode::Esc => {
                    let event = self.menu.hide();
                    self.apply_menu_event(event);
                }
                _ => {}
            },
            Popup::None => {}
        }
        Ok(())
    }

    fn handle_calendar_key(&mut self, key: KeyEvent) {
        let event = match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.date_picker.move_cursor(-1, 0);
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.date_picker.move_cursor(1, 0);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.date_picker.move_cursor(0, -1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.date_picker.move_cursor(0, 1);
                None
            }
            KeyCode::PageUp | KeyCode::Char('[') => {
                self.date_picker.month_back();
                None
            }
            KeyCode::PageDown | KeyCode::Char(']') => {
                self.date_picker.month_forward();
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.date_picker.select_cursor(),
            KeyCode::Char('t') => Some(self.date_picker.reset_date()),
            KeyCode::Char('m') => {
                let (x, y) = (self.viewport.width / 3, self.viewport.height / 3);
                self.open_menu(x, y);
                None
            }
            _ => None,
        };

        if let Some(DateEvent::Selected(date)) = event {
            self.notify(InlineNotification::info(format!(
                "Selected {}",
                date.format("%A, %B %-d %Y")
            )));
        }
    }

    fn handle_autocomplete_key(&mut self, key: KeyEvent, now: Instant) {
        let event = match key.code {
            KeyCode::Char(c) => self.autocomplete.insert_char(c, now),
            KeyCode::Backspace => self.autocomplete.backspace(now),
            KeyCode::Down => {
                self.autocomplete.highlight_next();
                None
            }
            KeyCode::Up => {
                self.autocomplete.highlight_prev();
                None
            }
            KeyCode::Enter => self.autocomplete.select_suggestion(),
            KeyCode::Esc => {
                self.autocomplete.hide_menu();
                None
            }
            _ => None,
        };

        if let Some(event) = event {
            self.apply_autocomplete_event(event);
        }
    }

    fn handle_decimal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => {
                if !self.decimal.push_char(c) {
                    self.notify(InlineNotification::new(
                        NotificationKind::Warning,
                        format!("'{}' is not allowed here", c),
                    ));
                }
            }
            KeyCode::Backspace => self.decimal.backspace(),
            KeyCode::Enter => {
                let value = self.decimal.commit();
                self.notify(InlineNotification::success(format!(
                    "Amount set to {:.*}",
                    self.decimal.precision() as usize,
                    value
                )));
            }
            _ => {}
        }
    }

    fn handle_time_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.time_picker.focus_prev(),
            KeyCode::Right | KeyCode::Char('l') => self.time_picker.focus_next(),
            KeyCode::Up | KeyCode::Char('k') => {
                self.time_picker.step(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.time_picker.step(-1);
            }
            KeyCode::Char('n') => {
                self.time_picker.set_value(Local::now().time());
            }
            _ => {}
        }
    }

    fn handle_integer_key(&mut self, key: KeyEvent) {
        let event = match key.code {
            KeyCode::Right | KeyCode::Up | KeyCode::Char('l') | KeyCode::Char('k') => {
                self.integer_bar.step_selection(1)
            }
            KeyCode::Left | KeyCode::Down | KeyCode::Char('h') | KeyCode::Char('j') => {
                self.integer_bar.step_selection(-1)
            }
            KeyCode::Char('x') => {
                let disabled = !self.integer_bar.is_disabled();
                self.integer_bar.set_disabled(disabled);
                None
            }
            _ => None,
        };

        if let Some(IntegerEvent::Changed(value)) = event {
            tracing::debug!("Integer picker changed to {}", value);
        }
    }

    fn handle_agenda_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if self.agenda_selected + 1 < self.agenda_rows.len() {
                    self.agenda_selected += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.agenda_selected = self.agenda_selected.saturating_sub(1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.agenda_item.tap(now);
            }
            _ => {}
        }

        if self.pending_fetch.is_none() {
            self.pending_fetch = self.agenda.on_setup_item(self.agenda_selected);
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Right) if self.popup == Popup::None => {
                if self.section == Section::Calendar {
                    self.open_menu(mouse.column, mouse.row);
                }
            }
            MouseEventKind::Down(MouseButton::Left) if self.popup == Popup::Menu => {
                let event = match self.menu.item_at(mouse.column, mouse.row) {
                    Some(idx) => self.menu.select_index(idx),
                    None => self.menu.hide(),
                };
                self.apply_menu_event(event);
            }
            _ => {}
        }
    }

    fn open_menu(&mut self, x: u16, y: u16) {
        self.menu.show_at(x, y, (1, 0), self.viewport);
        if self.menu.is_visible() {
            self.popup = Popup::Menu;
        }
    }

    fn apply_menu_event(&mut self, event: Option<MenuEvent>) {
        let Some(event) = event else {
            return;
        };
        self.popup = Popup::None;

        let MenuEvent::Selected { index, item } = event else {
            return;
        };
        let cursor = self.date_picker.cursor();
        let Some(date) = self.date_picker.grid().cells.get(cursor).map(|c| c.date) else {
            return;
        };

        match index {
            MENU_TODAY => {
                self.date_picker.reset_date();
            }
            MENU_MARK | MENU_DISABLE => {
                let range = SpecialRange {
                    start: date,
                    end: None,
                    color: Some(SPECIAL_COLOR),
                    disable: index == MENU_DISABLE,
                };
                self.date_picker.add_special_dates(&[range]);
            }
            MENU_CLEAR => self.date_picker.clear_special_dates(),
            _ => {}
        }
        self.notify(InlineNotification::info(format!("{}: {}", item.content, date)));
    }

    fn apply_autocomplete_event(&mut self, event: AutoCompleteEvent) {
        match event {
            AutoCompleteEvent::DataRequested(request) => self.dispatch_query(request),
            AutoCompleteEvent::ValueSelected(value) => {
                self.notify(InlineNotification::success(format!("Picked \"{}\"", value)));
            }
            AutoCompleteEvent::InputChanged(text) => {
                tracing::trace!("Autocomplete input settled on {:?}", text);
            }
            AutoCompleteEvent::Cleared | AutoCompleteEvent::SuggestionsReady => {}
        }
    }

    /// Run a query off the UI thread; the result comes back through the
    /// channel drained in `tick`
    fn dispatch_query(&self, request: QueryRequest) {
        let source = Arc::clone(&self.source);
        let tx = self.query_tx.clone();
        let limit = self.query_timeout;

        tokio::spawn(async move {
            let result = suggest::run_query(source, request.text, limit)
                .await
                .map_err(|e| format!("{:#}", e));
            // The receiver only goes away on shutdown
            let _ = tx.send((request.token, result));
        });
    }

    fn start_export(&mut self) {
        self.export_started = Some(Instant::now());
        self.progress.show(ProgressUpdate {
            title: Some("Exporting calendar".to_string()),
            message: Some(format!("Writing {}", self.date_picker.grid().label)),
            progress: Some(0.0),
            cancel_text: Some("Cancel (c)".to_string()),
            animate_progress: Some(true),
            show_stripes: Some(true),
            ..ProgressUpdate::default()
        });
        self.popup = Popup::Progress;
    }

    pub fn tick(&mut self) -> Result<()> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Result<()> {
        // Debounce timer
        for event in self.autocomplete.tick(now) {
            self.apply_autocomplete_event(event);
        }

        // Query results, stale ones are dropped by the widget
        while let Ok((token, result)) = self.query_rx.try_recv() {
            if let Some(event) = self.autocomplete.on_query_result(token, result) {
                self.apply_autocomplete_event(event);
            }
        }

        if let Some(request) = self.pending_fetch.take() {
            self.load_agenda(request);
        }

        if let Some(started) = self.export_started {
            let span = self.progress_span();
            let share = now.saturating_duration_since(started).as_secs_f64()
                / EXPORT_DURATION.as_secs_f64();
            self.progress.set_progress(self.config.progress.min + span * share.min(1.0));
            if share >= 1.0 && self.progress.fraction() >= 1.0 {
                self.export_started = None;
                self.progress.hide();
                self.popup = Popup::None;
                self.notify(InlineNotification::success("Export finished"));
            }
        }
        self.progress.tick();

        // Clear notification after a few seconds
        if let Some(time) = self.notification_time {
            if time.elapsed().as_secs() >= NOTIFICATION_SECONDS {
                self.notification = None;
                self.notification_time = None;
            }
        }

        Ok(())
    }

    fn progress_span(&self) -> f64 {
        self.config.progress.max - self.config.progress.min
    }

    fn load_agenda(&mut self, request: FetchRequest) {
        let today = self.date_picker.today();
        let rows: Vec<String> = (request.offset..request.offset + request.limit)
            .filter_map(|offset| today.checked_add_days(chrono::Days::new(offset as u64)))
            .map(|day| day.format("%a %d %b %Y").to_string())
            .collect();

        self.agenda.on_batch_loaded(rows.len());
        self.agenda_rows.extend(rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let mut config = AppConfig::default();
        config.autocomplete.delay_ms = 0;
        let today = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
        App::with_today(config, today).unwrap()
    }

    #[test]
    fn test_tab_cycles_sections() {
        let mut app = app();
        for expected in Section::ALL.iter().skip(1) {
            app.handle_key(key(KeyCode::Tab)).unwrap();
            assert_eq!(app.section, *expected);
        }
        app.handle_key(key(KeyCode::Tab)).unwrap();
        assert_eq!(app.section, Section::Calendar);
        app.handle_key(key(KeyCode::BackTab)).unwrap();
        assert_eq!(app.section, Section::Agenda);
    }

    #[test]
    fn test_calendar_select_notifies() {
        let mut app = app();
        app.handle_key(key(KeyCode::Right)).unwrap();
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.date_picker.value(), NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());
        let note = app.notification.as_ref().unwrap();
        assert_eq!(note.kind, NotificationKind::Info);
        assert!(note.content.contains("February 15 2024"));
    }

    #[test]
    fn test_menu_marks_cursor_day() {
        let mut app = app();
        app.viewport = Rect::new(0, 0, 80, 24);
        app.handle_key(key(KeyCode::Char('m'))).unwrap();
        assert_eq!(app.popup, Popup::Menu);

        app.handle_key(key(KeyCode::Down)).unwrap();
        app.handle_key(key(KeyCode::Down)).unwrap();
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.popup, Popup::None);

        let today = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
        let rule = app.date_picker.special_dates().get(today).unwrap();
        assert!(rule.disabled);
    }

    #[test]
    fn test_typing_does_not_trigger_shortcuts() {
        let mut app = app();
        app.section = Section::Decimal;
        app.handle_key(key(KeyCode::Char('p'))).unwrap();
        assert_eq!(app.popup, Popup::None);
        assert_eq!(app.notification.as_ref().unwrap().kind, NotificationKind::Warning);

        app.handle_key(key(KeyCode::Char('4'))).unwrap();
        app.handle_key(key(KeyCode::Tab)).unwrap();
        assert_eq!(app.decimal.text(), "4.00");
    }

    #[test]
    fn test_agenda_loads_in_batches() {
        let mut app = app();
        app.tick().unwrap();
        assert_eq!(app.agenda_rows.len(), 25);
        assert_eq!(app.agenda_rows[0], "Wed 14 Feb 2024");

        app.section = Section::Agenda;
        for _ in 0..21 {
            app.handle_key(key(KeyCode::Down)).unwrap();
        }
        app.tick().unwrap();
        assert_eq!(app.agenda_rows.len(), 50);
    }

    #[test]
    fn test_export_progress_and_cancel() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('p'))).unwrap();
        assert_eq!(app.popup, Popup::Progress);
        assert!(app.progress.is_visible());

        app.handle_key(key(KeyCode::Char('c'))).unwrap();
        assert_eq!(app.popup, Popup::None);
        assert!(!app.progress.is_visible());
    }

    #[test]
    fn test_export_finishes() {
        let mut app = app();
        let t0 = Instant::now();
        app.handle_key(key(KeyCode::Char('p'))).unwrap();
        for step in 0..40u64 {
            app.tick_at(t0 + EXPORT_DURATION + Duration::from_secs(1) + Duration::from_millis(step))
                .unwrap();
        }
        assert_eq!(app.popup, Popup::None);
        assert_eq!(app.notification.as_ref().unwrap().kind, NotificationKind::Success);
    }

    #[tokio::test]
    async fn test_autocomplete_round_trip() {
        let mut app = app();
        app.section = Section::AutoComplete;
        let t0 = Instant::now();
        for c in "birth".chars() {
            app.handle_key_at(key(KeyCode::Char(c)), t0).unwrap();
        }

        for _ in 0..100 {
            app.tick_at(Instant::now()).unwrap();
            if app.autocomplete.menu_visible() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(app.autocomplete.suggestions(), &["Birthday".to_string()]);

        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.autocomplete.input(), "Birthday");
        assert_eq!(app.notification.as_ref().unwrap().kind, NotificationKind::Success);
    }
}
