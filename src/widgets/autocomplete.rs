//! Autocomplete input: an editable buffer, a [`DebouncedQuery`] and the
//! suggestion menu it feeds.

use std::fmt::Display;
use std::time::{Duration, Instant};

use crate::config::AutoCompleteConfig;
use crate::util::strings::dirty_suggestion;
use crate::widgets::debounce::{DebouncedQuery, QueryEvent, QueryRequest, QueryState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoCompleteEvent {
    /// Debounced input value, sent once per fired timer.
    InputChanged(String),
    /// Run this query and report back through `on_query_result`.
    DataRequested(QueryRequest),
    Cleared,
    SuggestionsReady,
    ValueSelected(String),
}

#[derive(Debug)]
pub struct AutoComplete {
    input: String,
    enabled: bool,
    allow_dirty: bool,
    query: DebouncedQuery,
    suggestions: Vec<String>,
    highlighted: usize,
    menu_visible: bool,
}

impl Default for AutoComplete {
    fn default() -> Self {
        Self::from_config(&AutoCompleteConfig::default())
    }
}

impl AutoComplete {
    pub fn from_config(config: &AutoCompleteConfig) -> Self {
        Self {
            input: String::new(),
            enabled: config.enabled,
            allow_dirty: config.allow_dirty,
            query: DebouncedQuery::new(Duration::from_millis(config.delay_ms), config.limit),
            suggestions: Vec::new(),
            highlighted: 0,
            menu_visible: false,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn menu_visible(&self) -> bool {
        self.menu_visible
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_loading(&self) -> bool {
        self.query.state() == QueryState::AwaitingResponse
    }

    /// Disabling hides the menu and stops reacting to input.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.hide_menu();
        }
    }

    pub fn set_allow_dirty(&mut self, allow_dirty: bool) {
        self.allow_dirty = allow_dirty;
    }

    pub fn insert_char(&mut self, c: char, now: Instant) -> Option<AutoCompleteEvent> {
        if !self.enabled {
            return None;
        }
        self.input.push(c);
        self.input_changed(now)
    }

    pub fn backspace(&mut self, now: Instant) -> Option<AutoCompleteEvent> {
        if !self.enabled || self.input.pop().is_none() {
            return None;
        }
        self.input_changed(now)
    }

    /// Replace the whole buffer, as a paste would.
    pub fn set_input(&mut self, text: &str, now: Instant) -> Option<AutoCompleteEvent> {
        if !self.enabled {
            return None;
        }
        self.input = text.to_string();
        self.input_changed(now)
    }

    fn input_changed(&mut self, now: Instant) -> Option<AutoCompleteEvent> {
        let event = self.query.on_input(&self.input, now)?;
        Some(self.apply(event))
    }

    /// Drive the debounce timer; call from the event loop tick.
    pub fn tick(&mut self, now: Instant) -> Vec<AutoCompleteEvent> {
        match self.query.poll(now) {
            Some(request) => vec![
                AutoCompleteEvent::InputChanged(request.text.clone()),
                AutoCompleteEvent::DataRequested(request),
            ],
            None => Vec::new(),
        }
    }

    pub fn on_query_result<E: Display>(
        &mut self,
        token: u64,
        result: Result<Vec<String>, E>,
    ) -> Option<AutoCompleteEvent> {
        let event = self.query.on_query_result(token, result)?;
        Some(self.apply(event))
    }

    fn apply(&mut self, event: QueryEvent) -> AutoCompleteEvent {
        match event {
            QueryEvent::Cleared => {
                self.hide_menu();
                AutoCompleteEvent::Cleared
            }
            QueryEvent::SuggestionsReady(items) => {
                self.suggestions = items;
                self.highlighted = 0;
                self.menu_visible = true;
                AutoCompleteEvent::SuggestionsReady
            }
        }
    }

    pub fn highlight_next(&mut self) {
        if !self.suggestions.is_empty() {
            self.highlighted = (self.highlighted + 1) % self.suggestions.len();
        }
    }

    pub fn highlight_prev(&mut self) {
        if !self.suggestions.is_empty() {
            self.highlighted = self
                .highlighted
                .checked_sub(1)
                .unwrap_or(self.suggestions.len() - 1);
        }
    }

    /// Write the highlighted suggestion into the input. With `allow_dirty`
    /// entities are decoded to raw characters; without it the suggestion is
    /// copied as is.
    pub fn select_suggestion(&mut self) -> Option<AutoCompleteEvent> {
        if !self.menu_visible {
            return None;
        }
        let chosen = self.suggestions.get(self.highlighted)?.clone();
        self.select_value(&chosen)
    }

    pub fn select_value(&mut self, chosen: &str) -> Option<AutoCompleteEvent> {
        if !chosen.is_empty() {
            self.input = if self.allow_dirty {
                dirty_suggestion(chosen)
            } else {
                chosen.to_string()
            };
        }
        self.hide_menu();
        Some(AutoCompleteEvent::ValueSelected(self.input.clone()))
    }

    pub fn hide_menu(&mut self) {
        self.menu_visible = false;
        self.suggestions.clear();
        self.highlighted = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(delay_ms: u64) -> AutoComplete {
        AutoComplete::from_config(&AutoCompleteConfig {
            delay_ms,
            ..AutoCompleteConfig::default()
        })
    }

    fn ok(items: &[&str]) -> Result<Vec<String>, String> {
        Ok(items.iter().map(|s| s.to_string()).collect())
    }

    fn requested(events: &[AutoCompleteEvent]) -> QueryRequest {
        events
            .iter()
            .find_map(|e| match e {
                AutoCompleteEvent::DataRequested(r) => Some(r.clone()),
                _ => None,
            })
            .expect("no query issued")
    }

    #[test]
    fn test_typing_issues_debounced_query() {
        let t0 = Instant::now();
        let mut ac = widget(200);
        ac.insert_char('r', t0);
        ac.insert_char('u', t0 + Duration::from_millis(20));
        assert!(ac.tick(t0 + Duration::from_millis(100)).is_empty());

        let events = ac.tick(t0 + Duration::from_millis(220));
        assert_eq!(events[0], AutoCompleteEvent::InputChanged("ru".to_string()));
        let req = requested(&events);
        assert!(ac.is_loading());

        let event = ac.on_query_result(req.token, ok(&["rust", "ruby"]));
        assert_eq!(event, Some(AutoCompleteEvent::SuggestionsReady));
        assert!(ac.menu_visible());
        assert_eq!(ac.suggestions(), &["rust".to_string(), "ruby".to_string()]);
    }

    #[test]
    fn test_backspace_to_empty_clears() {
        let t0 = Instant::now();
        let mut ac = widget(50);
        ac.insert_char('a', t0);
        let req = requested(&ac.tick(t0 + Duration::from_millis(50)));
        ac.on_query_result(req.token, ok(&["apple"]));
        assert!(ac.menu_visible());

        assert_eq!(ac.backspace(t0 + Duration::from_millis(60)), Some(AutoCompleteEvent::Cleared));
        assert!(!ac.menu_visible());
        assert_eq!(ac.backspace(t0 + Duration::from_millis(70)), None);
    }

    #[test]
    fn test_select_suggestion_unescapes_when_dirty_allowed() {
        let t0 = Instant::now();
        let mut ac = widget(10);
        ac.set_input("tom", t0);
        let req = requested(&ac.tick(t0 + Duration::from_millis(10)));
        ac.on_query_result(req.token, ok(&["Tom&rsquo;s&nbsp;Diner", "Tomato"]));

        ac.highlight_next();
        ac.highlight_prev();
        let event = ac.select_suggestion();
        assert_eq!(event, Some(AutoCompleteEvent::ValueSelected("Tom's Diner".to_string())));
        assert_eq!(ac.input(), "Tom's Diner");
        assert!(!ac.menu_visible());
    }

    #[test]
    fn test_select_suggestion_kept_verbatim_when_dirty_disallowed() {
        let mut ac = widget(10);
        ac.set_allow_dirty(false);
        let event = ac.select_value("Tom&rsquo;s Diner");
        assert_eq!(
            event,
            Some(AutoCompleteEvent::ValueSelected("Tom&rsquo;s Diner".to_string()))
        );
        ac.select_value("R&D <team>");
        assert_eq!(ac.input(), "R&D <team>");
    }

    #[test]
    fn test_disabled_ignores_input() {
        let t0 = Instant::now();
        let mut ac = widget(10);
        ac.set_enabled(false);
        assert_eq!(ac.insert_char('x', t0), None);
        assert_eq!(ac.input(), "");
        assert!(ac.tick(t0 + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_highlight_wraps() {
        let t0 = Instant::now();
        let mut ac = widget(10);
        ac.set_input("a", t0);
        let req = requested(&ac.tick(t0 + Duration::from_millis(10)));
        ac.on_query_result(req.token, ok(&["a1", "a2", "a3"]));

        ac.highlight_prev();
        assert_eq!(ac.highlighted(), 2);
        ac.highlight_next();
        assert_eq!(ac.highlighted(), 0);
    }
}
