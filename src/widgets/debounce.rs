//! Debounced query controller with stale-response rejection.
//!
//! Input events re-arm a deadline; the host's event loop calls
//! [`DebouncedQuery::poll`] on every tick and issues the returned
//! [`QueryRequest`]. Results come back through
//! [`DebouncedQuery::on_query_result`] and are applied only when their token
//! matches the outstanding session.

use std::fmt::Display;
use std::time::{Duration, Instant};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(200);
pub const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    Idle,
    PendingDebounce,
    AwaitingResponse,
}

/// A query the host should run. Echo `token` back with the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub token: u64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEvent {
    /// Hide the suggestion list.
    Cleared,
    SuggestionsReady(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct QuerySession {
    pub token: u64,
    pub search_text: String,
    pub issued_at: Instant,
}

#[derive(Debug)]
pub struct DebouncedQuery {
    delay: Duration,
    limit: usize,
    state: QueryState,
    pending_text: String,
    deadline: Option<Instant>,
    last_token: u64,
    outstanding: Option<QuerySession>,
}

impl Default for DebouncedQuery {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY, DEFAULT_LIMIT)
    }
}

impl DebouncedQuery {
    pub fn new(delay: Duration, limit: usize) -> Self {
        Self {
            delay,
            limit,
            state: QueryState::Idle,
            pending_text: String::new(),
            deadline: None,
            last_token: 0,
            outstanding: None,
        }
    }

    pub fn state(&self) -> QueryState {
        self.state
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
    }

    /// When the pending debounce fires, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn outstanding(&self) -> Option<&QuerySession> {
        self.outstanding.as_ref()
    }

    /// Handle an input change. Any pending timer is cancelled and any
    /// in-flight session invalidated. Empty text returns `Cleared`.
    pub fn on_input(&mut self, text: &str, now: Instant) -> Option<QueryEvent> {
        self.deadline = None;
        if let Some(session) = self.outstanding.take() {
            tracing::debug!("Invalidated query #{} ({:?})", session.token, session.search_text);
        }

        if text.is_empty() {
            self.pending_text.clear();
            self.state = QueryState::Idle;
            return Some(QueryEvent::Cleared);
        }

        self.pending_text = text.to_string();
        self.deadline = Some(now + self.delay);
        self.state = QueryState::PendingDebounce;
        None
    }

    /// Fire the debounce timer if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<QueryRequest> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }

        self.deadline = None;
        self.last_token += 1;
        let token = self.last_token;
        let text = std::mem::take(&mut self.pending_text);

        self.outstanding = Some(QuerySession {
            token,
            search_text: text.clone(),
            issued_at: now,
        });
        self.state = QueryState::AwaitingResponse;
        tracing::debug!("Issuing query #{} for {:?}", token, text);

        Some(QueryRequest { token, text })
    }

    /// Apply a query result. Results for any token but the outstanding one
    /// are dropped. A failed query counts as an empty result.
    pub fn on_query_result<E: Display>(
        &mut self,
        token: u64,
        result: Result<Vec<String>, E>,
    ) -> Option<QueryEvent> {
        let is_current = self.outstanding.as_ref().is_some_and(|s| s.token == token);
        if !is_current {
            tracing::debug!("Discarding stale response for query #{}", token);
            return None;
        }

        if let Some(session) = self.outstanding.take() {
            tracing::debug!(
                "Query #{} answered after {:?}",
                token,
                session.issued_at.elapsed()
            );
        }
        self.state = QueryState::Idle;

        let mut results = match result {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("Query #{} failed: {}", token, e);
                Vec::new()
            }
        };
        results.truncate(self.limit);

        if results.is_empty() {
            Some(QueryEvent::Cleared)
        } else {
            Some(QueryEvent::SuggestionsReady(results))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn ok(items: &[&str]) -> Result<Vec<String>, String> {
        Ok(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_burst_issues_single_query() {
        let t0 = Instant::now();
        let mut q = DebouncedQuery::new(ms(200), 50);

        assert_eq!(q.on_input("a", t0), None);
        assert_eq!(q.on_input("ab", t0 + ms(50)), None);
        assert_eq!(q.on_input("abc", t0 + ms(300)), None);
        assert_eq!(q.state(), QueryState::PendingDebounce);

        assert_eq!(q.poll(t0 + ms(499)), None);
        let req = q.poll(t0 + ms(500)).unwrap();
        assert_eq!(req.text, "abc");
        assert_eq!(q.state(), QueryState::AwaitingResponse);

        // Timer does not fire twice
        assert_eq!(q.poll(t0 + ms(900)), None);
    }

    #[test]
    fn test_pause_longer_than_delay_fires_between_bursts() {
        let t0 = Instant::now();
        let mut q = DebouncedQuery::new(ms(200), 50);

        q.on_input("a", t0);
        q.on_input("ab", t0 + ms(50));
        let first = q.poll(t0 + ms(260)).unwrap();
        assert_eq!(first.text, "ab");

        q.on_input("abc", t0 + ms(300));
        let second = q.poll(t0 + ms(500)).unwrap();
        assert_eq!(second.text, "abc");
        assert!(second.token > first.token);

        // The response to "ab" arrived after "abc" was typed
        assert_eq!(q.on_query_result(first.token, ok(&["abe"])), None);
        assert_eq!(
            q.on_query_result(second.token, ok(&["abcd"])),
            Some(QueryEvent::SuggestionsReady(vec!["abcd".to_string()]))
        );
    }

    #[test]
    fn test_late_response_is_discarded() {
        let t0 = Instant::now();
        let mut q = DebouncedQuery::new(ms(200), 50);

        q.on_input("abc", t0);
        let old = q.poll(t0 + ms(200)).unwrap();
        q.on_input("abcd", t0 + ms(250));
        let new = q.poll(t0 + ms(450)).unwrap();

        let shown = q.on_query_result(new.token, ok(&["abcde", "abcdf"]));
        assert_eq!(
            shown,
            Some(QueryEvent::SuggestionsReady(vec![
                "abcde".to_string(),
                "abcdf".to_string()
            ]))
        );
        assert_eq!(q.state(), QueryState::Idle);

        assert_eq!(q.on_query_result(old.token, ok(&["abc1"])), None);
        // A duplicate delivery of the applied token is stale as well
        assert_eq!(q.on_query_result(new.token, ok(&["x"])), None);
    }

    #[test]
    fn test_empty_input_clears_and_invalidates() {
        let t0 = Instant::now();
        let mut q = DebouncedQuery::new(ms(100), 50);

        q.on_input("x", t0);
        let req = q.poll(t0 + ms(100)).unwrap();
        assert_eq!(q.on_input("", t0 + ms(120)), Some(QueryEvent::Cleared));
        assert_eq!(q.state(), QueryState::Idle);
        assert!(q.outstanding().is_none());
        assert_eq!(q.on_query_result(req.token, ok(&["xyz"])), None);

        // Pending timers are cancelled as well
        q.on_input("y", t0 + ms(200));
        assert_eq!(q.on_input("", t0 + ms(250)), Some(QueryEvent::Cleared));
        assert_eq!(q.poll(t0 + ms(1000)), None);
    }

    #[test]
    fn test_input_while_awaiting_invalidates_token() {
        let t0 = Instant::now();
        let mut q = DebouncedQuery::new(ms(100), 50);

        q.on_input("ru", t0);
        let req = q.poll(t0 + ms(100)).unwrap();
        q.on_input("rus", t0 + ms(150));
        assert_eq!(q.state(), QueryState::PendingDebounce);
        assert_eq!(q.on_query_result(req.token, ok(&["rust"])), None);
        assert_eq!(q.state(), QueryState::PendingDebounce);
    }

    #[test]
    fn test_results_truncated_and_failures_clear() {
        let t0 = Instant::now();
        let mut q = DebouncedQuery::new(ms(10), 2);

        q.on_input("a", t0);
        let req = q.poll(t0 + ms(10)).unwrap();
        assert_eq!(
            q.on_query_result(req.token, ok(&["a1", "a2", "a3"])),
            Some(QueryEvent::SuggestionsReady(vec!["a1".to_string(), "a2".to_string()]))
        );

        q.on_input("b", t0 + ms(20));
        let req = q.poll(t0 + ms(30)).unwrap();
        assert_eq!(
            q.on_query_result(req.token, Err::<Vec<String>, _>("backend down")),
            Some(QueryEvent::Cleared)
        );

        q.on_input("c", t0 + ms(40));
        let req = q.poll(t0 + ms(50)).unwrap();
        assert_eq!(q.on_query_result(req.token, ok(&[])), Some(QueryEvent::Cleared));
    }

    #[test]
    fn test_tokens_increase_monotonically() {
        let t0 = Instant::now();
        let mut q = DebouncedQuery::default();
        let mut last = 0;
        for i in 0..5u64 {
            q.on_input("q", t0 + ms(i * 1000));
            let req = q.poll(t0 + ms(i * 1000 + 200)).unwrap();
            assert!(req.token > last);
            last = req.token;
        }
    }
}
