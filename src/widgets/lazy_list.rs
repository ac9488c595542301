//! Scrolling list that asks for more rows as the viewer nears the end.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug, Clone)]
pub struct LazyList {
    pub buffer: usize,
    pub batch_size: usize,
    /// `None` for no limit.
    pub max_count: Option<usize>,
    count: usize,
    fetching: bool,
}

impl Default for LazyList {
    fn default() -> Self {
        Self {
            buffer: 5,
            batch_size: 25,
            max_count: None,
            count: 0,
            fetching: false,
        }
    }
}

impl LazyList {
    /// List that stops fetching once `max` rows are loaded.
    pub fn with_max_count(max: usize) -> Self {
        Self {
            max_count: Some(max),
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    fn exhausted(&self) -> bool {
        self.max_count.is_some_and(|max| self.count >= max)
    }

    /// Called as row `index` is drawn. Returns the next batch to load when
    /// the row falls inside the buffer zone and no fetch is running.
    pub fn on_setup_item(&mut self, index: usize) -> Option<FetchRequest> {
        if self.fetching || self.exhausted() || index + self.buffer <= self.count {
            return None;
        }

        let mut limit = self.batch_size;
        if let Some(max) = self.max_count {
            limit = limit.min(max - self.count);
        }

        self.fetching = true;
        tracing::debug!("Requesting rows {}..{}", self.count, self.count + limit);
        Some(FetchRequest {
            offset: self.count,
            limit,
        })
    }

    /// Record a finished fetch of `loaded` rows. A short batch marks the end
    /// of the data.
    pub fn on_batch_loaded(&mut self, loaded: usize) {
        self.fetching = false;
        self.count += loaded;
        if let Some(max) = self.max_count {
            self.count = self.count.min(max);
        }
        if loaded < self.batch_size && self.max_count.is_none() {
            self.max_count = Some(self.count);
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.fetching = false;
    }
}
