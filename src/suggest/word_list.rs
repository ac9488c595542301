use anyhow::{Context, Result};
use std::path::Path;

use super::SuggestionSource;

const BUILTIN_WORDS: &[&str] = &[
    "Anniversary",
    "Appointment",
    "Birthday",
    "Book club",
    "Breakfast",
    "Budget review",
    "Call Mom",
    "Coffee & donuts",
    "Dentist",
    "Dinner",
    "Doctor's appointment",
    "Groceries",
    "Gym",
    "Haircut",
    "Holiday",
    "Interview",
    "Lunch",
    "Meeting",
    "Movie night",
    "Oil change",
    "Pay rent",
    "Project deadline",
    "Rent",
    "Soccer practice",
    "Team standup",
    "Vacation",
    "Vet",
    "Weekly review",
    "Yoga",
];

/// Case-insensitive matcher over a fixed list: prefix matches first, then
/// matches anywhere in the word.
#[derive(Debug, Clone)]
pub struct WordListSource {
    words: Vec<String>,
}

impl WordListSource {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_WORDS.iter().map(|w| w.to_string()).collect())
    }

    /// One word per line; blank lines and `#` comments are skipped.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read word list {}", path.display()))?;

        let words: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(String::from)
            .collect();

        tracing::info!("Loaded {} words from {}", words.len(), path.display());
        Ok(Self::new(words))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl SuggestionSource for WordListSource {
    fn name(&self) -> &str {
        "word list"
    }

    fn query(&self, text: &str) -> Result<Vec<String>> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let (prefix, anywhere): (Vec<&String>, Vec<&String>) = self
            .words
            .iter()
            .filter(|w| w.to_lowercase().contains(&needle))
            .partition(|w| w.to_lowercase().starts_with(&needle));

        Ok(prefix.into_iter().chain(anywhere).cloned().collect())
    }
}
