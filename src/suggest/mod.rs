//! Back ends that answer autocomplete queries.

pub mod command;
pub mod word_list;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::AutoCompleteConfig;

pub use command::CommandSource;
pub use word_list::WordListSource;

/// Looks up suggestions for a search text. Implementations may block; the
/// caller runs them off the UI thread.
pub trait SuggestionSource: Send + Sync {
    fn name(&self) -> &str;

    fn query(&self, text: &str) -> Result<Vec<String>>;
}

/// Pick the source named by the config: a command, a word list file, or the
/// built-in word list.
pub fn from_config(config: &AutoCompleteConfig) -> Result<Arc<dyn SuggestionSource>> {
    if let Some(command) = config.command.as_deref() {
        return Ok(Arc::new(CommandSource::parse(command)?));
    }

    if let Some(path) = &config.word_list {
        match WordListSource::from_file(path) {
            Ok(source) => return Ok(Arc::new(source)),
            Err(e) => tracing::warn!("Falling back to built-in word list: {:#}", e),
        }
    }

    Ok(Arc::new(WordListSource::builtin()))
}

/// Run a query on a blocking task, giving up after `limit`.
pub async fn run_query(
    source: Arc<dyn SuggestionSource>,
    text: String,
    limit: Duration,
) -> Result<Vec<String>> {
    let name = source.name().to_string();
    let result = timeout(
        limit,
        tokio::task::spawn_blocking(move || source.query(&text)),
    )
    .await;

    match result {
        Ok(Ok(results)) => results,
        Ok(Err(e)) => anyhow::bail!("Query task failed: {}", e),
        Err(_) => anyhow::bail!("{} did not answer within {:?}", name, limit),
    }
}
