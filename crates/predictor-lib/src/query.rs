//! Query acquisition
//!
//! Where a query record comes from is an injected dependency: a fixed literal,
//! an interactive prompt, or a programmatic caller building records directly.
//! The prediction path never knows which.

use crate::records::QueryRecord;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Default query evaluated when the caller supplies none
pub const DEFAULT_QUERY: QueryRecord = QueryRecord {
    year: 2013,
    month: 1,
    day: 1,
    store_id: 25,
    item_id: 103665,
};

/// A source of query records
pub trait QuerySource {
    /// Produce the next query, or `None` when the source is exhausted
    fn next_query(&mut self) -> Result<Option<QueryRecord>>;
}

/// Source that yields one fixed record, then ends
pub struct FixedQuery {
    record: Option<QueryRecord>,
}

impl FixedQuery {
    pub fn new(record: QueryRecord) -> Self {
        Self {
            record: Some(record),
        }
    }
}

impl Default for FixedQuery {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY)
    }
}

impl QuerySource for FixedQuery {
    fn next_query(&mut self) -> Result<Option<QueryRecord>> {
        Ok(self.record.take())
    }
}

/// Interactive source that prompts for each field
///
/// Generic over reader and writer so a test can drive it with cursors.
pub struct PromptSource<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptSource<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prompt for one field; `None` on end of input
    fn prompt_field(&mut self, label: &str) -> Result<Option<i64>> {
        write!(self.output, "{label}>").context("failed to write prompt")?;
        self.output.flush().context("failed to flush prompt")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let value = trimmed
            .parse::<i64>()
            .with_context(|| format!("{label} must be an integer, got {trimmed:?}"))?;
        Ok(Some(value))
    }
}

impl<R: BufRead, W: Write> QuerySource for PromptSource<R, W> {
    fn next_query(&mut self) -> Result<Option<QueryRecord>> {
        let Some(year) = self.prompt_field("year")? else {
            return Ok(None);
        };
        let Some(month) = self.prompt_field("month")? else {
            return Ok(None);
        };
        let Some(day) = self.prompt_field("date")? else {
            return Ok(None);
        };
        let Some(store_id) = self.prompt_field("store-id")? else {
            return Ok(None);
        };
        let Some(item_id) = self.prompt_field("item-id")? else {
            return Ok(None);
        };
        Ok(Some(QueryRecord::new(year, month, day, store_id, item_id)))
    }
}
