use std::collections::BTreeMap;

use anyhow::Context as _;
use chrono::Utc;

use crate::page::PageDescriptor;
use crate::rank;
use crate::store::KvStore;
use crate::summary::{SummaryRoot, TagSummary, prune, record};
use crate::visits::{VisitEntry, VisitLog};

pub const HISTORY_KEY: &str = "history.log";
pub const SUMMARY_KEY: &str = "history.summary";

const SECS_PER_DAY: i64 = 86_400;

/// Today as a day-index (days since the Unix epoch).
pub fn current_day() -> i64 {
    Utc::now().timestamp().div_euclid(SECS_PER_DAY)
}

/// The history engine: a recency-ordered visit log plus a ranked model of
/// the reader's topical interests, persisted through a [`KvStore`].
///
/// Every write is a load → transform → persist cycle over one document, so
/// each operation is atomic from the caller's point of view. Reads prune the
/// summary lazily against the current day, in memory only.
pub struct Tracker<S> {
    store: S,
}

impl<S: KvStore> Tracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record a page view in the visit log.
    pub fn log_history(&self, page: &PageDescriptor) -> anyhow::Result<()> {
        let mut log = self.load_log();
        log.touch(&page.page_id);

        let value = serde_json::to_string(&log).context("serialize visit log")?;
        self.store
            .write(HISTORY_KEY, &value)
            .context("persist visit log")?;
        Ok(())
    }

    /// True iff `page_id` has been logged at least twice and is still in the
    /// log.
    pub fn is_revisit(&self, page_id: &str) -> bool {
        self.load_log().is_revisit(page_id)
    }

    /// The current visit log, most-recently-visited first.
    pub fn history(&self) -> Vec<VisitEntry> {
        self.load_log().entries().to_vec()
    }

    /// Record a page view in the interest summary, dated today.
    pub fn log_summary(&self, page: &PageDescriptor) -> anyhow::Result<()> {
        self.log_summary_at(page, current_day())
    }

    /// Record a page view in the interest summary against an explicit
    /// reference day. Existing data points age forward before the new view
    /// lands; stale ones are pruned.
    pub fn log_summary_at(&self, page: &PageDescriptor, reference_day: i64) -> anyhow::Result<()> {
        let root = self
            .load_summary()
            .unwrap_or_else(|| SummaryRoot::new(reference_day));
        let root = record(root, page, reference_day);

        let value = serde_json::to_string(&root).context("serialize summary")?;
        self.store
            .write(SUMMARY_KEY, &value)
            .context("persist summary")?;
        Ok(())
    }

    /// The raw persisted summary, before any read-side pruning. Mainly for
    /// inspection.
    pub fn summary(&self) -> SummaryRoot {
        self.load_summary().unwrap_or_default()
    }

    /// All summarized tags, most popular first (see [`rank::popular`]).
    pub fn popular(&self) -> Vec<(String, TagSummary)> {
        rank::popular(&self.pruned_summary())
    }

    /// Log-event totals per series-shaped tag.
    pub fn series_summary(&self) -> BTreeMap<String, u32> {
        rank::series_summary(&self.pruned_summary())
    }

    /// The series with the most log events, if any.
    pub fn most_viewed_series(&self) -> Option<String> {
        rank::most_viewed_series(&self.pruned_summary())
    }

    /// Drop both persisted documents, re-establishing empty state.
    pub fn reset(&self) -> anyhow::Result<()> {
        self.store.delete(HISTORY_KEY).context("clear visit log")?;
        self.store.delete(SUMMARY_KEY).context("clear summary")?;
        Ok(())
    }

    fn pruned_summary(&self) -> SummaryRoot {
        let root = self.load_summary().unwrap_or_default();
        prune(root, current_day())
    }

    // Missing or malformed persisted state reads as empty state, never a
    // fault.
    fn load_log(&self) -> VisitLog {
        let Some(raw) = self.read_lenient(HISTORY_KEY) else {
            return VisitLog::default();
        };
        match serde_json::from_str(&raw) {
            Ok(log) => log,
            Err(err) => {
                tracing::debug!(key = HISTORY_KEY, %err, "malformed visit log; starting empty");
                VisitLog::default()
            }
        }
    }

    fn load_summary(&self) -> Option<SummaryRoot> {
        let raw = self.read_lenient(SUMMARY_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(root) => Some(root),
            Err(err) => {
                tracing::debug!(key = SUMMARY_KEY, %err, "malformed summary; starting empty");
                None
            }
        }
    }

    fn read_lenient(&self, key: &str) -> Option<String> {
        match self.store.read(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(key, err = format!("{err:#}"), "store read failed; treating as empty");
                None
            }
        }
    }
}
