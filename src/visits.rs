use serde::{Deserialize, Serialize};

/// Maximum number of pages kept in the recent-visit log.
pub const HISTORY_CAPACITY: usize = 50;

/// One visited page: `(page id, visit count)`.
///
/// Serialized as a two-element JSON array so the persisted log is a plain
/// list of `["/p/abc", 2]` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitEntry(pub String, pub u32);

impl VisitEntry {
    pub fn page_id(&self) -> &str {
        &self.0
    }

    pub fn visits(&self) -> u32 {
        self.1
    }
}

/// The recent-visit log: most-recently-touched first, unique by page id,
/// capped at [`HISTORY_CAPACITY`] entries.
///
/// This is a recency cache, not a frequency cache: eviction always drops the
/// least recently touched entry, regardless of its visit count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitLog(Vec<VisitEntry>);

impl VisitLog {
    /// Record a visit: bump-and-move-to-front for a known page id, insert at
    /// the front otherwise, then cap.
    pub fn touch(&mut self, page_id: &str) {
        match self.0.iter().position(|e| e.0 == page_id) {
            Some(idx) => {
                let mut entry = self.0.remove(idx);
                entry.1 += 1;
                self.0.insert(0, entry);
            }
            None => {
                self.0.insert(0, VisitEntry(page_id.to_owned(), 1));
            }
        }
        self.0.truncate(HISTORY_CAPACITY);
    }

    /// True iff `page_id` has been logged at least twice and is still in the
    /// log.
    pub fn is_revisit(&self, page_id: &str) -> bool {
        self.0.iter().any(|e| e.0 == page_id && e.1 >= 2)
    }

    pub fn entries(&self) -> &[VisitEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
