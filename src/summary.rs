use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::page::{PageDescriptor, extract_tags};

/// Rolling interest window: data points older than this many days are
/// discarded.
pub const RETENTION_DAYS: i64 = 90;

/// Visits for one tag on one day: `(age in days, count)`, serialized as a
/// two-element JSON array. Age 0 is the summary's reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPoint(pub i64, pub u32);

impl DataPoint {
    pub fn age_days(&self) -> i64 {
        self.0
    }

    pub fn count(&self) -> u32 {
        self.1
    }
}

/// Per-tag aggregate: `(display name, data points, last-update stamp)`,
/// serialized as a three-element JSON array.
///
/// `points` stays ordered by ascending age with at most one point per
/// distinct age. The stamp is the value of the root's sequence counter at
/// this tag's most recent update; the popularity ranking uses it to break
/// ties, so it must survive serialization round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSummary(pub String, pub Vec<DataPoint>, pub u64);

impl TagSummary {
    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.1
    }

    pub fn last_update_seq(&self) -> u64 {
        self.2
    }

    /// Total visits across all of this tag's data points.
    pub fn total(&self) -> u32 {
        self.1.iter().map(|p| p.1).sum()
    }
}

/// The persisted interest summary.
///
/// `period_end` is the day-index every point's age is relative to; it only
/// moves forward. `last_seq` is the highest update stamp issued so far.
/// `tags` is a `BTreeMap` so serialization and iteration order are
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRoot {
    pub period_end: i64,
    #[serde(default)]
    pub last_seq: u64,
    pub tags: BTreeMap<String, TagSummary>,
}

impl SummaryRoot {
    pub fn new(period_end: i64) -> Self {
        Self {
            period_end,
            last_seq: 0,
            tags: BTreeMap::new(),
        }
    }
}

/// Rebase every data point's age against `current_day`.
///
/// A summary whose `period_end` already is `current_day` (or later) passes
/// through unchanged; ages only ever move forward.
pub fn age(mut root: SummaryRoot, current_day: i64) -> SummaryRoot {
    let delta = current_day - root.period_end;
    if delta <= 0 {
        return root;
    }

    root.period_end = current_day;
    for tag in root.tags.values_mut() {
        for point in &mut tag.1 {
            point.0 += delta;
        }
    }
    root
}

/// [`age`], then drop data points older than [`RETENTION_DAYS`] and tags
/// left with no points at all.
pub fn prune(root: SummaryRoot, current_day: i64) -> SummaryRoot {
    let mut root = age(root, current_day);
    root.tags.retain(|_, tag| {
        tag.1.retain(|point| point.0 <= RETENTION_DAYS);
        !tag.1.is_empty()
    });
    root
}

/// Fold one page view into the summary.
///
/// The summary is first aged and pruned against `reference_day`; each tag
/// extracted from the page then gets a fresh update stamp and its age-0
/// point incremented (created at the head of the point list if the tag was
/// not seen today).
pub fn record(root: SummaryRoot, page: &PageDescriptor, reference_day: i64) -> SummaryRoot {
    let mut root = prune(root, reference_day);

    for tag in extract_tags(page) {
        root.last_seq += 1;
        let seq = root.last_seq;

        let summary = root
            .tags
            .entry(tag.id)
            .or_insert_with(|| TagSummary(tag.name, Vec::new(), 0));
        summary.2 = seq;

        match summary.1.iter_mut().find(|point| point.0 == 0) {
            Some(point) => point.1 += 1,
            None => summary.1.insert(0, DataPoint(0, 1)),
        }
    }

    root
}
