use std::collections::BTreeMap;

use crate::summary::{SummaryRoot, TagSummary};

/// All tags of a (pruned) summary, most popular first.
///
/// Primary key: total visit count, descending. Equal totals resolve
/// last-logged-wins: the tag with the higher update stamp ranks first, so
/// equally visited tags come back in LIFO order.
pub fn popular(root: &SummaryRoot) -> Vec<(String, TagSummary)> {
    let mut tags: Vec<(String, TagSummary)> = root
        .tags
        .iter()
        .map(|(id, tag)| (id.clone(), tag.clone()))
        .collect();

    tags.sort_by(|(_, a), (_, b)| {
        b.total()
            .cmp(&a.total())
            .then_with(|| b.last_update_seq().cmp(&a.last_update_seq()))
    });

    tags
}

/// True when one of the id's `/`-delimited segments is `series`.
pub fn is_series_tag(tag_id: &str) -> bool {
    tag_id.split('/').any(|segment| segment == "series")
}

/// Total log events per series-shaped tag in a (pruned) summary.
pub fn series_summary(root: &SummaryRoot) -> BTreeMap<String, u32> {
    root.tags
        .iter()
        .filter(|(id, _)| is_series_tag(id))
        .map(|(id, tag)| (id.clone(), tag.total()))
        .collect()
}

/// The series with the most log events, if any. Equal totals resolve to the
/// lexicographically smallest tag id.
pub fn most_viewed_series(root: &SummaryRoot) -> Option<String> {
    let mut best: Option<(String, u32)> = None;
    for (id, total) in series_summary(root) {
        match &best {
            Some((_, best_total)) if total <= *best_total => {}
            _ => best = Some((id, total)),
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageDescriptor;
    use crate::summary::{SummaryRoot, record};

    fn section_page(page_id: &str, section: &str, section_name: &str) -> PageDescriptor {
        PageDescriptor {
            page_id: page_id.to_owned(),
            section: section.to_owned(),
            section_name: section_name.to_owned(),
            ..PageDescriptor::default()
        }
    }

    #[test]
    fn most_visited_ranks_first() {
        let often = section_page("123", "often/visited", "Often Visited Section");
        let less = section_page("456", "less/visited", "Less Visited Section");

        let mut root = SummaryRoot::new(100);
        root = record(root, &often, 100);
        root = record(root, &often, 100);
        root = record(root, &less, 100);

        root = record(root, &often, 101);
        root = record(root, &less, 101);

        root = record(root, &often, 102);
        root = record(root, &less, 102);

        let ranked = popular(&root);
        assert_eq!(ranked[0].0, "often/visited");
        assert_eq!(ranked[1].0, "less/visited");
    }

    #[test]
    fn equal_totals_rank_last_logged_first() {
        let often = section_page("123", "often/visited", "Often Visited Section");
        let less = section_page("456", "less/visited", "Less Visited Section");

        let mut root = SummaryRoot::new(100);
        for day in 100..103 {
            root = record(root, &often, day);
            root = record(root, &less, day);
        }

        // Both tags total 3, but less/visited was logged last each day.
        let ranked = popular(&root);
        assert_eq!(ranked[0].0, "less/visited");
        assert_eq!(ranked[1].0, "often/visited");
    }

    #[test]
    fn tie_break_survives_a_serialization_round_trip() -> anyhow::Result<()> {
        let often = section_page("123", "often/visited", "Often Visited Section");
        let less = section_page("456", "less/visited", "Less Visited Section");

        let mut root = SummaryRoot::new(100);
        root = record(root, &often, 100);
        root = record(root, &less, 100);

        let root: SummaryRoot = serde_json::from_str(&serde_json::to_string(&root)?)?;

        let ranked = popular(&root);
        assert_eq!(ranked[0].0, "less/visited");

        Ok(())
    }

    #[test]
    fn series_shape_requires_a_series_segment() {
        assert!(is_series_tag("a/series/b"));
        assert!(is_series_tag("series/b"));
        assert!(!is_series_tag("a/sport/z"));
        assert!(!is_series_tag("a/seriesish/z"));
        assert!(!is_series_tag("series-of-things"));
    }

    #[test]
    fn series_summary_counts_log_events_and_skips_non_series() {
        let pages = [
            section_page("111", "a/series/b", "A series (two views)"),
            section_page("112", "a/series/b", "A series (two views)"),
            section_page("222", "g/series/h", "Another series"),
            section_page("333", "j/series/k", "A different series"),
            section_page("444", "x/series/y", "A really different series"),
            section_page("555", "a/sport/z", "Not a series"),
        ];

        let mut root = SummaryRoot::new(100);
        for (i, page) in pages.iter().enumerate() {
            root = record(root, page, 100 + i as i64);
        }

        let summary = series_summary(&root);
        let expected: BTreeMap<String, u32> = [
            ("a/series/b".to_owned(), 2),
            ("g/series/h".to_owned(), 1),
            ("j/series/k".to_owned(), 1),
            ("x/series/y".to_owned(), 1),
        ]
        .into_iter()
        .collect();

        assert_eq!(summary, expected);
        assert_eq!(most_viewed_series(&root).as_deref(), Some("a/series/b"));
    }

    #[test]
    fn most_viewed_series_is_none_without_series_tags() {
        let root = record(
            SummaryRoot::new(100),
            &section_page("555", "a/sport/z", "Not a series"),
            100,
        );
        assert_eq!(most_viewed_series(&root), None);
    }

    #[test]
    fn most_viewed_series_ties_resolve_lexicographically() {
        let mut root = SummaryRoot::new(100);
        root = record(root, &section_page("1", "z/series/a", "Z"), 100);
        root = record(root, &section_page("2", "b/series/c", "B"), 100);

        assert_eq!(most_viewed_series(&root).as_deref(), Some("b/series/c"));
    }
}
