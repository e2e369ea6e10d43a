use serde::{Deserialize, Serialize};

/// Metadata for a single page view. The `*_ids` fields and their name
/// counterparts are comma-separated lists, positionally aligned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageDescriptor {
    pub page_id: String,

    pub section: String,
    pub section_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_ids: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_ids: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// A normalized topical identifier extracted from page metadata, used as an
/// aggregation key in the interest summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

/// Derive the tag candidates for a page, in a fixed order: section, first
/// keyword, first series, first author.
///
/// Only the first element of each comma-separated id/name pair contributes;
/// the rest are discarded. Absent or empty fields produce no tag. When an id
/// is present but its names field is not, the id doubles as the display name.
pub fn extract_tags(page: &PageDescriptor) -> Vec<Tag> {
    let mut tags = Vec::with_capacity(4);

    push_tag(
        &mut tags,
        Some(page.section.as_str()),
        Some(page.section_name.as_str()),
    );
    push_tag(
        &mut tags,
        page.keyword_ids.as_deref(),
        page.keywords.as_deref(),
    );
    push_tag(&mut tags, page.series_id.as_deref(), page.series.as_deref());
    push_tag(
        &mut tags,
        page.author_ids.as_deref(),
        page.author.as_deref(),
    );

    tags
}

fn push_tag(tags: &mut Vec<Tag>, ids: Option<&str>, names: Option<&str>) {
    let Some(id) = ids.and_then(first_of) else {
        return;
    };
    let name = names.and_then(first_of).unwrap_or(id);

    tags.push(Tag {
        id: id.to_owned(),
        name: name.to_owned(),
    });
}

fn first_of(list: &str) -> Option<&str> {
    let first = list.split(',').next().unwrap_or_default();
    if first.is_empty() { None } else { Some(first) }
}
