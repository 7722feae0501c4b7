//! Flat export records and the normalizer that builds them from remote content.

use crate::content::ContentItem;
use crate::date::{epoch_seconds, render_timestamp};
use std::fmt;

pub const SITE_URL: &str = "https://www.reddit.com";
pub const LEGACY_SITE_URL: &str = "https://old.reddit.com";

/// Placeholder author for content whose account no longer exists.
pub const DELETED_AUTHOR: &str = "[deleted]";

/// Column names, in output order.
pub const COLUMNS: [&str; 11] = [
    "title",
    "canonical_url",
    "legacy_url",
    "external_link_url",
    "body_text",
    "author_name",
    "record_type",
    "score",
    "created_timestamp",
    "action_category",
    "owner_account_id",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordType {
    Submission,
    Comment,
}

/// Why a record was exported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Upvoted,
    Saved,
    Submitted,
}

impl RecordType {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::Submission => "Submission",
            RecordType::Comment => "Comment",
        }
    }
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Upvoted => "Upvoted",
            Action::Saved => "Saved",
            Action::Submitted => "Submitted",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportRecord {
    pub title: String,
    pub canonical_url: String,
    pub legacy_url: String,
    pub external_link_url: Option<String>,
    pub body_text: String,
    pub author_name: String,
    pub record_type: RecordType,
    pub score: i64,
    pub created_timestamp: i64,
    pub action_category: Action,
    pub owner_account_id: String,
}

impl ExportRecord {
    /// External link, or `None` if missing or blank.
    pub fn external_link(&self) -> Option<&str> {
        self.external_link_url.as_deref().filter(|u| !u.trim().is_empty())
    }

    /// Named cells in `COLUMNS` order.
    pub fn columns(&self, human_timestamps: bool) -> Vec<(&'static str, String)> {
        let values = [
            self.title.clone(),
            self.canonical_url.clone(),
            self.legacy_url.clone(),
            self.external_link_url.clone().unwrap_or_default(),
            self.body_text.clone(),
            self.author_name.clone(),
            self.record_type.to_string(),
            self.score.to_string(),
            render_timestamp(self.created_timestamp, human_timestamps),
            self.action_category.to_string(),
            self.owner_account_id.clone(),
        ];
        COLUMNS.into_iter().zip(values).collect()
    }
}

fn author_or_placeholder(author: Option<&str>) -> String {
    match author.map(str::trim) {
        Some(a) if !a.is_empty() => a.to_string(),
        _ => DELETED_AUTHOR.to_string(),
    }
}

/// Turn one content item into a record. Never fails.
pub fn normalize(item: &ContentItem, action: Action, owner: &str) -> ExportRecord {
    let permalink = item.permalink();
    let canonical_url = format!("{SITE_URL}{permalink}");
    let legacy_url = format!("{LEGACY_SITE_URL}{permalink}");

    match item {
        ContentItem::Post(p) => ExportRecord {
            title: p.title.clone(),
            canonical_url,
            legacy_url,
            external_link_url: p.url.clone(),
            body_text: p.selftext.clone(),
            author_name: author_or_placeholder(p.author.as_deref()),
            record_type: RecordType::Submission,
            score: p.score,
            created_timestamp: epoch_seconds(p.created_utc),
            action_category: action,
            owner_account_id: owner.to_string(),
        },
        ContentItem::Comment(c) => ExportRecord {
            title: c.link_title.clone(),
            canonical_url,
            legacy_url,
            external_link_url: c.link_url.clone(),
            body_text: c.body.clone(),
            author_name: author_or_placeholder(c.author.as_deref()),
            record_type: RecordType::Comment,
            score: c.score,
            created_timestamp: epoch_seconds(c.created_utc),
            action_category: action,
            owner_account_id: owner.to_string(),
        },
    }
}
