//! Remote content model: the two kinds of "thing" a user listing can return.
//! Reddit wraps each one as `{"kind": "t3" | "t1", "data": {...}}`; extra fields are ignored by serde.

use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum ContentItem {
    #[serde(rename = "t3")]
    Post(Post),
    #[serde(rename = "t1")]
    Comment(Comment),
}

/// A submission (link or self post).
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Post {
    pub title: String,
    pub permalink: String,
    #[serde(default)]
    pub url: Option<String>,        // external link; points back to the post for self posts
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub author: Option<String>,     // None once the account is gone
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub created_utc: f64,
}

/// A comment, carrying the title and link of the post it was made on.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub link_title: String,
    pub permalink: String,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub created_utc: f64,
}

impl ContentItem {
    pub fn permalink(&self) -> &str {
        match self {
            ContentItem::Post(p) => &p.permalink,
            ContentItem::Comment(c) => &c.permalink,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, ContentItem::Comment(_))
    }
}
