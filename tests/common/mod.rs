#![allow(dead_code)]

use reddit_export::{
    AccountConfig, AccountHandle, ActivitySource, Category, Comment, ContentItem, ContentStream, Credentials,
    ExportError, Feed, Post,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One step of a scripted listing: an item, or a failure that ends the listing.
#[derive(Clone)]
pub enum Step {
    Item(ContentItem),
    Fail(&'static str),
}

#[derive(Clone, Default)]
pub struct FakeAccount {
    pub password: String,
    pub feeds: HashMap<Feed, Vec<Step>>,
}

/// In-memory stand-in for the remote: accounts keyed by username, each with scripted listings.
#[derive(Clone, Default)]
pub struct FakeSource {
    pub accounts: HashMap<String, FakeAccount>,
}

impl FakeSource {
    pub fn with_account(mut self, name: &str, feeds: Vec<(Feed, Vec<Step>)>) -> Self {
        self.accounts.insert(
            name.to_string(),
            FakeAccount { password: format!("{name}-pw"), feeds: feeds.into_iter().collect() },
        );
        self
    }
}

impl ActivitySource for FakeSource {
    fn authenticate(&self, creds: &Credentials) -> Result<AccountHandle, ExportError> {
        match self.accounts.get(&creds.username) {
            Some(acc) if acc.password == creds.password => Ok(AccountHandle::new(creds.username.clone(), "token")),
            _ => Err(ExportError::Auth { account: creds.username.clone(), reason: "invalid_grant".into() }),
        }
    }

    fn fetch<'a>(&'a self, handle: &AccountHandle, feed: Feed) -> ContentStream<'a> {
        let steps = self
            .accounts
            .get(handle.name())
            .and_then(|a| a.feeds.get(&feed))
            .cloned()
            .unwrap_or_default();
        let account = handle.name().to_string();
        // Like a real listing, nothing is yielded after a failure.
        let mut failed = false;
        Box::new(steps.into_iter().map_while(move |step| {
            if failed {
                return None;
            }
            match step {
                Step::Item(item) => Some(Ok(item)),
                Step::Fail(reason) => {
                    failed = true;
                    Some(Err(ExportError::Fetch { account: account.clone(), feed: feed.to_string(), reason: reason.into() }))
                }
            }
        }))
    }
}

pub fn post(id: &str, link: Option<&str>) -> ContentItem {
    ContentItem::Post(Post {
        title: format!("Post {id}"),
        permalink: format!("/r/rust/comments/{id}/post_{id}/"),
        url: link.map(Into::into),
        selftext: format!("self text of {id}"),
        author: Some("bob".into()),
        score: 10,
        created_utc: 1136073600.0,
    })
}

pub fn comment(id: &str, parent_title: &str, parent_link: Option<&str>) -> ContentItem {
    ContentItem::Comment(Comment {
        link_title: parent_title.into(),
        permalink: format!("/r/rust/comments/p/parent/{id}/"),
        link_url: parent_link.map(Into::into),
        body: format!("comment body {id}"),
        author: None,
        score: 1,
        created_utc: 1136074600.0,
    })
}

pub fn items(items: Vec<ContentItem>) -> Vec<Step> {
    items.into_iter().map(Step::Item).collect()
}

pub fn account(name: &str, exports: &[Category]) -> AccountConfig {
    AccountConfig {
        credentials: Credentials {
            username: name.into(),
            password: format!("{name}-pw"),
            client_id: "client".into(),
            client_secret: "secret".into(),
        },
        exports: exports.to_vec(),
    }
}

/// Read a text file line-by-line, exactly as written (blank lines included).
pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path).unwrap().lines().map(String::from).collect()
}

/// Parse a `;`-delimited export into (header, rows).
pub fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut r = csv::ReaderBuilder::new().delimiter(b';').from_path(path).unwrap();
    let header = r.headers().unwrap().iter().map(String::from).collect();
    let rows = r.records().map(|rec| rec.unwrap().iter().map(String::from).collect()).collect();
    (header, rows)
}

/// Files in a directory, sorted by name.
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    let mut v: Vec<PathBuf> = std::fs::read_dir(dir).unwrap().map(|e| e.unwrap().path()).collect();
    v.sort();
    v
}
