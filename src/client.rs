//! Remote side of the export: the `ActivitySource` seam and its blocking Reddit implementation.
//! Listings are paged lazily through the `after` cursor, 100 things per request.

use crate::config::Credentials;
use crate::content::ContentItem;
use crate::error::ExportError;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";
const PAGE_LIMIT: usize = 100;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Lazy, non-restartable sequence of content items.
pub type ContentStream<'a> = Box<dyn Iterator<Item = Result<ContentItem, ExportError>> + 'a>;

/// One of the four user listings the exporter reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feed {
    Upvoted,
    Saved,
    OwnPosts,
    OwnComments,
}

impl Feed {
    fn path(self) -> &'static str {
        match self {
            Feed::Upvoted => "upvoted",
            Feed::Saved => "saved",
            Feed::OwnPosts => "submitted",
            Feed::OwnComments => "comments",
        }
    }

    /// Own content is listed newest-first only when asked.
    fn sorted_new(self) -> bool {
        matches!(self, Feed::OwnPosts | Feed::OwnComments)
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Feed::Upvoted => "upvoted content",
            Feed::Saved => "saved content",
            Feed::OwnPosts => "submitted content (posts)",
            Feed::OwnComments => "submitted content (comments)",
        };
        f.write_str(s)
    }
}

/// An authenticated account, passed explicitly to every fetch.
#[derive(Clone)]
pub struct AccountHandle {
    name: String,
    token: String,
}

impl AccountHandle {
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self { name: name.into(), token: token.into() }
    }

    /// Account name as reported by the remote.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for AccountHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountHandle").field("name", &self.name).finish_non_exhaustive()
    }
}

pub trait ActivitySource: Sync {
    fn authenticate(&self, creds: &Credentials) -> Result<AccountHandle, ExportError>;

    /// Stream one listing to exhaustion (no limit cap).
    fn fetch<'a>(&'a self, handle: &AccountHandle, feed: Feed) -> ContentStream<'a>;

    fn fetch_upvoted<'a>(&'a self, handle: &AccountHandle) -> ContentStream<'a> {
        self.fetch(handle, Feed::Upvoted)
    }
    fn fetch_saved<'a>(&'a self, handle: &AccountHandle) -> ContentStream<'a> {
        self.fetch(handle, Feed::Saved)
    }
    fn fetch_own_posts<'a>(&'a self, handle: &AccountHandle) -> ContentStream<'a> {
        self.fetch(handle, Feed::OwnPosts)
    }
    fn fetch_own_comments<'a>(&'a self, handle: &AccountHandle) -> ContentStream<'a> {
        self.fetch(handle, Feed::OwnComments)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct Me {
    name: String,
}

#[derive(Deserialize)]
struct ListingEnvelope {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    #[serde(default)]
    after: Option<String>,
    #[serde(default)]
    children: Vec<Value>,
}

/// Split one listing page into its things and the next cursor.
/// Children of any other kind are skipped.
pub(crate) fn parse_listing(body: Value) -> Result<Page, serde_json::Error> {
    let envelope: ListingEnvelope = serde_json::from_value(body)?;
    let mut items = Vec::with_capacity(envelope.data.children.len());
    for child in envelope.data.children {
        let kind = child.get("kind").and_then(Value::as_str).unwrap_or("?").to_string();
        match serde_json::from_value::<ContentItem>(child) {
            Ok(item) => items.push(item),
            Err(e) => tracing::warn!("skipping listing child of kind {}: {}", kind, e),
        }
    }
    let after = envelope.data.after.filter(|a| !a.is_empty());
    Ok((items, after))
}

fn basic_auth(user: &str, pass: &str) -> String {
    let raw = format!("{user}:{pass}");
    format!("Basic {}", base64::engine::general_purpose::STANDARD.encode(raw))
}

/// `reddit-export/<version> (by /u/<username>)`, the form the API rules ask for.
fn user_agent(username: &str) -> String {
    format!("reddit-export/{} (by /u/{})", env!("CARGO_PKG_VERSION"), username)
}

fn describe(e: ureq::Error) -> String {
    match e {
        ureq::Error::Status(code, resp) => format!("HTTP {} {}", code, resp.status_text()),
        ureq::Error::Transport(t) => t.to_string(),
    }
}

/// Blocking Reddit client for script-type OAuth apps.
pub struct RedditClient {
    agent: ureq::Agent,
}

impl RedditClient {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self { agent }
    }

    fn get_json(&self, handle: &AccountHandle, url: &str, query: &[(&str, &str)]) -> Result<Value, ureq::Error> {
        let mut req = self
            .agent
            .get(url)
            .set("User-Agent", &user_agent(handle.name()))
            .set("Authorization", &format!("bearer {}", handle.token()));
        for (k, v) in query {
            req = req.query(k, v);
        }
        let resp = req.call()?;
        pause_if_rate_limited(&resp);
        Ok(resp.into_json::<Value>()?)
    }
}

/// One listing page: its things and the cursor to the next page.
pub(crate) type Page = (Vec<ContentItem>, Option<String>);

/// Single-page fetch underneath a `Listing`.
pub(crate) trait PageSource {
    fn fetch_page(&self, handle: &AccountHandle, feed: Feed, after: Option<&str>) -> Result<Page, ExportError>;
}

impl PageSource for RedditClient {
    fn fetch_page(&self, handle: &AccountHandle, feed: Feed, after: Option<&str>) -> Result<Page, ExportError> {
        let url = format!("{API_BASE}/user/{}/{}", handle.name(), feed.path());
        let limit = PAGE_LIMIT.to_string();
        let mut query = vec![("limit", limit.as_str()), ("raw_json", "1")];
        if feed.sorted_new() {
            query.push(("sort", "new"));
        }
        if let Some(a) = after {
            query.push(("after", a));
        }
        let fetch_err = |reason: String| ExportError::Fetch {
            account: handle.name().to_string(),
            feed: feed.to_string(),
            reason,
        };
        let body = self.get_json(handle, &url, &query).map_err(|e| fetch_err(describe(e)))?;
        let page = parse_listing(body).map_err(|e| fetch_err(e.to_string()))?;
        tracing::debug!("{} for {}: page of {} items, after={:?}", feed, handle.name(), page.0.len(), page.1);
        Ok(page)
    }
}

impl Default for RedditClient {
    fn default() -> Self {
        Self::new()
    }
}

fn pause_if_rate_limited(resp: &ureq::Response) {
    let remaining = resp.header("x-ratelimit-remaining").and_then(|v| v.parse::<f64>().ok());
    let reset = resp.header("x-ratelimit-reset").and_then(|v| v.parse::<u64>().ok());
    if let (Some(rem), Some(reset)) = (remaining, reset) {
        if rem < 1.0 {
            tracing::warn!("rate limit reached, waiting {}s", reset);
            std::thread::sleep(Duration::from_secs(reset));
        }
    }
}

impl ActivitySource for RedditClient {
    fn authenticate(&self, creds: &Credentials) -> Result<AccountHandle, ExportError> {
        let auth_err = |reason: String| ExportError::Auth { account: creds.username.clone(), reason };

        let token: TokenResponse = self
            .agent
            .post(TOKEN_URL)
            .set("User-Agent", &user_agent(&creds.username))
            .set("Authorization", &basic_auth(&creds.client_id, &creds.client_secret))
            .send_form(&[
                ("grant_type", "password"),
                ("username", creds.username.as_str()),
                ("password", creds.password.as_str()),
            ])
            .map_err(|e| auth_err(describe(e)))?
            .into_json()
            .map_err(|e| auth_err(e.to_string()))?;

        // A wrong password comes back as 200 with an `error` field.
        let access_token = match (token.access_token, token.error) {
            (Some(t), None) => t,
            (_, Some(err)) => return Err(auth_err(err)),
            (None, None) => return Err(auth_err("no access token in response".into())),
        };

        let provisional = AccountHandle::new(creds.username.clone(), access_token);
        let me: Me = self
            .get_json(&provisional, &format!("{API_BASE}/api/v1/me"), &[("raw_json", "1")])
            .map_err(|e| auth_err(describe(e)))
            .and_then(|v| serde_json::from_value(v).map_err(|e| auth_err(e.to_string())))?;

        tracing::debug!("authenticated {} as {}", creds.username, me.name);
        Ok(AccountHandle::new(me.name, provisional.token))
    }

    fn fetch<'a>(&'a self, handle: &AccountHandle, feed: Feed) -> ContentStream<'a> {
        Box::new(Listing::new(self, handle.clone(), feed))
    }
}

/// Cursor over one paginated listing.
struct Listing<'a, P: ?Sized> {
    pages: &'a P,
    handle: AccountHandle,
    feed: Feed,
    after: Option<String>,
    buffer: VecDeque<ContentItem>,
    done: bool,
}

impl<'a, P: PageSource + ?Sized> Listing<'a, P> {
    fn new(pages: &'a P, handle: AccountHandle, feed: Feed) -> Self {
        Self { pages, handle, feed, after: None, buffer: VecDeque::new(), done: false }
    }
}

impl<P: PageSource + ?Sized> Iterator for Listing<'_, P> {
    type Item = Result<ContentItem, ExportError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }
            if self.done {
                return None;
            }
            match self.pages.fetch_page(&self.handle, self.feed, self.after.as_deref()) {
                Ok((items, after)) => {
                    // A repeated cursor would loop forever.
                    self.done = after.is_none() || after == self.after;
                    self.after = after;
                    self.buffer.extend(items);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
