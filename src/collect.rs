//! Per-account collection: authenticate, drain every requested listing, normalize.

use crate::client::{AccountHandle, ActivitySource, Feed};
use crate::concurrency::map_ordered_limited;
use crate::config::{AccountConfig, Category};
use crate::error::ExportError;
use crate::partition::ExportGroup;
use crate::progress::make_fetch_spinner;
use crate::record::{normalize, Action, ExportRecord};

/// One account's contribution: its records, or why there are none.
pub type AccountOutcome = Result<ExportGroup, ExportError>;

/// Listings behind each category, in fetch order, with the action they are tagged with.
pub fn feeds_for(category: Category) -> &'static [(Feed, Action)] {
    match category {
        Category::Upvoted => &[(Feed::Upvoted, Action::Upvoted)],
        Category::Saved => &[(Feed::Saved, Action::Saved)],
        Category::Submissions => &[(Feed::OwnPosts, Action::Submitted), (Feed::OwnComments, Action::Submitted)],
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CollectOptions {
    pub progress: bool,
}

/// Drain one listing into `out`. A failure mid-way keeps what was already read.
fn drain_feed<S: ActivitySource + ?Sized>(
    source: &S,
    handle: &AccountHandle,
    feed: Feed,
    action: Action,
    opts: CollectOptions,
    out: &mut Vec<ExportRecord>,
) {
    tracing::info!("Exporting {} for {}.", feed, handle.name());
    let pb = opts.progress.then(|| make_fetch_spinner(&format!("{}: {}", handle.name(), feed)));
    let before = out.len();

    for item in source.fetch(handle, feed) {
        match item {
            Ok(item) => {
                out.push(normalize(&item, action, handle.name()));
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
            }
            Err(e) => {
                tracing::error!("{} (keeping {} records already fetched)", e, out.len() - before);
                break;
            }
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message(format!("{}: {} done", handle.name(), feed));
    }
    tracing::debug!("{} records from {} for {}", out.len() - before, feed, handle.name());
}

/// Collect every requested category for one account.
/// Only an authentication failure turns into `Err`; fetch failures are logged and partial results kept.
pub fn collect_account<S: ActivitySource + ?Sized>(source: &S, account: &AccountConfig, opts: CollectOptions) -> AccountOutcome {
    tracing::info!("Exporting data for {}.", account.username());
    let handle = source.authenticate(&account.credentials)?;

    let mut records = Vec::new();
    for category in Category::ALL {
        if !account.wants(category) {
            continue;
        }
        for &(feed, action) in feeds_for(category) {
            drain_feed(source, &handle, feed, action, opts, &mut records);
        }
    }
    Ok(ExportGroup::for_owner(handle.name(), records))
}

/// Collect all accounts, `concurrency` at a time. Outcomes come back in configured order.
pub fn collect_all<S: ActivitySource + ?Sized>(
    source: &S,
    accounts: &[AccountConfig],
    concurrency: usize,
    opts: CollectOptions,
) -> Vec<(String, AccountOutcome)> {
    map_ordered_limited(accounts, concurrency, |account| {
        (account.username().to_string(), collect_account(source, account, opts))
    })
}
