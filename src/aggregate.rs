//! Merge per-account outcomes into one sequence, in configured account order.

use crate::collect::AccountOutcome;
use crate::record::ExportRecord;

#[derive(Debug, Default)]
pub struct Aggregated {
    pub records: Vec<ExportRecord>,
    /// Configured usernames whose collection failed.
    pub failed_accounts: Vec<String>,
}

/// Concatenate successful groups; failed accounts are logged and contribute nothing.
pub fn aggregate<I>(outcomes: I) -> Aggregated
where
    I: IntoIterator<Item = (String, AccountOutcome)>,
{
    let mut total = Aggregated::default();
    for (account, outcome) in outcomes {
        match outcome {
            Ok(group) => {
                tracing::info!("{}: {} records collected.", account, group.len());
                total.records.extend(group.records);
            }
            Err(e) => {
                tracing::error!("Couldn't extract data for user {}: {}.", account, e);
                total.failed_accounts.push(account);
            }
        }
    }
    total
}
