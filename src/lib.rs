mod config;
mod content;
mod client;
mod date;
mod error;
mod paths;

mod progress;
mod concurrency;
mod util;
mod pipeline;

mod record;
mod collect;
mod aggregate;
mod partition;
mod export;

pub use crate::config::{AccountConfig, Category, Credentials, ExportConfig, ExportOptions, DEFAULT_CONFIG_FILE, DEFAULT_EXPORT_FOLDER};
pub use crate::error::ExportError;
pub use crate::pipeline::{RedditExport, RunSummary};

// Remote content and the client seam.
pub use crate::content::{Comment, ContentItem, Post};
pub use crate::client::{AccountHandle, ActivitySource, ContentStream, Feed, RedditClient};

// Pipeline stages, usable on their own.
pub use crate::record::{normalize, Action, ExportRecord, RecordType, COLUMNS, DELETED_AUTHOR};
pub use crate::collect::{collect_account, collect_all, feeds_for, AccountOutcome, CollectOptions};
pub use crate::aggregate::{aggregate, Aggregated};
pub use crate::partition::{partition, ExportGroup};
pub use crate::export::{export_group, write_url_list, ExportFormat, Exporter, CSV_DELIMITER};
pub use crate::paths::ExportPaths;

pub use crate::date::{render_timestamp, run_timestamp};
pub use crate::progress::set_global_multiprogress;
pub use crate::util::init_tracing;
