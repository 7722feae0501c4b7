use crate::aggregate::aggregate;
use crate::client::ActivitySource;
use crate::collect::{collect_all, CollectOptions};
use crate::config::{AccountConfig, ExportConfig, ExportOptions};
use crate::date::run_timestamp;
use crate::error::ExportError;
use crate::export::{ExportFormat, Exporter};
use crate::partition::partition;
use crate::paths::ExportPaths;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Export run builder: collect → aggregate → partition → export.
#[derive(Clone, Debug)]
pub struct RedditExport {
    pub(crate) opts: ExportOptions,
    pub(crate) timestamp: Option<i64>, // None = now
    pub(crate) progress: bool,
    pub(crate) account_concurrency: usize,
}

/// What a run produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub written: Vec<PathBuf>,
    pub records: usize,
    pub failed_accounts: Vec<String>,
    /// Group label ("all" for the combined file) and why it was not written.
    pub failed_groups: Vec<(String, ExportError)>,
}

impl Default for RedditExport {
    fn default() -> Self {
        Self::new()
    }
}

impl RedditExport {
    pub fn new() -> Self {
        Self { opts: ExportOptions::default(), timestamp: None, progress: false, account_concurrency: 1 }
    }

    pub fn from_config(cfg: &ExportConfig) -> Self {
        Self { opts: cfg.options.clone(), ..Self::new() }
    }

    // -------- Builder methods --------
    pub fn export_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts.export_folder = dir.as_ref().to_path_buf(); self }
    pub fn separate(mut self, yes: bool) -> Self { self.opts.separate_export = yes; self }
    pub fn url_only(mut self, yes: bool) -> Self { self.opts.archivebox_export = yes; self }
    pub fn timestamps_human_readable(mut self, yes: bool) -> Self { self.opts.human_timestamps = yes; self }
    pub fn timestamp(mut self, secs: i64) -> Self { self.timestamp = Some(secs); self }
    pub fn progress(mut self, yes: bool) -> Self { self.progress = yes; self }
    pub fn account_concurrency(mut self, n: usize) -> Self { self.account_concurrency = n.max(1); self }

    pub fn format(&self) -> ExportFormat {
        ExportFormat::from_url_only(self.opts.archivebox_export)
    }

    /// Run the whole export. Account and group failures are isolated and reported in the summary;
    /// only an unusable export folder fails the run.
    pub fn run<S: ActivitySource + ?Sized>(&self, source: &S, accounts: &[AccountConfig]) -> Result<RunSummary> {
        let paths = ExportPaths::new(&self.opts.export_folder, self.timestamp.unwrap_or_else(run_timestamp));
        let format = self.format();
        let exporter = Exporter::new(format).human_timestamps(self.opts.human_timestamps);

        let outcomes = collect_all(source, accounts, self.account_concurrency, CollectOptions { progress: self.progress });
        let aggregated = aggregate(outcomes);

        let mut summary = RunSummary {
            records: aggregated.records.len(),
            failed_accounts: aggregated.failed_accounts,
            ..Default::default()
        };

        paths.ensure_folder()?;
        for group in partition(aggregated.records, self.opts.separate_export) {
            let label = group.owner.clone().unwrap_or_else(|| "all".to_string());
            let stem = paths.stem(group.owner.as_deref(), format);
            match exporter.write(&group, &stem) {
                Ok(p) => summary.written.push(p),
                Err(e) => {
                    tracing::error!("Export of {} failed: {}", label, e);
                    summary.failed_groups.push((label, e));
                }
            }
        }
        Ok(summary)
    }
}
