use anyhow::{Context, Result};
use clap::Parser;
use indicatif::MultiProgress;
use reddit_export::{init_tracing, set_global_multiprogress, ExportConfig, RedditClient, RedditExport, DEFAULT_CONFIG_FILE};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Exports userdata of one or several reddit accounts.
#[derive(Parser, Debug)]
#[command(name = "reddit-export", version, about)]
struct Cli {
    /// Path to the config file
    #[arg(short = 'c', long = "config-file", default_value = DEFAULT_CONFIG_FILE)]
    config_file: PathBuf,

    /// Export only a list of urls (old.reddit, www.reddit and external links) for archivebox
    #[arg(short = 'a', long = "archivebox-export")]
    archivebox_export: bool,

    /// Export data in separate files for each reddit user
    #[arg(short = 's', long = "separate-export")]
    separate_export: bool,

    /// Display debugging information
    #[arg(long)]
    debug: bool,

    /// Number of accounts collected at the same time
    #[arg(short = 'j', long, default_value_t = 1)]
    jobs: usize,

    /// Disable progress spinners
    #[arg(long)]
    no_progress: bool,
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = ExportConfig::load(&cli.config_file)
        .with_context(|| format!("loading {}", cli.config_file.display()))?;
    let options = config.options.clone().with_overrides(cli.separate_export, cli.archivebox_export);

    let progress = !cli.no_progress && std::io::stderr().is_terminal();
    if progress && cli.jobs > 1 {
        set_global_multiprogress(Arc::new(MultiProgress::new()));
    }

    let summary = RedditExport::from_config(&config)
        .separate(options.separate_export)
        .url_only(options.archivebox_export)
        .progress(progress)
        .account_concurrency(cli.jobs)
        .run(&RedditClient::new(), &config.users)?;

    for path in &summary.written {
        tracing::info!("Export written: {}", path.display());
    }
    if !summary.failed_accounts.is_empty() {
        tracing::warn!("Accounts skipped after errors: {}", summary.failed_accounts.join(", "));
    }
    tracing::info!("Runtime : {:.2} seconds.", start.elapsed().as_secs_f64());
    Ok(())
}
