//! Spinners for listing downloads, whose length is unknown up front.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// Optional global MultiProgress so spinners of concurrently collected accounts do not overwrite each other.
static GLOBAL_MP: OnceLock<Arc<MultiProgress>> = OnceLock::new();

/// Safe to call once; additional calls are ignored.
pub fn set_global_multiprogress(mp: Arc<MultiProgress>) {
    let _ = GLOBAL_MP.set(mp);
}

/// Item-count spinner with a label, e.g. "alice: saved content".
pub fn make_fetch_spinner(label: &str) -> ProgressBar {
    let pb = match GLOBAL_MP.get() {
        Some(mp) => mp.add(ProgressBar::new_spinner()),
        None => ProgressBar::new_spinner(),
    };
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg} {pos} items  it/s: {per_sec}  elapsed: {elapsed_precise}") {
        pb.set_style(style);
    }
    pb.set_message(label.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
