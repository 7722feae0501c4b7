use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

const TRIES: usize = 16;
const DELAY_MS: u64 = 50;

static INIT_ONCE: std::sync::Once = std::sync::Once::new();

/// Install the fmt subscriber once. `debug` forces the debug level, otherwise `RUST_LOG` or info.
pub fn init_tracing(debug: bool) {
    INIT_ONCE.call_once(|| {
        let env_filter = if debug {
            "debug".to_string()
        } else {
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
        };
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .try_init();
    });
}

/// Transient errors seen on Windows when AV/backup filter drivers or sharing
/// violations hold a freshly written file: access denied (5), sharing violation (32),
/// lock violation (33), user-mapped section open (1224).
fn is_retriable_io_error(e: &io::Error) -> bool {
    matches!(e.raw_os_error(), Some(5) | Some(32) | Some(33) | Some(1224))
}

/// Run `op` until it succeeds, fails with a non-transient error, or runs out of tries.
fn with_backoff<T>(mut op: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    let mut last_err = None;
    for i in 0..TRIES {
        match op() {
            Ok(v) => return Ok(v),
            Err(e) if is_retriable_io_error(&e) => {
                last_err = Some(e);
                sleep(Duration::from_millis(DELAY_MS.saturating_mul((i + 1) as u64)));
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "retries exhausted")))
}

pub fn create_with_backoff(path: &Path) -> io::Result<File> {
    with_backoff(|| File::create(path))
}

/// Replace `dest` with `tmp`; falls back to copy+remove when rename is refused.
pub fn replace_file_atomic_backoff(tmp: &Path, dest: &Path) -> Result<()> {
    if with_backoff(|| fs::rename(tmp, dest)).is_ok() {
        return Ok(());
    }
    with_backoff(|| fs::copy(tmp, dest)).with_context(|| format!("copy {} -> {}", tmp.display(), dest.display()))?;
    with_backoff(|| match fs::remove_file(tmp) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    })
    .with_context(|| format!("remove {}", tmp.display()))
}
