//! Timestamp helpers: run-scoped epoch seconds and record timestamp rendering.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Seconds since epoch, used to name every file written by one run.
pub fn run_timestamp() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// Reddit reports `created_utc` as a float; sub-second precision is always zero.
#[inline]
pub fn epoch_seconds(created_utc: f64) -> i64 {
    created_utc.trunc() as i64
}

/// Render epoch seconds as-is, or as RFC3339 when `human` is set.
/// Out-of-range values fall back to the numeric form.
pub fn render_timestamp(secs: i64, human: bool) -> String {
    if human {
        if let Ok(dt) = OffsetDateTime::from_unix_timestamp(secs) {
            if let Ok(s) = dt.format(&Rfc3339) {
                return s;
            }
        }
    }
    secs.to_string()
}
