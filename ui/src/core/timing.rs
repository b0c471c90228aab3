//! Timer and clock utilities used by the submission timeout and response stamps.

use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Sleep for `ms` milliseconds on the current executor.
#[cfg(target_arch = "wasm32")]
pub async fn sleep_ms(ms: u64) {
    gloo_timers::future::TimeoutFuture::new(ms.min(u32::MAX as u64) as u32).await;
}

/// Sleep for `ms` milliseconds on the current executor.
#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep_ms(ms: u64) {
    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
}

/// Current UTC time as an RFC 3339 string (`2025-09-28T14:30:00.123Z`).
pub fn now_rfc3339() -> String {
    format_rfc3339(OffsetDateTime::now_utc())
}

pub fn format_rfc3339(ts: OffsetDateTime) -> String {
    // Rfc3339 formatting only fails for years outside 0..=9999.
    ts.format(&Rfc3339).unwrap_or_default()
}
