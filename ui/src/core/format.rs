//! Formatting helpers for presenting survey progress.

/// Progress label shown above the current image, e.g. `"3 / 23"`.
pub fn format_progress(position: usize, sample_size: usize) -> String {
    format!("{} / {}", position + 1, sample_size)
}

/// Score labels rendered next to each radio option.
pub fn format_score(score: u8) -> String {
    format!("{score}")
}
