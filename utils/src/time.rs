//! Time formatting helpers.

/// Render a second count compactly, two units at most.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Render a signed offset from now, as used for token expiry.
pub fn format_relative(secs: i64) -> String {
    if secs >= 0 {
        format!("in {}", format_duration(secs as u64))
    } else {
        format!("{} ago", format_duration(secs.unsigned_abs()))
    }
}
