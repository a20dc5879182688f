//! `MM:SS` duration formatting.
//!
//! The break context receives its duration as an `MM:SS` query-style
//! parameter; these helpers implement both directions of that contract.

/// Parse an `MM:SS` string (also accepts a bare minute count) into seconds.
///
/// Returns `None` for anything unparseable; callers substitute their default.
pub fn parse_mmss(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some((m, s)) = trimmed.split_once(':') {
        let minutes: u32 = m.parse().ok()?;
        let seconds: u32 = s.parse().ok()?;
        if s.len() > 2 || seconds > 59 {
            return None;
        }
        return Some(minutes * 60 + seconds);
    }
    // Bare number means minutes.
    trimmed.parse::<u32>().ok().map(|m| m * 60)
}

/// Format a second count as `MM:SS` (minutes unpadded, seconds zero-padded).
pub fn format_mmss(total_secs: u32) -> String {
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}
