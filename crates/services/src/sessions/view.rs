/// Formats remaining seconds as `M:SS` for display.
#[must_use]
pub fn format_remaining(secs: u32) -> String {
    let minutes = secs / 60;
    let seconds = secs % 60;
    format!("{minutes}:{seconds:02}")
}
