use serde::Serialize;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub total: usize,
    pub position: usize,
    pub answered: usize,
    pub remaining_secs: u32,
    pub is_complete: bool,
}
