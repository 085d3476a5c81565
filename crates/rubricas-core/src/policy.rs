//! Display limits and the reserved "all records" term.

/// Search term meaning "no filter, show everything".
///
/// Shared by the navigation controller and every presenter: a list rendered
/// under this term is the full collection, not a search result.
pub const ALL_RECORDS_TERM: &str = "Todas as rubricas";

pub fn is_all_records(term: &str) -> bool {
    term == ALL_RECORDS_TERM
}

/// How many results a list view may show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayPolicy {
    /// Lists longer than this are truncated for display.
    pub max_display: usize,
    /// Lists longer than this get an informative "refine your search" notice.
    pub notice_threshold: usize,
}

impl Default for DisplayPolicy {
    fn default() -> Self {
        Self {
            max_display: 100,
            notice_threshold: 50,
        }
    }
}
