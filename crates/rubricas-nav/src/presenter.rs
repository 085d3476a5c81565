use rubricas_core::{CatalogError, DisplayPolicy, Rubrica, is_all_records};

/// The rendering side of the browser.
///
/// Implementations draw what they are given and report gestures back as
/// [`Action`](crate::Action)s; they never call into the store themselves.
pub trait Presenter: Send + Sync {
    fn render_list(&self, page: &ListPage<'_>);
    /// Render one record; `term` is the search to return to.
    fn render_detail(&self, record: &Rubrica, term: &str);
    fn notify_failure(&self, error: &CatalogError);
    fn show(&self);
    fn hide(&self);
}

/// A result list with the display policy applied.
#[derive(Debug, Clone, Copy)]
pub struct ListPage<'a> {
    term: &'a str,
    results: &'a [Rubrica],
    policy: DisplayPolicy,
}

impl<'a> ListPage<'a> {
    pub fn new(term: &'a str, results: &'a [Rubrica], policy: DisplayPolicy) -> Self {
        Self {
            term,
            results,
            policy,
        }
    }

    pub fn term(&self) -> &'a str {
        self.term
    }

    pub fn is_all_records(&self) -> bool {
        is_all_records(self.term)
    }

    /// The records to draw, at most `max_display` of them.
    pub fn shown(&self) -> &'a [Rubrica] {
        &self.results[..self.results.len().min(self.policy.max_display)]
    }

    /// Size of the full result set, whatever was truncated.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.results.len() > self.policy.max_display
    }

    /// Large enough to suggest refining the search.
    pub fn is_large(&self) -> bool {
        self.results.len() > self.policy.notice_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rubricas_core::ALL_RECORDS_TERM;

    fn records(n: usize) -> Vec<Rubrica> {
        (0..n)
            .map(|i| Rubrica {
                codigo: format!("{i:03}"),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn small_list_is_shown_whole() {
        let results = records(10);
        let page = ListPage::new("hora", &results, DisplayPolicy::default());
        assert_eq!(page.shown().len(), 10);
        assert!(!page.is_truncated());
        assert!(!page.is_large());
        assert!(!page.is_all_records());
    }

    #[test]
    fn over_threshold_gets_notice_but_no_truncation() {
        let results = records(75);
        let page = ListPage::new("a", &results, DisplayPolicy::default());
        assert!(page.is_large());
        assert!(!page.is_truncated());
        assert_eq!(page.shown().len(), 75);
    }

    #[test]
    fn over_cap_is_truncated_and_reports_total() {
        let results = records(500);
        let page = ListPage::new(ALL_RECORDS_TERM, &results, DisplayPolicy::default());
        assert!(page.is_truncated());
        assert_eq!(page.shown().len(), 100);
        assert_eq!(page.total(), 500);
        assert_eq!(page.shown()[99].codigo, "099");
        assert!(page.is_all_records());
    }

    #[test]
    fn exactly_at_cap_is_not_truncated() {
        let results = records(100);
        let page = ListPage::new("x", &results, DisplayPolicy::default());
        assert!(!page.is_truncated());
    }

    #[test]
    fn empty_page() {
        let page = ListPage::new("xyz", &[], DisplayPolicy::default());
        assert!(page.is_empty());
        assert!(page.shown().is_empty());
        assert_eq!(page.total(), 0);
    }
}
