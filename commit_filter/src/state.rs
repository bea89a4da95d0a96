use chrono::{NaiveDate, Utc};
use commit_source::{Commit, CommitQuery, Contributor};

use crate::{FetchKind, FilterError};

/// Everything the dashboard shows. Only the holder and the coordinator change it, presentation
/// reads it through the getters.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    contributors: Vec<Contributor>,
    commits: Vec<Commit>,
    selected: Option<Contributor>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    /// fetches started but not yet released
    pending: usize,
    last_error: Option<FilterError>,
}

impl Default for FilterState {
    /// Both bounds on today (UTC).
    fn default() -> Self {
        let today = Utc::now().date_naive();
        Self::new(today, today)
    }
}

impl FilterState {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            contributors: Vec::new(),
            commits: Vec::new(),
            selected: None,
            start_date,
            end_date,
            pending: 0,
            last_error: None,
        }
    }

    pub fn contributors(&self) -> &[Contributor] {
        &self.contributors
    }

    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub fn selected_contributor(&self) -> Option<&Contributor> {
        self.selected.as_ref()
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }

    pub fn last_error(&self) -> Option<&FilterError> {
        self.last_error.as_ref()
    }

    /// The complete filter tuple, `None` while no contributor is selected.
    pub fn filter(&self) -> Option<CommitQuery> {
        self.selected
            .as_ref()
            .map(|c| CommitQuery::new(c.login.as_str(), self.start_date, self.end_date))
    }

    /// Exact, case sensitive lookup in the directory.
    pub fn find_contributor(&self, login: &str) -> Option<&Contributor> {
        self.contributors.iter().find(|c| c.login == login)
    }

    pub(crate) fn select(&mut self, contributor: Contributor) {
        self.selected = Some(contributor);
    }

    pub(crate) fn set_start_date(&mut self, date: NaiveDate) {
        self.start_date = date;
    }

    pub(crate) fn set_end_date(&mut self, date: NaiveDate) {
        self.end_date = date;
    }

    pub(crate) fn replace_contributors(&mut self, contributors: Vec<Contributor>) {
        self.contributors = contributors;
    }

    pub(crate) fn replace_commits(&mut self, commits: Vec<Commit>) {
        self.commits = commits;
    }

    pub(crate) fn acquire(&mut self) {
        self.pending += 1;
    }

    pub(crate) fn release(&mut self) {
        self.pending = self.pending.saturating_sub(1);
    }

    pub(crate) fn set_error(&mut self, error: FilterError) {
        self.last_error = Some(error);
    }

    pub(crate) fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Clears the error only if a success of `kind` resolves it.
    pub(crate) fn resolve_error(&mut self, kind: FetchKind) {
        if self.last_error.as_ref().and_then(FilterError::kind) == Some(kind) {
            self.last_error = None;
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use commit_source::Contributor;

    use super::FilterState;
    use crate::{FetchKind, FilterError};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn defaults() {
        let state = FilterState::default();
        assert_eq!(state.start_date(), state.end_date());
        assert!(state.selected_contributor().is_none());
        assert!(state.filter().is_none());
        assert!(!state.is_busy());
        assert!(state.commits().is_empty());
    }

    #[test]
    fn lookup_is_exact() {
        let mut state = FilterState::new(day(1), day(2));
        state.replace_contributors(vec![Contributor::new("ana", ""), Contributor::new("bob", "")]);
        assert!(state.find_contributor("bob").is_some());
        assert!(state.find_contributor("Bob").is_none());
        assert!(state.find_contributor("bo").is_none());
        assert!(state.find_contributor("").is_none());
    }

    #[test]
    fn filter_is_complete_once_selected() {
        let mut state = FilterState::new(day(1), day(31));
        state.select(Contributor::new("bob", ""));
        let filter = state.filter().unwrap();
        assert_eq!(filter.author, "bob");
        assert_eq!(filter.since, day(1));
        assert_eq!(filter.until, day(31));
    }

    #[test]
    fn busy_counts_outstanding_fetches() {
        let mut state = FilterState::new(day(1), day(1));
        state.acquire();
        state.acquire();
        state.release();
        assert!(state.is_busy());
        state.release();
        assert!(!state.is_busy());
        state.release();
        assert!(!state.is_busy());
    }

    #[test]
    fn errors_are_resolved_by_their_kind() {
        let mut state = FilterState::new(day(1), day(1));
        state.set_error(FilterError::Contributors("down".into()));
        state.resolve_error(FetchKind::Commits);
        assert!(state.last_error().is_some());
        state.resolve_error(FetchKind::Contributors);
        assert!(state.last_error().is_none());

        state.set_error(FilterError::InvertedRange {
            start: day(2),
            end: day(1),
        });
        state.resolve_error(FetchKind::Commits);
        assert!(state.last_error().is_some());
    }
}
