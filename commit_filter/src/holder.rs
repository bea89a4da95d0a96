use std::sync::Arc;

use chrono::NaiveDate;
use commit_source::CommitSource;
use log::{debug, info, warn};

use crate::{
    CoordinatorOptions, FilterState, Generation, Processed, QueryCoordinator, RangePolicy,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    pub range_policy: RangePolicy,
    pub coordinator: CoordinatorOptions,
}

/// Owns the filter selections and decides when they warrant a new commit query.
pub struct FilterHolder {
    state: FilterState,
    coordinator: QueryCoordinator,
    range_policy: RangePolicy,
    initialized: bool,
}

impl FilterHolder {
    pub fn new(source: Arc<dyn CommitSource>, options: FilterOptions, state: FilterState) -> Self {
        Self {
            state,
            coordinator: QueryCoordinator::new(source, options.coordinator),
            range_policy: options.range_policy,
            initialized: false,
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn range_policy(&self) -> RangePolicy {
        self.range_policy
    }

    /// Starts loading the contributor directory. Only the first call does anything.
    pub fn initialize(&mut self) -> bool {
        if self.initialized {
            warn!("Contributor directory is loaded once per session");
            return false;
        }
        self.initialized = true;
        self.coordinator.load_contributors(&mut self.state);
        true
    }

    /// Unknown logins are ignored, a known one is selected and always queried.
    pub fn select_contributor(&mut self, login: &str) -> Option<Generation> {
        let Some(contributor) = self.state.find_contributor(login).cloned() else {
            debug!("Ignoring unknown contributor '{}'", login);
            return None;
        };
        info!("Selected {}", contributor.login);
        self.state.select(contributor);
        self.query_current()
    }

    pub fn set_start_date(&mut self, date: NaiveDate) -> Option<Generation> {
        self.state.set_start_date(date);
        self.query_current()
    }

    pub fn set_end_date(&mut self, date: NaiveDate) -> Option<Generation> {
        self.state.set_end_date(date);
        self.query_current()
    }

    /// Queries the current tuple again, eg. after a failure.
    pub fn refresh(&mut self) -> Option<Generation> {
        self.query_current()
    }

    /// Applies the next finished fetch. See [`QueryCoordinator::process`].
    pub async fn process(&mut self) -> Option<Processed> {
        self.coordinator.process(&mut self.state).await
    }

    /// Processes events until no fetch is outstanding.
    pub async fn settle(&mut self) -> Vec<Processed> {
        let mut processed = Vec::new();
        while self.state.is_busy() {
            match self.process().await {
                Some(p) => processed.push(p),
                None => break,
            }
        }
        processed
    }

    fn query_current(&mut self) -> Option<Generation> {
        let filter = self.state.filter()?;
        match self.range_policy.bounds(filter.since, filter.until) {
            Ok((since, until)) => Some(self.coordinator.query_commits(
                &mut self.state,
                &filter.author,
                since,
                until,
            )),
            Err(err) => {
                warn!("Not querying {}: {}", filter, err);
                // results for the previous range must not show up under this one
                self.coordinator.invalidate();
                self.state.replace_commits(Vec::new());
                self.state.set_error(err);
                None
            }
        }
    }
}
