use std::{fmt, sync::Arc, time::Duration};

use chrono::NaiveDate;
use commit_source::{Commit, CommitQuery, CommitSource, Contributor, SourceError};
use log::{debug, error, info, trace};
use scopeguard::ScopeGuard;
use stopwatch::Stopwatch;
use tokio::{
    sync::mpsc::{self, UnboundedSender},
    task::JoinHandle,
};

use crate::{utils::WarnOnErr, FilterError, FilterState};

/// Marks a commit query. Only the result of the latest generation is ever applied.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Contributors,
    Commits,
}

enum LoaderEvent {
    Contributors {
        result: Result<Vec<Contributor>, SourceError>,
        elapsed: Duration,
    },
    Commits {
        generation: Generation,
        query: CommitQuery,
        result: Result<Vec<Commit>, SourceError>,
        elapsed: Duration,
    },
    /// Sent exactly once per fetch, whether it finished, failed or got aborted.
    Released(FetchKind),
}

/// What `process` did with one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Processed {
    ContributorsLoaded {
        count: usize,
        elapsed: Duration,
    },
    CommitsLoaded {
        generation: Generation,
        count: usize,
        elapsed: Duration,
    },
    /// Result of a superseded query, state untouched.
    Discarded(Generation),
    Failed(FilterError),
    Released(FetchKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorOptions {
    /// Abort the task of a superseded query instead of letting it run to completion.
    pub abort_superseded: bool,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            abort_superseded: true,
        }
    }
}

type ReleaseGuard =
    ScopeGuard<UnboundedSender<LoaderEvent>, Box<dyn FnOnce(UnboundedSender<LoaderEvent>) + Send>>;

/// Sender for the fetch task which reports `Released(kind)` when dropped, so busy is cleared even
/// if the task panics or is aborted before it ever runs.
fn release_on_drop(sender: UnboundedSender<LoaderEvent>, kind: FetchKind) -> ReleaseGuard {
    let on_drop: Box<dyn FnOnce(UnboundedSender<LoaderEvent>) + Send> = Box::new(move |sender| {
        sender
            .send(LoaderEvent::Released(kind))
            .warn_on_err("Release: queue error.");
    });
    scopeguard::guard(sender, on_drop)
}

/// Runs lookups against the source in background tasks and folds their results into a
/// [`FilterState`] passed in by the owner.
pub struct QueryCoordinator {
    source: Arc<dyn CommitSource>,
    options: CoordinatorOptions,
    latest: Generation,
    commits_task: Option<JoinHandle<()>>,

    event_receiver: mpsc::UnboundedReceiver<LoaderEvent>,
    event_sender: mpsc::UnboundedSender<LoaderEvent>,
}

impl QueryCoordinator {
    pub fn new(source: Arc<dyn CommitSource>, options: CoordinatorOptions) -> Self {
        let (event_sender, event_receiver) = mpsc::unbounded_channel();
        Self {
            source,
            options,
            latest: Generation::default(),
            commits_task: None,
            event_receiver,
            event_sender,
        }
    }

    pub fn load_contributors(&mut self, state: &mut FilterState) {
        state.acquire();
        let sender = release_on_drop(self.event_sender.clone(), FetchKind::Contributors);
        let source = Arc::clone(&self.source);

        tokio::spawn(async move {
            let timer = Stopwatch::start_new();
            let result = source.list_contributors().await;
            sender
                .send(LoaderEvent::Contributors {
                    result,
                    elapsed: timer.elapsed(),
                })
                .warn_on_err("Contributors: queue error.");
        });
    }

    /// Starts a lookup for the given tuple and supersedes every query issued before.
    pub fn query_commits(
        &mut self,
        state: &mut FilterState,
        login: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Generation {
        let generation = self.invalidate();
        let query = CommitQuery::new(login, start_date, end_date);
        info!("Query {} as {}", query, generation);

        state.acquire();
        // a new tuple makes any previous failure irrelevant
        state.clear_error();

        let sender = release_on_drop(self.event_sender.clone(), FetchKind::Commits);
        let source = Arc::clone(&self.source);
        let task = tokio::spawn(async move {
            let timer = Stopwatch::start_new();
            let result = source.list_commits(&query).await;
            sender
                .send(LoaderEvent::Commits {
                    generation,
                    query,
                    result,
                    elapsed: timer.elapsed(),
                })
                .warn_on_err("Commits: queue error.");
        });
        self.commits_task = Some(task);
        generation
    }

    /// Makes every in-flight query stale without issuing a new one.
    pub fn invalidate(&mut self) -> Generation {
        self.latest = self.latest.next();
        if let Some(task) = self.commits_task.take() {
            if self.options.abort_superseded {
                trace!("Aborting query superseded by {}", self.latest);
                task.abort();
            }
        }
        self.latest
    }

    /// Waits for the next event of a fetch task and applies it to `state`.
    /// Returns `None` only if the event channel is closed.
    pub async fn process(&mut self, state: &mut FilterState) -> Option<Processed> {
        let event = self.event_receiver.recv().await?;
        Some(self.apply(state, event))
    }

    fn apply(&self, state: &mut FilterState, event: LoaderEvent) -> Processed {
        match event {
            LoaderEvent::Contributors {
                result: Ok(contributors),
                elapsed,
            } => {
                info!("Loaded {} contributors in {:?}", contributors.len(), elapsed);
                let count = contributors.len();
                state.replace_contributors(contributors);
                state.resolve_error(FetchKind::Contributors);
                Processed::ContributorsLoaded { count, elapsed }
            }
            LoaderEvent::Contributors {
                result: Err(err), ..
            } => {
                error!("Loading contributors failed: {}", err);
                let err = FilterError::Contributors(err.to_string());
                state.set_error(err.clone());
                Processed::Failed(err)
            }
            LoaderEvent::Commits { generation, .. } if generation != self.latest => {
                debug!("Discarding result of {}, latest is {}", generation, self.latest);
                Processed::Discarded(generation)
            }
            LoaderEvent::Commits {
                generation,
                query,
                result: Ok(commits),
                elapsed,
            } => {
                info!("{} commits for {} ({}) in {:?}", commits.len(), query, generation, elapsed);
                let count = commits.len();
                state.replace_commits(commits);
                state.resolve_error(FetchKind::Commits);
                Processed::CommitsLoaded {
                    generation,
                    count,
                    elapsed,
                }
            }
            LoaderEvent::Commits {
                query,
                result: Err(err),
                ..
            } => {
                error!("Query {} failed: {}", query, err);
                let err = FilterError::Commits {
                    author: query.author,
                    reason: err.to_string(),
                };
                state.set_error(err.clone());
                Processed::Failed(err)
            }
            LoaderEvent::Released(kind) => {
                state.release();
                trace!("Released {:?}, busy={}", kind, state.is_busy());
                Processed::Released(kind)
            }
        }
    }
}

impl Drop for QueryCoordinator {
    fn drop(&mut self) {
        if let Some(task) = self.commits_task.take() {
            task.abort();
        }
    }
}
