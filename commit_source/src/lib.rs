mod commit;
mod contributor;
mod error;
mod git_source;
pub mod internals;
mod query;
pub mod remote;
mod repository;

use async_trait::async_trait;

pub use commit::{Commit, CommitAuthor};
pub use contributor::Contributor;
pub use error::SourceError;
pub use git_source::GitSource;
pub use query::{CommitQuery, DATE_FORMAT};
pub use repository::Repository;

/// Backing store of contributors and their commits.
/// Implementations are shared between tasks, so both lookups take `&self`.
#[async_trait]
pub trait CommitSource: Send + Sync {
    /// Full directory snapshot.
    async fn list_contributors(&self) -> Result<Vec<Contributor>, SourceError>;

    /// Commits of `query.author` within the inclusive date window, newest first.
    async fn list_commits(&self, query: &CommitQuery) -> Result<Vec<Commit>, SourceError>;
}
