use chrono::{DateTime, FixedOffset};

/// Snapshot of the author taken when the commit was read. It is not kept in sync with the
/// contributor directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAuthor {
    pub login: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub sha: String,
    pub author: CommitAuthor,
    /// Name of the repository the commit was found in
    pub repo: String,
    pub message: String,
    pub committed_at: DateTime<FixedOffset>,
    pub url: String,
}

impl Commit {
    pub fn short_sha(&self) -> &str {
        self.sha.get(..8).unwrap_or(&self.sha)
    }

    pub fn author_and_repo(&self) -> String {
        if self.author.login.is_empty() {
            self.repo.clone()
        } else {
            format!("{} on {}", self.author.login, self.repo)
        }
    }
}
