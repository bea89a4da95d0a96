use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use tokio::{fs, process::Command};

use crate::{remote, SourceError};

/// A local git repository commits are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub path: PathBuf,
    pub name: String,
    /// Browsable url of `origin`, if it has one
    pub web_url: Option<String>,
    /// `false` for a freshly initialized repository whose HEAD is unborn
    pub has_commits: bool,
}

impl Repository {
    /// Resolves the top level of the work tree containing `path` and the `origin` remote.
    pub async fn open(path: &Path) -> Result<Self, SourceError> {
        let path = fs::canonicalize(path).await?;
        let output = Command::new("git")
            .current_dir(&path)
            .args(["rev-parse", "--show-toplevel"])
            .output()
            .await?;
        if !output.status.success() {
            return Err(SourceError::GitFailed {
                repository: path.display().to_string(),
                status: output.status.to_string(),
            });
        }
        let top_level = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());

        // no origin is fine, commits get a file:// url then
        let remote = Command::new("git")
            .current_dir(&top_level)
            .args(["remote", "get-url", "origin"])
            .output()
            .await?;
        let remote = if remote.status.success() {
            Some(String::from_utf8_lossy(&remote.stdout).trim().to_owned())
        } else {
            debug!("No origin in {}", top_level.display());
            None
        };

        let head = Command::new("git")
            .current_dir(&top_level)
            .args(["rev-parse", "--verify", "-q", "HEAD"])
            .output()
            .await?;

        let mut repository = Self::from_parts(top_level, remote.as_deref());
        repository.has_commits = head.status.success();
        if !repository.has_commits {
            warn!("{} has no commits yet", repository.path.display());
        }
        info!(
            "Opened repository {} at {} ({:?})",
            repository.name,
            repository.path.display(),
            repository.web_url
        );
        Ok(repository)
    }

    pub fn from_parts(path: PathBuf, remote: Option<&str>) -> Self {
        let name = remote
            .and_then(remote::repository_name)
            .or_else(|| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| path.display().to_string());
        Self {
            web_url: remote.and_then(remote::web_url),
            has_commits: true,
            name,
            path,
        }
    }

    pub fn commit_url(&self, sha: &str) -> String {
        match &self.web_url {
            Some(base) => format!("{base}/commit/{sha}"),
            None => format!("file://{}#{sha}", self.path.display()),
        }
    }
}
