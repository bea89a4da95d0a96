use std::{collections::HashSet, path::Path};

use async_trait::async_trait;
use futures::future::try_join_all;
use log::{debug, warn};
use tokio_stream::StreamExt;

use crate::{
    internals, Commit, CommitQuery, CommitSource, Contributor, Repository, SourceError,
};

/// Reads contributors and commits with `git log` from a set of local repositories.
#[derive(Debug, Clone)]
pub struct GitSource {
    repositories: Vec<Repository>,
    all_refs: bool,
}

impl GitSource {
    pub async fn open<P: AsRef<Path>>(paths: &[P], all_refs: bool) -> Result<Self, SourceError> {
        if paths.is_empty() {
            return Err(SourceError::NoRepositories);
        }
        let mut repositories = try_join_all(paths.iter().map(|p| Repository::open(p.as_ref()))).await?;
        // the same work tree given twice would list every commit twice
        let mut seen = HashSet::new();
        repositories.retain(|r| seen.insert(r.path.clone()));
        Ok(Self::new(repositories, all_refs))
    }

    pub fn new(repositories: Vec<Repository>, all_refs: bool) -> Self {
        Self {
            repositories,
            all_refs,
        }
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    fn revisions(&self) -> &'static [&'static str] {
        if self.all_refs {
            &["--all"]
        } else {
            &["HEAD"]
        }
    }

    async fn contributors_in(&self, repository: &Repository) -> Result<Vec<Contributor>, SourceError> {
        if !repository.has_commits {
            debug!("{}: no commits, no contributors", repository.name);
            return Ok(Vec::new());
        }
        let child = internals::spawn(internals::contributors_command(
            &repository.path,
            self.revisions(),
        ))?;
        let lines: Vec<String> = internals::git_lines(child, repository.name.clone())
            .collect::<Result<_, _>>()
            .await?;
        debug!("{}: {} author lines", repository.name, lines.len());
        Ok(internals::merge_contributors(
            lines.iter().filter_map(|l| internals::contributor_from_line(l)),
        ))
    }

    async fn commits_in(
        &self,
        repository: &Repository,
        query: &CommitQuery,
    ) -> Result<Vec<Commit>, SourceError> {
        // git log fails on an unborn HEAD
        if !repository.has_commits {
            return Ok(Vec::new());
        }
        let child = internals::spawn(internals::commits_command(
            &repository.path,
            query,
            self.revisions(),
        ))?;
        let lines: Vec<String> = internals::git_lines(child, repository.name.clone())
            .collect::<Result<_, _>>()
            .await?;

        let mut commits = Vec::with_capacity(lines.len());
        for line in &lines {
            let commit = internals::commit_from_line(line, repository)?;
            // --author matches substrings of "name <email>"
            if commit.author.login == query.author {
                commits.push(commit);
            }
        }
        debug!("{}: {} commits for {}", repository.name, commits.len(), query);
        Ok(commits)
    }
}

#[async_trait]
impl CommitSource for GitSource {
    async fn list_contributors(&self) -> Result<Vec<Contributor>, SourceError> {
        let per_repository = try_join_all(self.repositories.iter().map(|r| self.contributors_in(r))).await?;
        let contributors = internals::merge_contributors(per_repository.into_iter().flatten());
        if contributors.is_empty() {
            warn!("No contributors in {} repositories", self.repositories.len());
        }
        Ok(contributors)
    }

    async fn list_commits(&self, query: &CommitQuery) -> Result<Vec<Commit>, SourceError> {
        let per_repository = try_join_all(
            self.repositories
                .iter()
                .map(|r| self.commits_in(r, query)),
        )
        .await?;
        let mut commits: Vec<Commit> = per_repository.into_iter().flatten().collect();
        internals::sort_newest_first(&mut commits);
        Ok(commits)
    }
}
