use std::{path::Path, process::Command, sync::Once};

use chrono::NaiveDate;
use commit_source::{CommitQuery, CommitSource, Contributor, GitSource, SourceError};
use tempfile::TempDir;

static ENVIRONMENT: Once = Once::new();

/// Process wide settings inherited by every git the source spawns. Set once, before any test
/// starts a git process.
fn setup_environment() {
    ENVIRONMENT.call_once(|| {
        // --since/--until are read in local time
        std::env::set_var("TZ", "UTC");
        // keeps git from discovering a repository above the temporary directories
        std::env::set_var("GIT_CEILING_DIRECTORIES", std::env::temp_dir());
    });
}

fn git_available() -> bool {
    setup_environment();
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .current_dir(dir)
        .env("HOME", dir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .args(args)
        .status()
        .expect("git could not be started");
    assert!(status.success(), "git {:?} failed", args);
}

fn commit(dir: &Path, name: &str, email: &str, date: &str, message: &str) {
    let status = Command::new("git")
        .current_dir(dir)
        .env("HOME", dir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_AUTHOR_NAME", name)
        .env("GIT_AUTHOR_EMAIL", email)
        .env("GIT_AUTHOR_DATE", date)
        .env("GIT_COMMITTER_NAME", name)
        .env("GIT_COMMITTER_EMAIL", email)
        .env("GIT_COMMITTER_DATE", date)
        .args([
            "-c",
            "commit.gpgsign=false",
            "commit",
            "--quiet",
            "--allow-empty",
            "-m",
            message,
        ])
        .status()
        .expect("git could not be started");
    assert!(status.success(), "commit '{}' failed", message);
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Two repositories, `first` without remote and `second` with a GitHub origin.
fn fixture() -> TempDir {
    let root = tempfile::tempdir().unwrap();

    let first = root.path().join("first");
    std::fs::create_dir(&first).unwrap();
    git(&first, &["init", "--quiet"]);
    commit(&first, "ana", "ana@example.com", "2024-01-05T12:00:00+00:00", "ana start");
    commit(&first, "bob", "bob@users.noreply.github.com", "2024-01-10T12:00:00+00:00", "bob first");
    commit(&first, "bob smith", "smith@example.com", "2024-01-12T12:00:00+00:00", "not bob");
    commit(&first, "bob", "bob@example.com", "2024-02-10T12:00:00+00:00", "bob later");

    let second = root.path().join("second");
    std::fs::create_dir(&second).unwrap();
    git(&second, &["init", "--quiet"]);
    git(&second, &["remote", "add", "origin", "git@github.com:owner/second.git"]);
    commit(&second, "bob", "bob@example.com", "2024-01-20T12:00:00+00:00", "bob second repo");
    commit(&second, "bob", "bob@example.com", "2024-01-31T12:00:00+00:00", "bob last day");

    root
}

#[tokio::test]
async fn contributors_across_repositories() {
    if !git_available() {
        return;
    }
    let root = fixture();
    let source = GitSource::open(&[root.path().join("first"), root.path().join("second")], false)
        .await
        .unwrap();

    let contributors = source.list_contributors().await.unwrap();
    assert_eq!(
        contributors,
        vec![
            Contributor::new("ana", ""),
            Contributor::new("bob", "https://github.com/bob.png"),
            Contributor::new("bob smith", ""),
        ]
    );
}

#[tokio::test]
async fn commits_of_author_within_inclusive_window() {
    if !git_available() {
        return;
    }
    let root = fixture();
    let source = GitSource::open(&[root.path().join("first"), root.path().join("second")], false)
        .await
        .unwrap();
    assert_eq!(source.repositories().len(), 2);

    let commits = source
        .list_commits(&CommitQuery::new("bob", date(2024, 1, 10), date(2024, 1, 31)))
        .await
        .unwrap();

    let messages: Vec<_> = commits.iter().map(|c| c.message.as_str()).collect();
    assert_eq!(messages, vec!["bob last day", "bob second repo", "bob first"]);
    assert_eq!(commits[0].repo, "second");
    assert!(commits[0]
        .url
        .starts_with("https://github.com/owner/second/commit/"));
    assert_eq!(commits[2].repo, "first");
    assert!(commits[2].url.starts_with("file://"));
    assert!(commits.iter().all(|c| c.author.login == "bob"));
}

#[tokio::test]
async fn empty_window_is_not_an_error() {
    if !git_available() {
        return;
    }
    let root = fixture();
    let source = GitSource::open(&[root.path().join("first")], true).await.unwrap();

    let commits = source
        .list_commits(&CommitQuery::new("ana", date(2023, 1, 1), date(2023, 12, 31)))
        .await
        .unwrap();
    assert!(commits.is_empty());
}

#[tokio::test]
async fn opening_fails_outside_of_repository() {
    if !git_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let result = GitSource::open(&[dir.path()], false).await;
    assert!(matches!(result, Err(SourceError::GitFailed { .. })));

    let none: [&Path; 0] = [];
    assert!(matches!(
        GitSource::open(&none, false).await,
        Err(SourceError::NoRepositories)
    ));
}

#[tokio::test]
async fn repository_without_commits_is_empty() {
    if !git_available() {
        return;
    }
    let root = fixture();
    let empty = root.path().join("empty");
    std::fs::create_dir(&empty).unwrap();
    git(&empty, &["init", "--quiet"]);

    let source = GitSource::open(&[root.path().join("first"), empty], false)
        .await
        .unwrap();
    assert!(source.repositories()[0].has_commits);
    assert!(!source.repositories()[1].has_commits);

    let contributors = source.list_contributors().await.unwrap();
    let logins: Vec<_> = contributors.iter().map(|c| c.login.as_str()).collect();
    assert_eq!(logins, vec!["ana", "bob", "bob smith"]);

    let commits = source
        .list_commits(&CommitQuery::new("ana", date(2024, 1, 1), date(2024, 1, 31)))
        .await
        .unwrap();
    let messages: Vec<_> = commits.iter().map(|c| c.message.as_str()).collect();
    assert_eq!(messages, vec!["ana start"]);
}
