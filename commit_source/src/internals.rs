use std::{collections::BTreeMap, path::Path};

use async_stream::try_stream;
use chrono::DateTime;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    process::{Child, Command},
};
use tokio_stream::Stream;

use crate::{remote, Commit, CommitAuthor, CommitQuery, Contributor, Repository, SourceError};

const SEPARATOR: char = '\x1f';

/// %aN author name, %aE author email
pub const CONTRIBUTOR_FORMAT: &str = "--format=%aN\x1f%aE";
/// %cI strict ISO 8601 committer date
pub const COMMIT_FORMAT: &str = "--format=%H\x1f%aN\x1f%aE\x1f%cI\x1f%s";

/// Lines with an empty author name are skipped, a login is never empty.
pub fn contributor_from_line(line: &str) -> Option<Contributor> {
    let mut split = line.splitn(2, SEPARATOR);
    let login = split.next().filter(|login| !login.is_empty())?;
    let email = split.next().unwrap_or("");
    Some(Contributor::new(login, remote::avatar_from_email(email)))
}

pub fn commit_from_line(line: &str, repository: &Repository) -> Result<Commit, SourceError> {
    let mut split = line.splitn(5, SEPARATOR);
    let mut field = |name: &str| {
        split
            .next()
            .ok_or_else(|| SourceError::Parse(format!("no {name} in '{line}'")))
    };
    let sha = field("hash")?;
    let login = field("author")?;
    let email = field("email")?;
    let date = field("date")?;
    let message = field("subject")?;

    let committed_at = DateTime::parse_from_rfc3339(date)
        .map_err(|e| SourceError::Parse(format!("bad date '{date}': {e}")))?;

    Ok(Commit {
        sha: sha.to_owned(),
        author: CommitAuthor {
            login: login.to_owned(),
            avatar: remote::avatar_from_email(email),
        },
        repo: repository.name.clone(),
        message: message.to_owned(),
        committed_at,
        url: repository.commit_url(sha),
    })
}

/// Directory keyed by login. The first non empty avatar seen for a login is kept.
pub fn merge_contributors<I>(contributors: I) -> Vec<Contributor>
where
    I: IntoIterator<Item = Contributor>,
{
    contributors
        .into_iter()
        .fold(BTreeMap::<String, Contributor>::new(), |mut acc, c| {
            match acc.get_mut(&c.login) {
                Some(known) if !known.has_avatar() => known.avatar_url = c.avatar_url,
                Some(_) => {}
                None => {
                    acc.insert(c.login.clone(), c);
                }
            }
            acc
        })
        .into_values()
        .collect()
}

/// Newest first, ties are broken by repository so the order is stable between reloads.
pub fn sort_newest_first(commits: &mut [Commit]) {
    commits.sort_by(|a, b| {
        b.committed_at
            .cmp(&a.committed_at)
            .then_with(|| a.repo.cmp(&b.repo))
    });
}

pub fn contributors_command(repository: &Path, revisions: &[&str]) -> Command {
    let mut command = Command::new("git");
    command
        .kill_on_drop(true)
        .current_dir(repository)
        .arg("log")
        .arg(CONTRIBUTOR_FORMAT)
        .args(revisions)
        .arg("--");
    command
}

/// Author is matched as fixed string, callers still have to check for exact equality.
pub fn commits_command(repository: &Path, query: &CommitQuery, revisions: &[&str]) -> Command {
    let mut command = Command::new("git");
    command
        .kill_on_drop(true)
        .current_dir(repository)
        .args(["log", "--fixed-strings"])
        .arg(format!("--author={}", query.author))
        // date only values would take the current time of day
        .arg(format!("--since={} 00:00:00", query.since_param()))
        .arg(format!("--until={} 23:59:59", query.until_param()))
        .arg(COMMIT_FORMAT)
        .args(revisions)
        .arg("--");
    command
}

pub fn spawn(mut command: Command) -> Result<Child, std::io::Error> {
    command
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::null())
        .spawn()
}

/// Lines of git output. Ends with an error if git exits unsuccessfully.
pub fn git_lines(
    mut child: Child,
    repository: String,
) -> impl Stream<Item = Result<String, SourceError>> {
    try_stream! {
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SourceError::NoOutput(repository.clone()))?;
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await? {
            yield line;
        }

        let status = child.wait().await?;
        if !status.success() {
            Err::<(), _>(SourceError::GitFailed { repository, status: status.to_string() })?;
        }
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use chrono::DateTime;

    use super::*;

    fn repository() -> Repository {
        Repository::from_parts(
            PathBuf::from("/tmp/work"),
            Some("https://github.com/owner/work.git"),
        )
    }

    fn commit(sha: &str, repo: &str, date: &str) -> Commit {
        Commit {
            sha: sha.to_owned(),
            author: CommitAuthor {
                login: "ana".to_owned(),
                avatar: String::new(),
            },
            repo: repo.to_owned(),
            message: String::new(),
            committed_at: DateTime::parse_from_rfc3339(date).unwrap(),
            url: String::new(),
        }
    }

    #[test]
    fn parses_commit_line() {
        let line = "0123456789abcdef\x1fana\x1f7+ana@users.noreply.github.com\x1f2024-01-15T10:00:00+01:00\x1fFix: a\x1fb";
        let commit = commit_from_line(line, &repository()).unwrap();
        assert_eq!(commit.sha, "0123456789abcdef");
        assert_eq!(commit.short_sha(), "01234567");
        assert_eq!(commit.author.login, "ana");
        assert_eq!(
            commit.author.avatar,
            "https://avatars.githubusercontent.com/u/7?v=4"
        );
        assert_eq!(commit.repo, "work");
        // separator inside the subject belongs to the subject
        assert_eq!(commit.message, "Fix: a\x1fb");
        assert_eq!(
            commit.url,
            "https://github.com/owner/work/commit/0123456789abcdef"
        );
        assert_eq!(commit.committed_at.to_rfc3339(), "2024-01-15T10:00:00+01:00");
    }

    #[test]
    fn empty_subject_is_allowed() {
        let line = "abc\x1fana\x1fana@example.com\x1f2024-01-15T10:00:00Z\x1f";
        let commit = commit_from_line(line, &repository()).unwrap();
        assert_eq!(commit.message, "");
        assert_eq!(commit.author.avatar, "");
    }

    #[test]
    fn truncated_or_bad_lines_are_errors() {
        assert!(matches!(
            commit_from_line("abc\x1fana", &repository()),
            Err(SourceError::Parse(_))
        ));
        assert!(matches!(
            commit_from_line("abc\x1fana\x1fe\x1fyesterday\x1fs", &repository()),
            Err(SourceError::Parse(_))
        ));
    }

    #[test]
    fn contributor_lines() {
        assert_eq!(
            contributor_from_line("bob\x1fbob@users.noreply.github.com"),
            Some(Contributor::new("bob", "https://github.com/bob.png"))
        );
        assert_eq!(
            contributor_from_line("carol"),
            Some(Contributor::new("carol", ""))
        );
        assert_eq!(contributor_from_line("\x1fnobody@example.com"), None);
    }

    #[test]
    fn merge_is_keyed_by_login() {
        let merged = merge_contributors(vec![
            Contributor::new("bob", ""),
            Contributor::new("ana", "a.png"),
            Contributor::new("bob", "b.png"),
            Contributor::new("bob", "other.png"),
            Contributor::new("Bob", ""),
        ]);
        assert_eq!(
            merged,
            vec![
                Contributor::new("Bob", ""),
                Contributor::new("ana", "a.png"),
                Contributor::new("bob", "b.png"),
            ]
        );
    }

    #[test]
    fn newest_first() {
        let mut commits = vec![
            commit("old", "b", "2024-01-01T10:00:00Z"),
            commit("new", "b", "2024-01-03T10:00:00Z"),
            commit("tie-b", "b", "2024-01-02T10:00:00Z"),
            // same instant in another offset
            commit("tie-a", "a", "2024-01-02T11:00:00+01:00"),
        ];
        sort_newest_first(&mut commits);
        let shas: Vec<_> = commits.iter().map(|c| c.sha.as_str()).collect();
        assert_eq!(shas, vec!["new", "tie-a", "tie-b", "old"]);
    }
}
