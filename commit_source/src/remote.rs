use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

lazy_static! {
    static ref URL_REMOTE: Regex = Regex::new(
        r#"(?x)
        ^(?:https?|ssh|git)://
        (?:[^@/]+@)?            # user
        (?P<host>[^:/]+)
        (?::\d+)?               # port
        /(?P<path>.+?)
        (?:\.git)?/?$
        "#,
    )
    .unwrap();
    static ref SCP_REMOTE: Regex = Regex::new(
        r#"(?x)
        ^(?:[^@/]+@)?
        (?P<host>[^:/]+)
        :(?P<path>[^/].*?)
        (?:\.git)?/?$
        "#,
    )
    .unwrap();
    static ref NOREPLY_EMAIL: Regex = Regex::new(
        r"^(?:(?P<id>\d+)\+)?(?P<login>[^@+]+)@users\.noreply\.github\.com$"
    )
    .unwrap();
}

fn host_and_path(remote: &str) -> Option<(&str, &str)> {
    let captures = URL_REMOTE
        .captures(remote)
        .or_else(|| SCP_REMOTE.captures(remote))?;
    let host = captures.name("host")?.as_str();
    let path = captures.name("path")?.as_str();
    Some((host, path))
}

/// Browsable https url of a remote, `None` for local or unrecognized remotes.
pub fn web_url(remote: &str) -> Option<String> {
    let remote = remote.trim();
    let url = host_and_path(remote).map(|(host, path)| format!("https://{host}/{path}"));
    debug!("remote='{}' web_url={:?}", remote, url);
    url
}

/// Last path segment of the remote without `.git`, eg. `project` for `git@github.com:owner/project.git`
pub fn repository_name(remote: &str) -> Option<String> {
    let (_, path) = host_and_path(remote.trim())?;
    path.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
}

/// Avatar reference for an author email. Only GitHub noreply addresses carry enough
/// information, everything else gets an empty reference.
pub fn avatar_from_email(email: &str) -> String {
    match NOREPLY_EMAIL.captures(email) {
        Some(c) => match c.name("id") {
            Some(id) => format!("https://avatars.githubusercontent.com/u/{}?v=4", id.as_str()),
            None => format!("https://github.com/{}.png", &c["login"]),
        },
        None => String::new(),
    }
}

#[cfg(test)]
mod test {
    use super::{avatar_from_email, repository_name, web_url};

    #[test]
    fn web_url_from_scp_like_remote() {
        assert_eq!(
            web_url("git@github.com:owner/project.git").as_deref(),
            Some("https://github.com/owner/project")
        );
    }

    #[test]
    fn web_url_from_url_remotes() {
        assert_eq!(
            web_url("https://github.com/owner/repo.git").as_deref(),
            Some("https://github.com/owner/repo")
        );
        assert_eq!(
            web_url("https://github.com/owner/repo").as_deref(),
            Some("https://github.com/owner/repo")
        );
        assert_eq!(
            web_url("ssh://git@gitlab.example.com:2222/group/sub/repo.git\n").as_deref(),
            Some("https://gitlab.example.com/group/sub/repo")
        );
    }

    #[test]
    fn local_remotes_have_no_web_url() {
        assert_eq!(web_url("/srv/git/repo.git"), None);
        assert_eq!(web_url("file:///srv/git/repo.git"), None);
        assert_eq!(web_url(""), None);
    }

    #[test]
    fn repository_name_is_last_segment() {
        assert_eq!(
            repository_name("git@github.com:owner/project.git").as_deref(),
            Some("project")
        );
        assert_eq!(
            repository_name("https://gitlab.com/a/b/c").as_deref(),
            Some("c")
        );
        assert_eq!(repository_name("../local"), None);
    }

    #[test]
    fn avatars() {
        assert_eq!(
            avatar_from_email("12345+ana@users.noreply.github.com"),
            "https://avatars.githubusercontent.com/u/12345?v=4"
        );
        assert_eq!(
            avatar_from_email("bob@users.noreply.github.com"),
            "https://github.com/bob.png"
        );
        assert_eq!(avatar_from_email("carol@example.com"), "");
    }
}
