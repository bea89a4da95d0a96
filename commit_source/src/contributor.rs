/// Author known to at least one of the configured repositories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Contributor {
    pub login: String,
    /// Empty when no avatar could be derived for this author.
    pub avatar_url: String,
}

impl Contributor {
    pub fn new(login: impl Into<String>, avatar_url: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            avatar_url: avatar_url.into(),
        }
    }

    pub fn has_avatar(&self) -> bool {
        !self.avatar_url.is_empty()
    }
}
