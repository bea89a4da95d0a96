use std::fmt;

use chrono::NaiveDate;

/// Format of calendar dates on the wire and in user input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Complete filter tuple for one commit lookup. Both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitQuery {
    pub author: String,
    pub since: NaiveDate,
    pub until: NaiveDate,
}

impl CommitQuery {
    pub fn new(author: impl Into<String>, since: NaiveDate, until: NaiveDate) -> Self {
        Self {
            author: author.into(),
            since,
            until,
        }
    }

    pub fn since_param(&self) -> String {
        self.since.format(DATE_FORMAT).to_string()
    }

    pub fn until_param(&self) -> String {
        self.until.format(DATE_FORMAT).to_string()
    }
}

impl fmt::Display for CommitQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "author={} since={} until={}",
            self.author,
            self.since_param(),
            self.until_param()
        )
    }
}
