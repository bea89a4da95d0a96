use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("No repositories to read from")]
    NoRepositories,

    #[error("git did not output anything for {0}")]
    NoOutput(String),

    #[error("git failed in {repository}: {status}")]
    GitFailed { repository: String, status: String },

    #[error("Could not parse git output: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
