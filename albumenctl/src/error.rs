use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures of the site build pipeline.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(
        "GITHUB_TOKEN environment variable is required to fetch the site repository"
    )]
    MissingToken,

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to start `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` {}", describe_exit(.code))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("build output directory {} does not exist", .0.display())]
    BuildOutputMissing(PathBuf),
}

impl BuildError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
