//! Library error type
//!
//! Everything below the CLI layer reports failures through [`Error`]; the
//! command implementations wrap it in `anyhow` with extra context.

use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{origin} is not valid YAML: {source}")]
    Yaml {
        origin: String,
        #[source]
        source: serde_yml::Error,
    },

    #[error("invalid regular expression in `{field}`: {source}")]
    Regex {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("configuration is invalid ({errors} error(s))")]
    InvalidConfig { errors: usize },

    #[error("hook `{id}` has an entry that cannot be split into arguments: {entry}")]
    Entry { id: String, entry: String },

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("hook `{id}` timed out after {}s", timeout.as_secs())]
    Timeout { id: String, timeout: Duration },

    #[error("failed to render settings as {format}: {message}")]
    Export { format: String, message: String },

    #[error(transparent)]
    Git(#[from] git2::Error),

    #[error(transparent)]
    Settings(#[from] figment::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_path() {
        let err = Error::io(
            "missing.yaml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        let message = err.to_string();
        assert!(message.contains("missing.yaml"));
        assert!(message.contains("no such file"));
    }

    #[test]
    fn timeout_reports_seconds() {
        let err = Error::Timeout {
            id: "mypy".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "hook `mypy` timed out after 30s");
    }
}
