//! Error types for proxy checking and list aggregation

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while probing proxies, fetching lists or persisting results.
///
/// Probe-level variants (`Transport`, `Timeout`, `UnexpectedStatus`) never
/// escape the checker: they are rendered into the `error` field of a failed
/// outcome. `ResponseParse` is downgraded to a missing `real_ip`.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection, DNS or client setup failure
    #[error("{0}")]
    Transport(String),

    /// The request did not complete within the probe timeout
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The test endpoint answered with something other than 200
    #[error("HTTP {0}")]
    UnexpectedStatus(u16),

    /// A 200 response whose body carried no usable origin
    #[error("unable to parse response body: {0}")]
    ResponseParse(String),

    /// A remote proxy list could not be fetched
    #[error("{source_name}: {message}")]
    SourceFetch {
        source_name: String,
        message: String,
    },

    /// The input list given to the checker does not exist
    #[error("File '{}' not found", .0.display())]
    InputNotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn source_fetch<S: Into<String>, M: Into<String>>(source_name: S, message: M) -> Self {
        Self::SourceFetch {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_display() {
        assert_eq!(Error::UnexpectedStatus(403).to_string(), "HTTP 403");
    }

    #[test]
    fn test_timeout_display() {
        let err = Error::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "timed out after 10s");
    }

    #[test]
    fn test_input_not_found_display() {
        let err = Error::InputNotFound(PathBuf::from("proxies.txt"));
        assert_eq!(err.to_string(), "File 'proxies.txt' not found");
    }

    #[test]
    fn test_source_fetch_display() {
        let err = Error::source_fetch("proxyscrape HTTP", "HTTP 503");
        assert_eq!(err.to_string(), "proxyscrape HTTP: HTTP 503");
    }
}
