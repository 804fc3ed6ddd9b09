//! Error type shared by every stage of a manifest update.

use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort an update or a cache read.
///
/// A non-200 response is not an error; see [`crate::cache::Update::Rejected`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("request to {url} failed: {source}")]
    Request {
        /// Endpoint that was requested.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body is not a JSON document.
    #[error("response body is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    /// The parsed document could not be written back out as JSON.
    #[error("failed to encode manifest: {0}")]
    Encode(#[source] serde_json::Error),

    /// A filesystem operation on `path` failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// File or directory the operation targeted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Neither `$HOME` nor the platform equivalent resolved to a directory.
    #[error("unable to determine the user's home directory")]
    NoHomeDir,

    /// The log file appender could not be created.
    #[error("failed to open log file: {0}")]
    LogInit(#[from] tracing_appender::rolling::InitError),

    /// A cached document does not have the version manifest shape.
    #[error("cached document is not a version manifest: {0}")]
    Manifest(#[source] serde_json::Error),
}

impl Error {
    /// What: Build an [`Error::Io`] for a path-bound filesystem failure.
    ///
    /// Inputs:
    /// - `path`: File or directory the failing operation touched
    ///
    /// Output:
    /// - Closure suitable for `map_err` on an `io::Result`
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

#[cfg(test)]
mod tests {
    use super::Error;
    use std::path::Path;

    /// What: Io errors name the offending path in their message.
    ///
    /// Inputs:
    /// - A permission-denied `io::Error` bound to `/tmp/cache.json`
    ///
    /// Output:
    /// - Display output starts with the path
    #[test]
    fn io_error_display_includes_path() {
        let err = Error::io(Path::new("/tmp/cache.json"))(std::io::Error::from(
            std::io::ErrorKind::PermissionDenied,
        ));
        let text = err.to_string();
        assert!(text.starts_with("/tmp/cache.json: "), "unexpected: {text}");
    }

    #[test]
    fn decode_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        let err = Error::Decode(source);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("response body is not valid JSON"));
    }

    #[test]
    fn no_home_dir_message() {
        assert_eq!(
            Error::NoHomeDir.to_string(),
            "unable to determine the user's home directory"
        );
    }
}
