//! Error types for the download module.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors that can occur while downloading an episode stream.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Resolving (episode, voice, quality) to a stream failed before any
    /// bytes moved. Carries the catalog taxonomy through unchanged, so the
    /// not-found race (stream gone at download time) stays distinguishable
    /// from transport failure.
    #[error(transparent)]
    Resolve(#[from] CatalogError),

    /// The stream broke mid-transfer (network error or timeout while
    /// reading the body).
    #[error("stream interrupted: {source}")]
    Stream {
        /// The transport failure that cut the stream.
        #[source]
        source: CatalogError,
    },

    /// File system error during download (create, write, flush, rename).
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The download was cancelled cooperatively; the temporary file has
    /// been discarded and nothing was placed at the final path.
    #[error("download cancelled")]
    Cancelled,
}

impl DownloadError {
    /// Creates a mid-stream transport error.
    pub(crate) fn stream(source: CatalogError) -> Self {
        Self::Stream { source }
    }

    /// Creates an IO error.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the requested entity (episode, voice, or quality) does not
    /// exist; the expected, catchable signal.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Resolve(inner) if inner.is_not_found())
    }

    /// True for the cooperative cancellation outcome.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_not_found_passes_through() {
        let error = DownloadError::from(CatalogError::not_found("stream v1 at 720p"));
        assert!(error.is_not_found());
        assert!(!error.is_cancelled());
    }

    #[test]
    fn test_stream_error_is_not_not_found() {
        let error = DownloadError::stream(CatalogError::timeout("http://cdn.test/720"));
        assert!(!error.is_not_found());
        assert!(error.to_string().contains("stream interrupted"));
    }

    #[test]
    fn test_cancelled_display() {
        let error = DownloadError::Cancelled;
        assert!(error.is_cancelled());
        assert_eq!(error.to_string(), "download cancelled");
    }

    #[test]
    fn test_io_error_names_path() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = DownloadError::io(PathBuf::from("/tmp/out.mp4.part"), source);
        assert!(error.to_string().contains("/tmp/out.mp4.part"));
    }
}
