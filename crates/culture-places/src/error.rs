//! Error types for places search.

/// Errors from a catalog search.
///
/// Every variant except `EmptyQuery` leaves the catalog empty.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search query cannot be empty")]
    EmptyQuery,
    #[error("places search credential is not configured")]
    MissingCredential,
    #[error("places search request failed: {0}")]
    Transport(String),
    #[error("places search returned {status}: {message}")]
    Http { status: u16, message: String },
    #[error("malformed places response: {0}")]
    Malformed(String),
    #[error("no places found for \"{0}\"")]
    NoResults(String),
}

impl SearchError {
    /// Whether the catalog must be cleared after this failure.
    pub fn clears_catalog(&self) -> bool {
        !matches!(self, SearchError::EmptyQuery)
    }
}
