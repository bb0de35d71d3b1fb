use thiserror::Error;

/// Errors produced while resolving a media query.
///
/// Only `InvalidInput` ever reaches callers of [`crate::Resolver::resolve`];
/// the other kinds are converted into empty result lists at the orchestrator
/// boundary so a failed lookup renders as "no results" rather than an error.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("empty query")]
    InvalidInput,

    #[error("lookup failed: {0}")]
    LookupFailed(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("no match: {0}")]
    NoMatch(String),
}

impl From<reqwest::Error> for ResolveError {
    fn from(e: reqwest::Error) -> Self {
        ResolveError::LookupFailed(e.to_string())
    }
}

impl From<serde_json::Error> for ResolveError {
    fn from(e: serde_json::Error) -> Self {
        ResolveError::LookupFailed(format!("unexpected response shape: {}", e))
    }
}
