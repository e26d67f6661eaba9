use thiserror::Error;

/// Fatal errors that end a collection run.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("authentication failed: {reason}")]
    Authentication { reason: String },

    #[error("could not navigate to feed for \"{query}\": {reason}")]
    Navigation { query: String, reason: String },

    #[error("feed provider failed during {operation}: {reason}")]
    Provider {
        operation: &'static str,
        reason: String,
    },

    #[error("invalid feed fixture {path}: {reason}")]
    Fixture { path: String, reason: String },
}

/// Per-candidate extraction failure. Never fatal: the loop logs it and
/// skips the candidate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("candidate has no permalink")]
    MissingPermalink,

    #[error("permalink {url} carries no status id")]
    MissingStatusId { url: String },
}
