//! The contract between the collection loop and an incrementally loading feed.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::CollectorError;
use crate::extract::RawCandidate;

/// An externally owned feed that reveals more content each time it is
/// advanced.
///
/// Implementations may drive a browser session, call an authenticated API
/// client, or replay a recorded fixture. The loop calls these methods one at
/// a time and never concurrently.
///
/// A provider is a scoped resource: [`crate::harvest`] acquires it for one
/// run and always calls [`FeedProvider::close`] on the way out.
#[async_trait]
pub trait FeedProvider: Send {
    /// Opaque provider-specific record, extracted per candidate.
    type Candidate: RawCandidate + Send;

    /// Progress signal (e.g. content height). Only compared for equality.
    type Signal: PartialEq + Debug + Send;

    /// Establishes a session with the feed. Defaults to a no-op for
    /// providers that need no credentials.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Authentication`] when the session cannot be
    /// established.
    async fn authenticate(&mut self) -> Result<(), CollectorError> {
        Ok(())
    }

    /// Opens the feed view for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Navigation`] when the view is unreachable.
    async fn navigate(&mut self, query: &str) -> Result<(), CollectorError>;

    /// Returns the candidates currently visible. Consecutive calls may
    /// return overlapping content.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Provider`] when the view cannot be read.
    async fn fetch_visible_candidates(&mut self) -> Result<Vec<Self::Candidate>, CollectorError>;

    /// Asks the feed to reveal more content (scroll or paginate).
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Provider`] when the request cannot be issued.
    async fn advance(&mut self) -> Result<(), CollectorError>;

    /// Reads the current progress signal.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Provider`] when the signal cannot be read.
    async fn progress_signal(&mut self) -> Result<Self::Signal, CollectorError>;

    /// Releases the session.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Provider`] when teardown fails.
    async fn close(&mut self) -> Result<(), CollectorError> {
        Ok(())
    }
}
