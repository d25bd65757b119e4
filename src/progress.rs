//! Progress-callback trait for per-document batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::AnalyzerConfigBuilder::progress_callback`] to receive
//! real-time events as the batch processes each document.
//!
//! Callbacks are the least-invasive integration point: the CLI forwards
//! events to an indicatif progress bar, while library embedders can forward
//! them to channels or UI state without the library knowing how the host
//! application communicates. The batch worker is single-threaded, but the
//! trait is `Send + Sync` so callbacks can be shared across tasks.

use std::sync::Arc;

/// Called by the batch orchestrator as it processes each document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once before any document is analysed.
    fn on_batch_start(&self, total_docs: usize) {
        let _ = total_docs;
    }

    /// Called when a document is picked up (before the cache lookup).
    ///
    /// `index` is 1-based and matches the input order.
    fn on_document_start(&self, index: usize, total: usize, filename: &str) {
        let _ = (index, total, filename);
    }

    /// Called when a document finishes without an error.
    ///
    /// `from_cache` is true when the result was served from the cache and no
    /// remote call was made.
    fn on_document_complete(&self, index: usize, total: usize, filename: &str, from_cache: bool) {
        let _ = (index, total, filename, from_cache);
    }

    /// Called when a document exhausts its retries and is recorded as failed.
    fn on_document_error(&self, index: usize, total: usize, filename: &str, error: &str) {
        let _ = (index, total, filename, error);
    }

    /// Called once after every document has been attempted.
    fn on_batch_complete(&self, total: usize, successful: usize, cached: usize) {
        let _ = (total, successful, cached);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::AnalyzerConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
