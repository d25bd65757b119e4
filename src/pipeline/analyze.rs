//! Per-document analysis driver and the sequential batch orchestrator.
//!
//! ## Retry Strategy
//!
//! Remote completion APIs fail transiently (quota spikes, overloaded
//! backends, truncated responses). Each document gets a fixed ceiling of
//! attempts with linear backoff between them: with the default 2 s base the
//! wait sequence is 2 s → 4 s, so a fully failing document blocks the batch
//! for at most a few seconds before its error is recorded and the run moves
//! on. An empty completion counts as a failure — a blank analysis is never a
//! useful result.
//!
//! ## Ordering & pacing
//!
//! Documents are processed one at a time in input order and results come
//! back in the same order regardless of the cache hit/miss mix. A short
//! pacing sleep follows every remote call (never a cache hit) to stay under
//! provider rate limits.

use crate::cache::CacheStore;
use crate::client::AnalysisClient;
use crate::config::AnalyzerConfig;
use crate::document::{AnalysisResult, PdfDocument};
use crate::error::ClientError;
use crate::pipeline::parse::parse_response;
use crate::prompts::build_analysis_prompt;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Summary text recorded for documents with no extractable text.
///
/// Such results carry `error = None` even though no analysis happened; this
/// mirrors long-standing behaviour that downstream accounting relies on, so
/// consumers needing strict success checks match on this marker as well.
pub const EMPTY_DOCUMENT_SUMMARY: &str = "Document contains no extractable text";

/// Analyse a single document with the remote client.
///
/// State machine per document: empty-text short-circuit, truncation to the
/// character budget, prompt construction, then the retry loop. Never returns
/// an `Err` — all failures end up in the result's `error` field so the batch
/// can continue.
pub async fn analyze_document<C>(
    client: &C,
    doc: &PdfDocument,
    config: &AnalyzerConfig,
) -> AnalysisResult
where
    C: AnalysisClient + ?Sized,
{
    debug!("Analyzing: {}", doc.filename);

    if doc.text.trim().is_empty() {
        warn!("Empty document: {}", doc.filename);
        return AnalysisResult {
            filename: doc.filename.clone(),
            summary: EMPTY_DOCUMENT_SUMMARY.to_string(),
            key_entities: String::new(),
            action_items: String::new(),
            keywords: Vec::new(),
            raw_response: String::new(),
            error: None,
        };
    }

    // Truncate on a char boundary at the configured budget; no attempt to
    // respect word boundaries.
    let mut text = doc.text.as_str();
    if let Some((cut, _)) = text.char_indices().nth(config.max_chars_per_doc) {
        text = &text[..cut];
        debug!(
            "Truncated {} to {} characters",
            doc.filename, config.max_chars_per_doc
        );
    }

    let prompt = build_analysis_prompt(text);

    let mut last_error: Option<ClientError> = None;
    for attempt in 1..=config.max_retries {
        let outcome = match client.complete(&prompt).await {
            Ok(response) if response.trim().is_empty() => Err(ClientError::EmptyResponse),
            other => other,
        };

        match outcome {
            Ok(response) => {
                debug!("Successfully analyzed: {}", doc.filename);
                return parse_response(&response, &doc.filename);
            }
            Err(e) => {
                warn!(
                    "Attempt {}/{} failed for {}: {}",
                    attempt, config.max_retries, doc.filename, e
                );
                last_error = Some(e);
                if attempt < config.max_retries {
                    sleep(config.retry_base_delay * attempt).await;
                }
            }
        }
    }

    error!(
        "Failed to analyze {} after {} attempts",
        doc.filename, config.max_retries
    );
    let message = last_error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "Unknown error".to_string());
    AnalysisResult::failed(doc.filename.clone(), message)
}

/// Analyse a batch of documents, consulting the cache when one is supplied.
///
/// Returns one result per input document, in input order. Cache hits skip
/// the remote call and the pacing sleep entirely; misses are analysed,
/// recorded into the cache, and followed by the pacing sleep. The caller
/// owns persisting the store afterwards.
pub async fn analyze_documents<C>(
    client: &C,
    documents: &[PdfDocument],
    config: &AnalyzerConfig,
    mut cache: Option<&mut CacheStore>,
) -> Vec<AnalysisResult>
where
    C: AnalysisClient + ?Sized,
{
    let total = documents.len();
    if let Some(cb) = &config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut results = Vec::with_capacity(total);
    let mut cached_count = 0usize;

    for (i, doc) in documents.iter().enumerate() {
        let index = i + 1;
        if let Some(cb) = &config.progress_callback {
            cb.on_document_start(index, total, &doc.filename);
        }

        if let Some(cached) = cache.as_deref().and_then(|c| c.lookup(doc)) {
            debug!("Using cached result for: {}", doc.filename);
            cached_count += 1;
            if let Some(cb) = &config.progress_callback {
                cb.on_document_complete(index, total, &doc.filename, true);
            }
            results.push(cached);
            continue;
        }

        let result = analyze_document(client, doc, config).await;

        if let Some(store) = cache.as_deref_mut() {
            store.record(doc, &result);
        }
        if let Some(cb) = &config.progress_callback {
            match &result.error {
                None => cb.on_document_complete(index, total, &doc.filename, false),
                Some(e) => cb.on_document_error(index, total, &doc.filename, e),
            }
        }
        results.push(result);

        // Pace remote calls; cache hits never reach this point.
        sleep(config.inter_call_delay).await;
    }

    let successful = results.iter().filter(|r| r.is_successful()).count();
    info!(
        "Completed: {}/{} successful, {} from cache",
        successful, total, cached_count
    );
    if let Some(cb) = &config.progress_callback {
        cb.on_batch_complete(total, successful, cached_count);
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Client that always fails with the same message.
    struct AlwaysFails {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AnalysisClient for AlwaysFails {
        async fn complete(&self, _prompt: &str) -> Result<String, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::Api("quota exceeded".into()))
        }
    }

    /// Client that records prompts and succeeds with a fixed response.
    struct Echoes {
        calls: AtomicUsize,
        prompt_lens: std::sync::Mutex<Vec<usize>>,
        response: String,
    }

    impl Echoes {
        fn new(response: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                prompt_lens: std::sync::Mutex::new(Vec::new()),
                response: response.to_string(),
            }
        }
    }

    #[async_trait]
    impl AnalysisClient for Echoes {
        async fn complete(&self, prompt: &str) -> Result<String, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompt_lens.lock().unwrap().push(prompt.chars().count());
            Ok(self.response.clone())
        }
    }

    fn doc(name: &str, text: &str) -> PdfDocument {
        PdfDocument {
            path: PathBuf::from(name),
            filename: name.to_string(),
            text: text.to_string(),
            page_count: 1,
        }
    }

    fn fast_config() -> AnalyzerConfig {
        AnalyzerConfig::builder()
            .retry_base_delay(Duration::ZERO)
            .inter_call_delay(Duration::ZERO)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn empty_document_short_circuits_without_remote_call() {
        let client = AlwaysFails {
            calls: AtomicUsize::new(0),
        };
        let result = analyze_document(&client, &doc("empty.pdf", "   \n\t "), &fast_config()).await;

        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.summary, EMPTY_DOCUMENT_SUMMARY);
        assert!(result.error.is_none());
        assert!(result.keywords.is_empty());
    }

    #[tokio::test]
    async fn failing_call_is_attempted_exactly_max_retries_times() {
        let client = AlwaysFails {
            calls: AtomicUsize::new(0),
        };
        let result = analyze_document(&client, &doc("a.pdf", "content"), &fast_config()).await;

        assert_eq!(client.calls.load(Ordering::SeqCst), 3);
        assert_eq!(result.error.as_deref(), Some("quota exceeded"));
        assert!(result.summary.is_empty());
        assert!(result.keywords.is_empty());
    }

    #[tokio::test]
    async fn empty_completion_is_retried_and_reported() {
        let client = Echoes::new("   \n  ");
        let result = analyze_document(&client, &doc("a.pdf", "content"), &fast_config()).await;

        assert_eq!(client.calls.load(Ordering::SeqCst), 3);
        assert_eq!(result.error.as_deref(), Some("Empty response from model"));
    }

    #[tokio::test]
    async fn oversized_text_is_truncated_before_prompting() {
        let client = Echoes::new("SUMMARY:\nok");
        let config = AnalyzerConfig::builder()
            .max_chars_per_doc(50)
            .retry_base_delay(Duration::ZERO)
            .inter_call_delay(Duration::ZERO)
            .build()
            .unwrap();

        let long_text = "x".repeat(5_000);
        analyze_document(&client, &doc("big.pdf", &long_text), &config).await;

        let template_len = build_analysis_prompt("").chars().count();
        let prompt_len = client.prompt_lens.lock().unwrap()[0];
        assert_eq!(prompt_len, template_len + 50);
    }

    #[tokio::test]
    async fn text_within_budget_is_sent_in_full() {
        let client = Echoes::new("SUMMARY:\nok");
        let config = AnalyzerConfig::builder()
            .max_chars_per_doc(100)
            .retry_base_delay(Duration::ZERO)
            .inter_call_delay(Duration::ZERO)
            .build()
            .unwrap();

        analyze_document(&client, &doc("small.pdf", "exactly short"), &config).await;

        let template_len = build_analysis_prompt("").chars().count();
        let prompt_len = client.prompt_lens.lock().unwrap()[0];
        assert_eq!(prompt_len, template_len + "exactly short".chars().count());
    }

    #[tokio::test]
    async fn successful_response_is_parsed() {
        let client = Echoes::new("SUMMARY:\nA test.\n\nKEYWORDS:\na, b, c");
        let result = analyze_document(&client, &doc("a.pdf", "content"), &fast_config()).await;

        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.summary, "A test.");
        assert_eq!(result.keywords, vec!["a", "b", "c"]);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn batch_preserves_input_order() {
        let client = Echoes::new("SUMMARY:\nok");
        let docs = vec![doc("b.pdf", "two"), doc("a.pdf", "one"), doc("c.pdf", "three")];
        let results = analyze_documents(&client, &docs, &fast_config(), None).await;

        let names: Vec<_> = results.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["b.pdf", "a.pdf", "c.pdf"]);
    }

    #[tokio::test]
    async fn batch_without_cache_calls_once_per_document() {
        let client = Echoes::new("SUMMARY:\nok");
        let docs = vec![doc("a.pdf", "one"), doc("b.pdf", "two")];
        let results = analyze_documents(&client, &docs, &fast_config(), None).await;

        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
        assert!(results.iter().all(|r| r.is_successful()));
    }
}
