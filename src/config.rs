//! Configuration for a batch analysis run.
//!
//! All behaviour is controlled through [`AnalyzerConfig`], built either from
//! the environment via [`AnalyzerConfig::from_env`] (the CLI path, with flag
//! overrides applied on top) or programmatically via the builder. Keeping
//! every knob in one struct makes it trivial to share the config across the
//! pipeline and to shrink the retry/pacing delays to zero in tests.

use crate::error::AnalyzerError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the required API credential.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Configuration for a batch analysis run.
///
/// # Example
/// ```rust
/// use pdf_analyzer::AnalyzerConfig;
/// use std::time::Duration;
///
/// let config = AnalyzerConfig::builder()
///     .input_dir("data/input_pdfs")
///     .model_name("gemini-2.0-flash")
///     .max_docs(10)
///     .retry_base_delay(Duration::from_secs(1))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AnalyzerConfig {
    /// API credential for the remote provider. Required at startup; the
    /// provider factory re-reads it from the environment when the client is
    /// built.
    pub api_key: String,

    /// Provider name understood by the provider factory. Default: "gemini".
    pub provider_name: String,

    /// Model identifier sent with every completion. Default: "gemini-2.0-flash".
    pub model_name: String,

    /// Directory scanned for PDF files. Also hosts the cache file.
    pub input_dir: PathBuf,

    /// Directory where export files are written.
    pub output_dir: PathBuf,

    /// Per-document character budget. Default: 15 000.
    ///
    /// Text beyond the budget is cut mid-word before prompt construction;
    /// the model sees at most this many characters per document.
    pub max_chars_per_doc: usize,

    /// Maximum number of documents to load. `None` means all.
    pub max_docs: Option<usize>,

    /// Total attempts per document (not retries after the first). Default: 3.
    pub max_retries: u32,

    /// Base delay for linear backoff between attempts: the sleep after
    /// attempt *n* is `retry_base_delay × n`. Default: 2 s.
    pub retry_base_delay: Duration,

    /// Pacing sleep after each remote call (cache hits skip it). Default: 500 ms.
    pub inter_call_delay: Duration,

    /// Optional per-document progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            provider_name: "gemini".to_string(),
            model_name: "gemini-2.0-flash".to_string(),
            input_dir: PathBuf::from("data/input_pdfs"),
            output_dir: PathBuf::from("data/output"),
            max_chars_per_doc: 15_000,
            max_docs: None,
            max_retries: 3,
            retry_base_delay: Duration::from_secs(2),
            inter_call_delay: Duration::from_millis(500),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("api_key", &"<redacted>")
            .field("provider_name", &self.provider_name)
            .field("model_name", &self.model_name)
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("max_chars_per_doc", &self.max_chars_per_doc)
            .field("max_docs", &self.max_docs)
            .field("max_retries", &self.max_retries)
            .field("retry_base_delay", &self.retry_base_delay)
            .field("inter_call_delay", &self.inter_call_delay)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl AnalyzerConfig {
    /// Create a new builder for `AnalyzerConfig`.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Load configuration from the environment (and a `.env` file if present).
    ///
    /// Fails with [`AnalyzerError::MissingApiKey`] when the credential is
    /// absent — the batch must not start without it. Everything else falls
    /// back to defaults.
    pub fn from_env() -> Result<Self, AnalyzerError> {
        // A missing .env file is fine; shell exports still apply.
        dotenvy::dotenv().ok();

        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AnalyzerError::MissingApiKey {
                var: API_KEY_VAR.to_string(),
            })?;

        let defaults = Self::default();
        let max_chars_per_doc = match std::env::var("MAX_CHARS_PER_DOC") {
            Ok(raw) => raw.parse::<usize>().map_err(|_| {
                AnalyzerError::InvalidConfig(format!(
                    "MAX_CHARS_PER_DOC must be a positive integer, got '{raw}'"
                ))
            })?,
            Err(_) => defaults.max_chars_per_doc,
        };

        Ok(Self {
            api_key,
            input_dir: std::env::var("INPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.input_dir),
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            model_name: std::env::var("MODEL_NAME").unwrap_or(defaults.model_name),
            max_chars_per_doc,
            ..defaults
        })
    }
}

/// Builder for [`AnalyzerConfig`].
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = name.into();
        self
    }

    pub fn model_name(mut self, model: impl Into<String>) -> Self {
        self.config.model_name = model.into();
        self
    }

    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn max_chars_per_doc(mut self, n: usize) -> Self {
        self.config.max_chars_per_doc = n;
        self
    }

    pub fn max_docs(mut self, n: usize) -> Self {
        self.config.max_docs = Some(n);
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_base_delay(mut self, d: Duration) -> Self {
        self.config.retry_base_delay = d;
        self
    }

    pub fn inter_call_delay(mut self, d: Duration) -> Self {
        self.config.inter_call_delay = d;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalyzerConfig, AnalyzerError> {
        let c = &self.config;
        if c.max_retries == 0 {
            return Err(AnalyzerError::InvalidConfig(
                "max_retries must be ≥ 1".into(),
            ));
        }
        if c.max_chars_per_doc == 0 {
            return Err(AnalyzerError::InvalidConfig(
                "max_chars_per_doc must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = AnalyzerConfig::default();
        assert_eq!(c.model_name, "gemini-2.0-flash");
        assert_eq!(c.max_chars_per_doc, 15_000);
        assert_eq!(c.max_retries, 3);
        assert_eq!(c.retry_base_delay, Duration::from_secs(2));
        assert_eq!(c.inter_call_delay, Duration::from_millis(500));
        assert_eq!(c.max_docs, None);
    }

    #[test]
    fn builder_overrides_fields() {
        let c = AnalyzerConfig::builder()
            .input_dir("/tmp/in")
            .output_dir("/tmp/out")
            .model_name("gemini-2.5-pro")
            .max_docs(5)
            .max_chars_per_doc(100)
            .retry_base_delay(Duration::ZERO)
            .inter_call_delay(Duration::ZERO)
            .build()
            .unwrap();
        assert_eq!(c.input_dir, PathBuf::from("/tmp/in"));
        assert_eq!(c.model_name, "gemini-2.5-pro");
        assert_eq!(c.max_docs, Some(5));
        assert_eq!(c.max_chars_per_doc, 100);
    }

    #[test]
    fn zero_retries_is_rejected() {
        let err = AnalyzerConfig::builder().max_retries(0).build().unwrap_err();
        assert!(err.to_string().contains("max_retries"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let c = AnalyzerConfig::builder().api_key("super-secret").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
