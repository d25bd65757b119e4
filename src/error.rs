//! Error types for the pdf-analyzer library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`AnalyzerError`] — **Fatal**: the batch cannot start or finish at all
//!   (missing API credential, missing input directory, export write failure).
//!   Returned as `Err(AnalyzerError)` from the top-level entry points.
//!
//! * [`ClientError`] — **Retryable**: a single remote call failed (API error,
//!   empty completion). Consumed by the retry loop in
//!   [`crate::pipeline::analyze`]; after exhaustion the last message is
//!   recorded in [`crate::document::AnalysisResult::error`] and the batch
//!   continues with the next document.
//!
//! Cache and per-page extraction failures are a third category: they are
//! recovered locally and logged, never surfaced through either type, because
//! the cache is a pure optimisation layer and a bad page must not sink a
//! whole document.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-analyzer library.
///
/// Per-document analysis failures are recorded in
/// [`crate::document::AnalysisResult::error`] rather than propagated here.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// The required API credential is not set in the environment.
    #[error("{var} environment variable is required.\nSet it in a .env file or export it in your shell.")]
    MissingApiKey { var: String },

    /// Builder or loaded configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// The input directory was not found at the given path.
    #[error("Input directory not found: '{path}'")]
    InputDirNotFound { path: PathBuf },

    /// The input path exists but is not a directory.
    #[error("Input path is not a directory: '{path}'")]
    NotADirectory { path: PathBuf },

    /// The filename filter pattern could not be compiled.
    #[error("Invalid filter pattern '{pattern}': {detail}")]
    InvalidFilterPattern { pattern: String, detail: String },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider could not be initialised (missing key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── Export errors ─────────────────────────────────────────────────────
    /// Could not create or write an export file.
    #[error("Failed to write export file '{path}': {detail}")]
    ExportFailed { path: PathBuf, detail: String },
}

/// A retryable failure from a single remote completion call.
///
/// The analysis driver treats every variant identically: log, back off,
/// try again until the retry ceiling is reached.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The provider returned an error (HTTP failure, quota, timeout, …).
    #[error("{0}")]
    Api(String),

    /// The provider answered but the completion text was empty.
    #[error("Empty response from model")]
    EmptyResponse,
}
