//! # pdf-analyzer
//!
//! Batch analysis of PDF documents using large language models.
//!
//! ## Why this crate?
//!
//! Analysts with a folder full of PDFs want one command that turns it into a
//! table: per document a summary, the key entities, the action items, and a
//! keyword list. This crate extracts the text locally, asks an LLM for a
//! structured analysis, and exports the results — and because LLM calls are
//! slow and metered, it keeps a content-hash-validated cache so unchanged
//! files are never analysed twice.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF directory
//!  │
//!  ├─ 1. Load     scan *.pdf, extract page-ordered text (lopdf)
//!  ├─ 2. Cache    skip files whose content hash already has a result
//!  ├─ 3. Analyze  prompt the LLM, retry with linear backoff
//!  ├─ 4. Parse    tolerant scan of SUMMARY / KEY ENTITIES / ACTION ITEMS / KEYWORDS
//!  └─ 5. Export   CSV, JSON array, JSON Lines
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_analyzer::{
//!     analyze_documents, load_documents, AnalyzerConfig, CacheStore, LlmClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Requires GEMINI_API_KEY in the environment or a .env file.
//!     let config = AnalyzerConfig::from_env()?;
//!     let client = LlmClient::from_config(&config)?;
//!
//!     let documents = load_documents(&config.input_dir, config.max_docs, None)?;
//!     let mut cache = CacheStore::load(&config.input_dir);
//!
//!     let results = analyze_documents(&client, &documents, &config, Some(&mut cache)).await;
//!     cache.save(&config.input_dir);
//!
//!     for r in &results {
//!         println!("{}: {}", r.filename, r.summary);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf-analyze` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf-analyzer = { version = "0.2", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod cache;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use cache::{CacheEntry, CacheStore, CACHE_FILENAME};
pub use client::{AnalysisClient, LlmClient};
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder, API_KEY_VAR};
pub use document::{AnalysisResult, PdfDocument};
pub use error::{AnalyzerError, ClientError};
pub use export::{export_results, ExportFormat, ResultRecord};
pub use pipeline::analyze::{analyze_document, analyze_documents, EMPTY_DOCUMENT_SUMMARY};
pub use pipeline::loader::{list_pdf_files, load_documents};
pub use pipeline::parse::parse_response;
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
