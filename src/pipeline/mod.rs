//! Pipeline stages for batch PDF analysis.
//!
//! Each submodule implements exactly one transformation step, so every stage
//! is independently testable and the remote seam can be mocked without
//! touching the rest.
//!
//! ## Data Flow
//!
//! ```text
//! loader ──▶ analyze ──▶ parse
//! (lopdf)    (cache lookup,     (tolerant section
//!             retry/backoff)     scanner)
//! ```
//!
//! 1. [`loader`]  — scan the input directory and extract page-ordered text
//! 2. [`analyze`] — per-document driver (truncation, prompt, retry loop) and
//!    the sequential batch orchestrator with its cache consultation
//! 3. [`parse`]   — turn the free-text model response into typed fields;
//!    the only stage with no I/O at all

pub mod analyze;
pub mod loader;
pub mod parse;
