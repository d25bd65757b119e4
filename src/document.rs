//! Value types shared by every pipeline stage.
//!
//! Both types are plain data carriers: created once, never mutated. A fresh
//! [`AnalysisResult`] is built whenever an analysis is re-run; the cache
//! reconstructs equal values from its persisted entries.

use std::path::PathBuf;

/// A loaded PDF document with its extracted text.
///
/// Created once per file by [`crate::pipeline::loader`] and owned by the
/// batch run. The `filename` (not the full path) is the stable identity used
/// for caching and reporting, so a cache survives moving the whole input
/// directory but not renaming individual files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument {
    /// Path to the backing file, used for content hashing.
    pub path: PathBuf,
    /// Stable per-file identity (the filename).
    pub filename: String,
    /// Page texts joined with blank lines; empty when extraction failed.
    pub text: String,
    /// Number of pages in the source PDF; 0 when extraction failed.
    pub page_count: usize,
}

impl PdfDocument {
    /// Length of the extracted text in characters.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Result of analysing a single PDF document.
///
/// `error` is set iff the analysis did not succeed. When `error` is `None`,
/// `summary` / `key_entities` / `action_items` may still legitimately be
/// empty strings — "no action items" is parsed text, not an error.
///
/// One deliberate exception: a document with no extractable text produces
/// `error = None` together with a fixed human-readable summary (see
/// [`crate::pipeline::analyze::analyze_document`]). Downstream consumers that
/// need strict failure accounting check the error field *or* that marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    /// Identity of the analysed document (its filename).
    pub filename: String,
    /// Concise summary section of the response.
    pub summary: String,
    /// Key people, organisations, dates and terms.
    pub key_entities: String,
    /// Action items or recommendations found in the document.
    pub action_items: String,
    /// Keywords in parse order.
    pub keywords: Vec<String>,
    /// The model response, verbatim, for audit and debugging.
    pub raw_response: String,
    /// Last failure message when analysis did not succeed.
    pub error: Option<String>,
}

impl AnalysisResult {
    /// Whether the analysis succeeded (no error recorded).
    pub fn is_successful(&self) -> bool {
        self.error.is_none()
    }

    /// A failed result carrying only the error message.
    ///
    /// All textual fields are empty so exports show the failure, not stale
    /// content.
    pub fn failed(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            summary: String::new(),
            key_entities: String::new(),
            action_items: String::new(),
            keywords: Vec::new(),
            raw_response: String::new(),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_len_counts_chars_not_bytes() {
        let doc = PdfDocument {
            path: PathBuf::from("é.pdf"),
            filename: "é.pdf".into(),
            text: "héllo".into(),
            page_count: 1,
        };
        assert_eq!(doc.text_len(), 5);
        assert_eq!(doc.text.len(), 6);
    }

    #[test]
    fn failed_result_is_not_successful() {
        let r = AnalysisResult::failed("a.pdf", "boom");
        assert!(!r.is_successful());
        assert_eq!(r.error.as_deref(), Some("boom"));
        assert!(r.summary.is_empty());
        assert!(r.keywords.is_empty());
    }
}
