//! Directory scan and PDF text extraction.
//!
//! Extraction is deliberately forgiving below the file level: a page that
//! cannot be decoded contributes an empty string and a warning while the
//! rest of the document proceeds, and a file that cannot be opened at all is
//! retained as an empty document so the batch report still accounts for it.
//! Only a missing or non-directory input path is fatal — there is nothing to
//! analyse at all in that case.

use crate::document::PdfDocument;
use crate::error::AnalyzerError;
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Scan `input_dir` for PDF files, optionally filtered by a glob pattern.
///
/// The extension check and the filter are case-insensitive; results are
/// sorted by lowercased filename so runs are deterministic across
/// filesystems.
pub fn list_pdf_files(
    input_dir: &Path,
    filter_pattern: Option<&str>,
) -> Result<Vec<PathBuf>, AnalyzerError> {
    if !input_dir.exists() {
        return Err(AnalyzerError::InputDirNotFound {
            path: input_dir.to_path_buf(),
        });
    }
    if !input_dir.is_dir() {
        return Err(AnalyzerError::NotADirectory {
            path: input_dir.to_path_buf(),
        });
    }

    let filter = filter_pattern
        .map(|p| {
            Pattern::new(&p.to_lowercase()).map_err(|e| AnalyzerError::InvalidFilterPattern {
                pattern: p.to_string(),
                detail: e.to_string(),
            })
        })
        .transpose()?;

    let mut files: Vec<PathBuf> = std::fs::read_dir(input_dir)
        .map_err(|_| AnalyzerError::InputDirNotFound {
            path: input_dir.to_path_buf(),
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    if let Some(pattern) = &filter {
        let before = files.len();
        files.retain(|path| {
            path.file_name()
                .map(|n| n.to_string_lossy().to_lowercase())
                .is_some_and(|name| pattern.matches(&name))
        });
        info!(
            "Filter '{}' matched {} of {} files",
            filter_pattern.unwrap_or_default(),
            files.len(),
            before
        );
    }

    files.sort_by_key(|p| {
        p.file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    });

    info!("Found {} PDF files in {}", files.len(), input_dir.display());
    Ok(files)
}

/// Extract page-ordered text and the page count from a PDF file.
///
/// Per-page extraction failures are recovered: the page contributes an empty
/// string and the remaining pages are still read. Page texts are joined with
/// blank lines.
pub fn extract_text(path: &Path) -> Result<(String, usize), lopdf::Error> {
    debug!("Extracting text from: {}", path.display());

    let doc = lopdf::Document::load(path)?;
    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    let page_count = pages.len();

    let mut parts: Vec<String> = Vec::with_capacity(page_count);
    for page_num in pages {
        match doc.extract_text(&[page_num]) {
            Ok(text) => parts.push(text),
            Err(e) => {
                warn!(
                    "Failed to extract text from page {} of {}: {}",
                    page_num,
                    path.display(),
                    e
                );
                parts.push(String::new());
            }
        }
    }

    let full_text = parts.join("\n\n");
    debug!(
        "Extracted {} characters from {} pages",
        full_text.len(),
        page_count
    );
    Ok((full_text, page_count))
}

/// Load up to `max_docs` PDF documents from `input_dir`.
///
/// A file whose extraction fails entirely is kept as a document with empty
/// text and zero pages; the analysis driver will short-circuit it as an
/// empty document rather than abort the batch.
pub fn load_documents(
    input_dir: &Path,
    max_docs: Option<usize>,
    filter_pattern: Option<&str>,
) -> Result<Vec<PdfDocument>, AnalyzerError> {
    let mut pdf_files = list_pdf_files(input_dir, filter_pattern)?;

    if let Some(limit) = max_docs {
        if pdf_files.len() > limit {
            pdf_files.truncate(limit);
            info!("Limited to {} documents", limit);
        }
    }

    let mut documents = Vec::with_capacity(pdf_files.len());
    for path in pdf_files {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (text, page_count) = match extract_text(&path) {
            Ok((text, page_count)) => {
                debug!("Loaded: {} ({} pages, {} chars)", filename, page_count, text.len());
                (text, page_count)
            }
            Err(e) => {
                error!("Failed to load {}: {}", filename, e);
                (String::new(), 0)
            }
        };

        documents.push(PdfDocument {
            path,
            filename,
            text,
            page_count,
        });
    }

    info!("Loaded {} documents", documents.len());
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_directory_is_fatal() {
        let err = list_pdf_files(Path::new("/no/such/place"), None).unwrap_err();
        assert!(matches!(err, AnalyzerError::InputDirNotFound { .. }));
    }

    #[test]
    fn file_instead_of_directory_is_fatal() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.pdf");
        std::fs::write(&file, b"%PDF").unwrap();
        let err = list_pdf_files(&file, None).unwrap_err();
        assert!(matches!(err, AnalyzerError::NotADirectory { .. }));
    }

    #[test]
    fn lists_pdfs_case_insensitively_and_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["Zeta.PDF", "alpha.pdf", "notes.txt", "beta.pdf"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let files = list_pdf_files(dir.path(), None).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["alpha.pdf", "beta.pdf", "Zeta.PDF"]);
    }

    #[test]
    fn filter_pattern_narrows_results() {
        let dir = TempDir::new().unwrap();
        for name in ["report_q1.pdf", "report_q2.pdf", "invoice.pdf"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let files = list_pdf_files(dir.path(), Some("report*.pdf")).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files
            .iter()
            .all(|p| p.file_name().unwrap().to_string_lossy().starts_with("report")));
    }

    #[test]
    fn filter_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Report.PDF"), b"x").unwrap();
        let files = list_pdf_files(dir.path(), Some("report*.pdf")).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn bad_filter_pattern_is_reported() {
        let dir = TempDir::new().unwrap();
        let err = list_pdf_files(dir.path(), Some("[oops")).unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidFilterPattern { .. }));
    }

    #[test]
    fn empty_directory_gives_empty_list() {
        let dir = TempDir::new().unwrap();
        assert!(list_pdf_files(dir.path(), None).unwrap().is_empty());
    }

    #[test]
    fn unreadable_pdf_becomes_empty_document() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.pdf"), b"this is not a pdf").unwrap();
        let docs = load_documents(dir.path(), None, None).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].filename, "broken.pdf");
        assert_eq!(docs[0].text, "");
        assert_eq!(docs[0].page_count, 0);
    }

    #[test]
    fn max_docs_limits_the_load() {
        let dir = TempDir::new().unwrap();
        for name in ["a.pdf", "b.pdf", "c.pdf"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let docs = load_documents(dir.path(), Some(2), None).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].filename, "a.pdf");
        assert_eq!(docs[1].filename, "b.pdf");
    }
}
