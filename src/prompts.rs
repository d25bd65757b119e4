//! Prompt template for document analysis.
//!
//! Centralising the prompt here keeps prompt engineering out of the retry and
//! parsing logic, and lets unit tests inspect the exact text sent to the
//! model without a live provider.
//!
//! The requested output format is the contract the response parser in
//! [`crate::pipeline::parse`] scans for: four labelled sections in a fixed
//! order. The parser stays permissive because models do not always honour
//! the format, but the section names here and there must match.

/// Instruction template with a `{document_text}` placeholder.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following document and provide a structured analysis.

DOCUMENT TEXT:
{document_text}

Please provide your analysis in the following format:

SUMMARY:
[A concise 2-3 sentence summary of the document's main content and purpose]

KEY ENTITIES:
[List the key people, organizations, dates, and important terms mentioned]

ACTION ITEMS:
[List any action items, tasks, or recommendations found in the document. Write "None identified" if there are no action items]

KEYWORDS:
[Comma-separated list of 5-10 relevant keywords that describe this document]

Respond only with the analysis in the exact format above."#;

/// Embed the (possibly truncated) document text into the instruction template.
pub fn build_analysis_prompt(document_text: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE.replace("{document_text}", document_text)
}
