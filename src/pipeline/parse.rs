//! Tolerant parser for the model's free-text analysis response.
//!
//! The requested format ([`crate::prompts`]) is four labelled sections, but
//! model output is not guaranteed — headers get reordered, dropped, or
//! decorated. A rigid grammar would reject usable responses, so this is a
//! permissive line-oriented scanner: recognise the four headers
//! case-insensitively, accumulate everything under the current one, ignore
//! everything else.
//!
//! The fallback policy deliberately checks only summary / key entities /
//! action items: a response carrying nothing but a `KEYWORDS:` section still
//! parses its keywords and keeps an empty summary rather than stuffing the
//! raw text into it.

use crate::document::AnalysisResult;

/// Length cap for the fallback summary, in characters.
const FALLBACK_SUMMARY_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Summary,
    KeyEntities,
    ActionItems,
    Keywords,
}

const HEADERS: [(&str, Section); 4] = [
    ("SUMMARY:", Section::Summary),
    ("KEY ENTITIES:", Section::KeyEntities),
    ("ACTION ITEMS:", Section::ActionItems),
    ("KEYWORDS:", Section::Keywords),
];

/// Match a trimmed line against the known headers, case-insensitively.
///
/// Returns the section and whatever inline content follows the colon.
fn match_header(line: &str) -> Option<(Section, &str)> {
    for (prefix, section) in HEADERS {
        let matches = line
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
        if matches {
            return Some((section, line[prefix.len()..].trim()));
        }
    }
    None
}

#[derive(Default)]
struct Sections {
    summary: String,
    key_entities: String,
    action_items: String,
    keywords_raw: String,
}

impl Sections {
    /// Join the accumulated lines with single spaces, dropping empty ones,
    /// and store under the given section.
    fn flush(&mut self, section: Section, lines: &[&str]) {
        let text = lines
            .iter()
            .filter(|l| !l.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        match section {
            Section::Summary => self.summary = text,
            Section::KeyEntities => self.key_entities = text,
            Section::ActionItems => self.action_items = text,
            Section::Keywords => self.keywords_raw = text,
        }
    }
}

/// Parse a raw model response into an [`AnalysisResult`] for `filename`.
///
/// Never fails: unparseable responses fall back to using the head of the raw
/// text as the summary, and the raw response is always retained verbatim.
/// The result's `error` is always `None` — reaching the parser means the
/// remote call succeeded.
pub fn parse_response(raw: &str, filename: &str) -> AnalysisResult {
    let mut sections = Sections::default();
    let mut current: Option<Section> = None;
    let mut pending: Vec<&str> = Vec::new();

    for line in raw.lines() {
        let stripped = line.trim();
        if let Some((section, inline)) = match_header(stripped) {
            if let Some(prev) = current {
                sections.flush(prev, &pending);
            }
            current = Some(section);
            pending = vec![inline];
        } else if current.is_some() {
            pending.push(stripped);
        }
        // Lines before the first recognised header are ignored.
    }
    if let Some(last) = current {
        sections.flush(last, &pending);
    }

    let keywords: Vec<String> = sections
        .keywords_raw
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();

    // Keywords alone don't count: a keywords-only response keeps its empty
    // summary instead of triggering the fallback.
    let mut summary = sections.summary;
    if summary.is_empty() && sections.key_entities.is_empty() && sections.action_items.is_empty() {
        summary = raw.chars().take(FALLBACK_SUMMARY_CHARS).collect();
    }

    AnalysisResult {
        filename: filename.to_string(),
        summary,
        key_entities: sections.key_entities,
        action_items: sections.action_items,
        keywords,
        raw_response: raw.to_string(),
        error: None,
    }
}
