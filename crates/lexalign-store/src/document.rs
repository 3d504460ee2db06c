//! Loader for parsed-paragraph JSON documents.
//!
//! Two shapes are accepted:
//!
//! ```json
//! [{"para": [{"para_number": 1, "para": "text"}, ...]}]
//! [{"para_number": 1, "para": "text"}, ...]
//! ```
//!
//! Only the first block of the wrapped shape is read.

use std::path::Path;

use lexalign_core::{Document, Language};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::StoreError;

#[derive(Deserialize)]
struct ParagraphEntry {
    para_number: i64,
    #[serde(default)]
    para: Value,
}

#[derive(Deserialize)]
struct ParagraphBlock {
    para: Vec<ParagraphEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentFile {
    Wrapped(Vec<ParagraphBlock>),
    Flat(Vec<ParagraphEntry>),
}

/// Read a document file for `language`.
pub fn load_document(path: &Path, language: Language) -> Result<Document, StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path)?;
    let entries = match serde_json::from_str::<DocumentFile>(&raw)? {
        DocumentFile::Wrapped(blocks) => blocks
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NoParagraphs(path.to_path_buf()))?
            .para,
        DocumentFile::Flat(entries) => entries,
    };

    let doc = build_document(language, entries);
    info!(
        path = %path.display(),
        language = %language,
        paragraphs = doc.len(),
        "loaded document"
    );
    Ok(doc)
}

/// Parse a document from a JSON string. An empty wrapped list yields an
/// empty document.
pub fn parse_document(json: &str, language: Language) -> Result<Document, StoreError> {
    let entries = match serde_json::from_str::<DocumentFile>(json)? {
        DocumentFile::Wrapped(blocks) => blocks
            .into_iter()
            .next()
            .map(|block| block.para)
            .unwrap_or_default(),
        DocumentFile::Flat(entries) => entries,
    };
    Ok(build_document(language, entries))
}

fn build_document(language: Language, entries: Vec<ParagraphEntry>) -> Document {
    let mut doc = Document::new(language);
    for entry in entries {
        let Ok(number) = u32::try_from(entry.para_number) else {
            warn!(para_number = entry.para_number, "paragraph number out of range, skipped");
            continue;
        };
        if number == 0 {
            warn!("paragraph number 0 skipped");
            continue;
        }
        // Non-string text means "no facts asserted".
        let text = match entry.para {
            Value::String(s) => s,
            _ => String::new(),
        };
        if doc.paragraphs.insert(number, text).is_some() {
            warn!(para_number = number, "duplicate paragraph number, keeping the last");
        }
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn wrapped_shape() {
        let json = r#"[{"para": [
            {"para_number": 1, "para": "First."},
            {"para_number": 2, "para": "Second."}
        ]}]"#;
        let doc = parse_document(json, Language::En).unwrap();
        assert_eq!(doc.language, Language::En);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.text(2), "Second.");
    }

    #[test]
    fn flat_shape() {
        let json = r#"[{"para_number": 3, "para": "Dritter."}]"#;
        let doc = parse_document(json, Language::De).unwrap();
        assert_eq!(doc.text(3), "Dritter.");
        assert_eq!(doc.text(1), "");
    }

    #[test]
    fn non_string_text_is_empty() {
        let json = r#"[{"para": [
            {"para_number": 1, "para": null},
            {"para_number": 2, "para": 42},
            {"para_number": 3}
        ]}]"#;
        let doc = parse_document(json, Language::Lv).unwrap();
        assert_eq!(doc.len(), 3);
        assert!(doc.paragraphs.values().all(String::is_empty));
    }

    #[test]
    fn invalid_numbers_skipped_and_last_duplicate_wins() {
        let json = r#"[
            {"para_number": 0, "para": "zero"},
            {"para_number": -4, "para": "negative"},
            {"para_number": 1, "para": "old"},
            {"para_number": 1, "para": "new"}
        ]"#;
        let doc = parse_document(json, Language::En).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.text(1), "new");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            parse_document("{not json", Language::En),
            Err(StoreError::Json(_))
        ));
    }

    #[test]
    fn load_from_file_keeps_text_as_written() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"para": [{{"para_number": 1, "para": "18\u00a0March 2025"}}]}}]"#
        )
        .unwrap();
        let doc = load_document(file.path(), Language::En).unwrap();
        // whitespace cleaning happens at extraction, not on load
        assert_eq!(doc.text(1), "18\u{00a0}March 2025");
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(
            load_document(&path, Language::En),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn empty_wrapped_file_has_no_paragraph_block() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        let result = load_document(file.path(), Language::En);
        // `[]` parses as the wrapped shape with no blocks
        assert!(matches!(result, Err(StoreError::NoParagraphs(_))));
    }
}
