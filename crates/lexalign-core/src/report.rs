//! Paragraph-by-paragraph consistency report over two or more language
//! versions of one document.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::compare::{MismatchRecord, Status, StatusThresholds, entity_similarity, find_mismatches};
use crate::error::{RefineError, ReportError};
use crate::extract::{Entities, Extractor};
use crate::tag::{EntityTag, Language};

pub const ENTITY_COMMENT: &str = "Entity-based factual overlap";

/// One language version: paragraph number → text.
///
/// Paragraphs are aligned across languages by number; the alignment itself
/// is the loader's responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub language: Language,
    pub paragraphs: BTreeMap<u32, String>,
}

impl Document {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            paragraphs: BTreeMap::new(),
        }
    }

    pub fn with_paragraph(mut self, number: u32, text: impl Into<String>) -> Self {
        self.paragraphs.insert(number, text.into());
        self
    }

    /// Text of paragraph `number`; empty when the paragraph is missing.
    pub fn text(&self, number: u32) -> &str {
        self.paragraphs.get(&number).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

/// Input to a [`SimilarityRefiner`] for one paragraph of the compared pair.
#[derive(Debug, Clone, Copy)]
pub struct RefineRequest<'a> {
    pub para_number: u32,
    pub lang_a: Language,
    pub text_a: &'a str,
    pub lang_b: Language,
    pub text_b: &'a str,
    pub entity_score: f64,
}

/// A replacement similarity score, optionally with a reviewer comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Refinement {
    pub score: f64,
    pub comment: Option<String>,
}

/// Optional, best-effort semantic refinement of the entity score.
///
/// `Ok(None)` means "no opinion". Errors never abort a report: the entity
/// score stays authoritative for that paragraph.
pub trait SimilarityRefiner {
    fn refine(&self, request: &RefineRequest<'_>) -> Result<Option<Refinement>, RefineError>;
}

/// Refiner that never refines.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRefinement;

impl SimilarityRefiner for NoRefinement {
    fn refine(&self, _request: &RefineRequest<'_>) -> Result<Option<Refinement>, RefineError> {
        Ok(None)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportOptions {
    pub thresholds: StatusThresholds,
}

/// Comparison of one paragraph number across all supplied languages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub para_number: u32,
    pub texts: BTreeMap<Language, String>,
    pub entities: BTreeMap<Language, Entities>,
    /// Entity overlap of the compared pair.
    pub entity_similarity: f64,
    /// Final score: the refined score when a refiner supplied one, otherwise
    /// `entity_similarity`.
    pub semantic_similarity: f64,
    pub comment: String,
    pub status: Status,
    pub refined: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub rows: usize,
    pub green: usize,
    pub yellow: usize,
    pub red: usize,
    pub refined: usize,
    pub mismatches_by_tag: BTreeMap<EntityTag, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// All languages in input order; the first two are the compared pair.
    pub languages: Vec<Language>,
    pub rows: Vec<ComparisonRow>,
    pub mismatches: Vec<MismatchRecord>,
    pub summary: ReportSummary,
}

impl Report {
    /// The two languages the scores and mismatches refer to. `None` for a
    /// report read back from a file that lists fewer than two languages.
    pub fn compared_pair(&self) -> Option<(Language, Language)> {
        match self.languages.as_slice() {
            [a, b, ..] => Some((*a, *b)),
            _ => None,
        }
    }
}

/// Compare one paragraph number. Independent of every other paragraph.
///
/// The first two documents are the compared pair; fewer than two is an error.
pub fn compare_paragraph(
    extractor: &Extractor,
    para_number: u32,
    documents: &[Document],
    options: &ReportOptions,
    refiner: &dyn SimilarityRefiner,
) -> Result<(ComparisonRow, Vec<MismatchRecord>), ReportError> {
    let [doc_a, doc_b, ..] = documents else {
        return Err(ReportError::TooFewDocuments(documents.len()));
    };

    let mut texts = BTreeMap::new();
    let mut entities = BTreeMap::new();
    for doc in documents {
        let text = doc.text(para_number);
        texts.insert(doc.language, text.to_string());
        entities.insert(doc.language, extractor.extract(text));
    }

    let (lang_a, lang_b) = (doc_a.language, doc_b.language);
    let (ents_a, ents_b) = (&entities[&lang_a], &entities[&lang_b]);

    let score = entity_similarity(ents_a, ents_b);
    let mismatches = find_mismatches(para_number, (lang_a, ents_a), (lang_b, ents_b));

    let request = RefineRequest {
        para_number,
        lang_a,
        text_a: doc_a.text(para_number),
        lang_b,
        text_b: doc_b.text(para_number),
        entity_score: score,
    };
    let refinement = accept_refinement(refiner.refine(&request), para_number);

    let (semantic_similarity, comment, refined) = match refinement {
        Some(r) => (
            r.score,
            r.comment.unwrap_or_else(|| ENTITY_COMMENT.to_string()),
            true,
        ),
        None => (score, ENTITY_COMMENT.to_string(), false),
    };

    let row = ComparisonRow {
        para_number,
        texts,
        entities,
        entity_similarity: score,
        semantic_similarity,
        comment,
        status: options.thresholds.classify(semantic_similarity),
        refined,
    };
    Ok((row, mismatches))
}

fn accept_refinement(
    outcome: Result<Option<Refinement>, RefineError>,
    para_number: u32,
) -> Option<Refinement> {
    match outcome {
        Ok(Some(r)) if (0.0..=1.0).contains(&r.score) => Some(r),
        Ok(Some(r)) => {
            warn!(para_number, score = r.score, "refined score out of range, ignored");
            None
        }
        Ok(None) => None,
        Err(e) => {
            warn!(para_number, error = %e, "refinement failed, keeping entity score");
            None
        }
    }
}

/// Build the report for two or more language versions.
///
/// The first two documents are compared; any further documents contribute
/// texts and entity mappings to each row. Rows cover every paragraph number
/// present in any document, in ascending order.
pub fn generate_report(
    documents: &[Document],
    options: &ReportOptions,
    refiner: &dyn SimilarityRefiner,
) -> Result<Report, ReportError> {
    generate_report_with(Extractor::shared(), documents, options, refiner)
}

/// [`generate_report`] with an explicit extractor.
pub fn generate_report_with(
    extractor: &Extractor,
    documents: &[Document],
    options: &ReportOptions,
    refiner: &dyn SimilarityRefiner,
) -> Result<Report, ReportError> {
    if documents.len() < 2 {
        return Err(ReportError::TooFewDocuments(documents.len()));
    }
    let mut seen = BTreeSet::new();
    for doc in documents {
        if !seen.insert(doc.language) {
            return Err(ReportError::DuplicateLanguage(doc.language));
        }
    }

    let numbers: BTreeSet<u32> = documents
        .iter()
        .flat_map(|doc| doc.paragraphs.keys().copied())
        .collect();

    let mut rows = Vec::with_capacity(numbers.len());
    let mut mismatches = Vec::new();
    for number in numbers {
        let (row, found) = compare_paragraph(extractor, number, documents, options, refiner)?;
        debug!(
            para_number = number,
            score = row.semantic_similarity,
            status = %row.status,
            mismatches = found.len(),
            "paragraph compared"
        );
        rows.push(row);
        mismatches.extend(found);
    }

    let summary = summarize(&rows, &mismatches);
    info!(
        rows = summary.rows,
        green = summary.green,
        yellow = summary.yellow,
        red = summary.red,
        mismatches = mismatches.len(),
        "report generated"
    );

    Ok(Report {
        languages: documents.iter().map(|d| d.language).collect(),
        rows,
        mismatches,
        summary,
    })
}

fn summarize(rows: &[ComparisonRow], mismatches: &[MismatchRecord]) -> ReportSummary {
    let mut summary = ReportSummary {
        rows: rows.len(),
        ..Default::default()
    };
    for row in rows {
        match row.status {
            Status::Green => summary.green += 1,
            Status::Yellow => summary.yellow += 1,
            Status::Red => summary.red += 1,
        }
        if row.refined {
            summary.refined += 1;
        }
    }
    for record in mismatches {
        *summary.mismatches_by_tag.entry(record.tag).or_default() += 1;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    const EN_DEADLINE: &str =
        "The deadline is 18 March 2025 under Regulation (EU) No. 2021/1234.";
    const DE_DEADLINE: &str =
        "Die Frist ist der 18. März 2025 gemäß Verordnung (EU) Nr. 2021/1234.";

    fn pair(en: &str, de: &str) -> Vec<Document> {
        vec![
            Document::new(Language::En).with_paragraph(1, en),
            Document::new(Language::De).with_paragraph(1, de),
        ]
    }

    fn report(docs: &[Document]) -> Report {
        generate_report(docs, &ReportOptions::default(), &NoRefinement).unwrap()
    }

    #[test]
    fn consistent_translation_is_green() {
        let report = report(&pair(EN_DEADLINE, DE_DEADLINE));
        let row = &report.rows[0];

        for lang in [Language::En, Language::De] {
            assert_eq!(row.entities[&lang].get(EntityTag::Date), ["2025-03-18"]);
            assert_eq!(row.entities[&lang].get(EntityTag::LegalRef), ["(EU)2021/1234"]);
        }
        assert_eq!(row.semantic_similarity, 1.0);
        assert_eq!(row.status, Status::Green);
        assert_eq!(row.comment, ENTITY_COMMENT);
        assert!(report.mismatches.is_empty());
    }

    #[test]
    fn percent_only_in_english_is_a_mismatch() {
        let report = report(&pair(
            "A reduction of 50% applies from 18 March 2025.",
            "Eine Ermäßigung gilt ab dem 18. März 2025.",
        ));

        let percent: Vec<&MismatchRecord> = report
            .mismatches
            .iter()
            .filter(|m| m.tag == EntityTag::Percent)
            .collect();
        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].only_a, BTreeSet::from(["50.0".to_string()]));
        assert!(percent[0].only_b.is_empty());
        assert_eq!(percent[0].lang_a, Language::En);

        // number and date match, percent does not: 2 of 3 tags
        let row = &report.rows[0];
        assert_eq!(row.entity_similarity, 0.667);
        assert_eq!(row.status, Status::Yellow);
        assert_eq!(report.mismatches.len(), 1);
        assert!(row.entities[&Language::En].contains(EntityTag::Percent));
        assert!(!row.entities[&Language::De].contains(EntityTag::Percent));
    }

    #[test]
    fn missing_paragraph_is_empty_text() {
        let docs = vec![
            Document::new(Language::En)
                .with_paragraph(1, "Article 5 applies.")
                .with_paragraph(2, "Article 6 applies."),
            Document::new(Language::De).with_paragraph(1, "Artikel 5 gilt."),
        ];
        let report = report(&docs);

        assert_eq!(report.rows.len(), 2);
        let second = &report.rows[1];
        assert_eq!(second.para_number, 2);
        assert_eq!(second.texts[&Language::De], "");
        assert_eq!(second.semantic_similarity, 0.0);
        assert_eq!(second.status, Status::Red);
        assert!(report.mismatches.iter().all(|m| m.para_number == 2));
    }

    #[test]
    fn empty_paragraphs_are_vacuously_consistent() {
        let report = report(&pair("Nothing to see.", "Nichts zu sehen."));
        assert_eq!(report.rows[0].semantic_similarity, 1.0);
        assert_eq!(report.rows[0].status, Status::Green);
        assert!(report.mismatches.is_empty());
    }

    #[test]
    fn third_language_contributes_entities_only() {
        let mut docs = pair(EN_DEADLINE, DE_DEADLINE);
        docs.push(
            Document::new(Language::Lv)
                .with_paragraph(1, "Termiņš ir 2025. gada 18. marts.")
                .with_paragraph(3, "Papildu rindkopa 50%."),
        );
        let report = report(&docs);

        assert_eq!(report.languages, vec![Language::En, Language::De, Language::Lv]);
        assert_eq!(report.compared_pair(), Some((Language::En, Language::De)));
        let numbers: Vec<u32> = report.rows.iter().map(|r| r.para_number).collect();
        assert_eq!(numbers, vec![1, 3]);
        assert_eq!(
            report.rows[0].entities[&Language::Lv].get(EntityTag::Date),
            ["2025-03-18"]
        );
        // paragraph 3 is empty for the compared pair
        assert_eq!(report.rows[1].semantic_similarity, 1.0);
        assert!(report.mismatches.is_empty());
    }

    #[test]
    fn rejects_fewer_than_two_documents() {
        let docs = vec![Document::new(Language::En)];
        assert!(matches!(
            generate_report(&docs, &ReportOptions::default(), &NoRefinement),
            Err(ReportError::TooFewDocuments(1))
        ));
    }

    #[test]
    fn single_paragraph_needs_two_documents() {
        let docs = vec![Document::new(Language::En).with_paragraph(1, EN_DEADLINE)];
        let outcome = compare_paragraph(
            Extractor::shared(),
            1,
            &docs,
            &ReportOptions::default(),
            &NoRefinement,
        );
        assert!(matches!(outcome, Err(ReportError::TooFewDocuments(1))));
        assert!(matches!(
            compare_paragraph(Extractor::shared(), 1, &[], &ReportOptions::default(), &NoRefinement),
            Err(ReportError::TooFewDocuments(0))
        ));
    }

    #[test]
    fn compared_pair_of_report_with_one_language() {
        let mut report = report(&pair(EN_DEADLINE, DE_DEADLINE));
        report.languages.truncate(1);
        assert_eq!(report.compared_pair(), None);
    }

    #[test]
    fn rejects_duplicate_language() {
        let docs = vec![Document::new(Language::En), Document::new(Language::En)];
        assert!(matches!(
            generate_report(&docs, &ReportOptions::default(), &NoRefinement),
            Err(ReportError::DuplicateLanguage(Language::En))
        ));
    }

    struct FixedRefiner(Result<Option<Refinement>, &'static str>);

    impl SimilarityRefiner for FixedRefiner {
        fn refine(&self, request: &RefineRequest<'_>) -> Result<Option<Refinement>, RefineError> {
            assert!(!request.text_a.is_empty());
            self.0
                .clone()
                .map_err(|e| RefineError::Failed(e.to_string()))
        }
    }

    #[test]
    fn refinement_overrides_score_and_status() {
        let refiner = FixedRefiner(Ok(Some(Refinement {
            score: 0.5,
            comment: Some("dates agree, amounts differ".into()),
        })));
        let report = generate_report(
            &pair(EN_DEADLINE, DE_DEADLINE),
            &ReportOptions::default(),
            &refiner,
        )
        .unwrap();

        let row = &report.rows[0];
        assert_eq!(row.entity_similarity, 1.0);
        assert_eq!(row.semantic_similarity, 0.5);
        assert_eq!(row.status, Status::Yellow);
        assert_eq!(row.comment, "dates agree, amounts differ");
        assert!(row.refined);
        assert_eq!(report.summary.refined, 1);
    }

    #[test]
    fn failed_or_invalid_refinement_keeps_entity_score() {
        let outcomes = [
            FixedRefiner(Err("service unavailable")),
            FixedRefiner(Ok(None)),
            FixedRefiner(Ok(Some(Refinement {
                score: 1.7,
                comment: None,
            }))),
            FixedRefiner(Ok(Some(Refinement {
                score: f64::NAN,
                comment: None,
            }))),
        ];
        for refiner in outcomes {
            let report = generate_report(
                &pair(EN_DEADLINE, DE_DEADLINE),
                &ReportOptions::default(),
                &refiner,
            )
            .unwrap();
            let row = &report.rows[0];
            assert_eq!(row.semantic_similarity, 1.0);
            assert!(!row.refined);
            assert_eq!(row.comment, ENTITY_COMMENT);
        }
    }

    #[test]
    fn custom_thresholds_apply() {
        let options = ReportOptions {
            thresholds: StatusThresholds {
                green: 1.0,
                yellow: 0.9,
            },
        };
        let docs = pair(
            "Article 5 applies from 18 March 2025.",
            "Artikel 6 gilt ab dem 18. März 2025.",
        );
        let report = generate_report(&docs, &options, &NoRefinement).unwrap();
        assert_eq!(report.rows[0].status, Status::Red);
    }

    #[test]
    fn summary_counts() {
        let docs = vec![
            Document::new(Language::En)
                .with_paragraph(1, EN_DEADLINE)
                .with_paragraph(2, "Share of 50%."),
            Document::new(Language::De)
                .with_paragraph(1, DE_DEADLINE)
                .with_paragraph(2, "Anteil."),
        ];
        let report = report(&docs);
        assert_eq!(report.summary.rows, 2);
        assert_eq!(report.summary.green, 1);
        assert_eq!(report.summary.red, 1);
        assert_eq!(report.summary.mismatches_by_tag[&EntityTag::Percent], 1);
    }

    #[test]
    fn report_json_shape() {
        let report = report(&pair(EN_DEADLINE, DE_DEADLINE));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["rows"][0]["para_number"], 1);
        assert_eq!(json["rows"][0]["status"], "green");
        assert_eq!(json["rows"][0]["entities"]["de"]["legal_ref"][0], "(EU)2021/1234");
        assert_eq!(json["languages"][1], "de");

        let back: Report = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }
}
