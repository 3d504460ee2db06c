//! Cross-lingual factual consistency checks for aligned legal paragraphs.
//!
//! Typed entities (dates, amounts, percentages, legal citations, article
//! references, year ranges) are extracted from each language version of a
//! paragraph, normalised to canonical strings, and compared across languages.

pub mod compare;
pub mod equivalence;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod patterns;
pub mod report;
pub mod tag;
pub mod text;

pub use compare::{
    MismatchRecord, Status, StatusThresholds, entity_similarity, find_mismatches,
    is_significant_mismatch,
};
pub use equivalence::EquivalenceMap;
pub use error::{CoreError, RefineError, ReportError};
pub use extract::{Entities, EntityMatch, Extractor, extract_entities};
pub use normalize::EntityNormalizer;
pub use patterns::PatternCatalog;
pub use report::{
    ComparisonRow, Document, NoRefinement, RefineRequest, Refinement, Report, ReportOptions,
    ReportSummary, SimilarityRefiner, compare_paragraph, generate_report, generate_report_with,
};
pub use tag::{EntityTag, Language};
pub use text::{clean_opt, clean_text};
