use thiserror::Error;

use crate::tag::Language;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid pattern for {name}: {source}")]
    Pattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("unknown entity tag: {0}")]
    UnknownTag(String),

    #[error("unknown language: {0}")]
    UnknownLanguage(String),
}

/// Caller misuse of report generation. Paragraph content never produces one.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("at least two documents are required, got {0}")]
    TooFewDocuments(usize),

    #[error("language {0} supplied more than once")]
    DuplicateLanguage(Language),
}

/// Failure of an optional similarity refinement collaborator.
#[derive(Debug, Error)]
pub enum RefineError {
    #[error("refinement unavailable: {0}")]
    Unavailable(String),

    #[error("refinement failed: {0}")]
    Failed(String),
}
