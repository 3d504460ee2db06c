//! Storage layer: parsed-paragraph document files in, JSON reports out.

mod error;
pub use error::StoreError;

mod document;
pub use document::{load_document, parse_document};

mod report;
pub use report::{load_report, save_report};
