use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document file not found: {0}")]
    NotFound(std::path::PathBuf),

    #[error("no paragraph block in {0}")]
    NoParagraphs(std::path::PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
