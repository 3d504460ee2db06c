//! JSON persistence for comparison reports.

use std::path::Path;

use lexalign_core::Report;
use tracing::info;

use crate::StoreError;

/// Write `report` as pretty-printed UTF-8 JSON, creating parent directories.
pub fn save_report(report: &Report, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), rows = report.rows.len(), "report saved");
    Ok(())
}

pub fn load_report(path: &Path) -> Result<Report, StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
