use crate::errors::Result;
use crate::model::TestResultRow;
use std::path::Path;

/// Writes rows as a pretty-printed JSON array.
pub fn write_json(path: &Path, rows: &[TestResultRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(rows)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "exported results");
    Ok(())
}

pub fn read_json(path: &Path) -> Result<Vec<TestResultRow>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
