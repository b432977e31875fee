use std::path::Path;

use anyhow::{Context, Result};

use crate::models::RatingsDataset;

/// Write `dataset` in the JSON ratings format the JSON source reads back.
pub fn write_json(dataset: &RatingsDataset, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(dataset)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write ratings to {}", path.display()))?;
    tracing::debug!(path = %path.display(), months = dataset.months.len(), "exported");
    Ok(())
}
