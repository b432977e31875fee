use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::LoadError;
use crate::models::{MonthRecord, RatingsDataset, SourceFormat};
use crate::normalize::{build_items, normalize_name, NormalizeContext, RawCell, RawRow};

#[derive(Debug, Deserialize)]
struct RatingsDocument {
    year: i32,
    months: Vec<MonthDocument>,
}

#[derive(Debug, Deserialize)]
struct MonthDocument {
    name: String,
    number: u32,
    #[serde(default)]
    items: Vec<ItemDocument>,
}

#[derive(Debug, Deserialize)]
struct ItemDocument {
    #[serde(default)]
    name: Value,
    /// Keyed by category id, plus the raw per-network keys.
    #[serde(default)]
    scores: Option<HashMap<String, Value>>,
}

impl From<&ItemDocument> for RawRow {
    fn from(doc: &ItemDocument) -> Self {
        RawRow {
            name: normalize_name(Some(&RawCell::from(&doc.name))),
            cells: doc
                .scores
                .iter()
                .flatten()
                .map(|(key, value)| (key.clone(), RawCell::from(value)))
                .collect(),
        }
    }
}

pub struct JsonSource;

impl JsonSource {
    pub fn new() -> Self {
        Self
    }
}

impl super::NormalizedSource for JsonSource {
    fn format(&self) -> SourceFormat {
        SourceFormat::Json
    }

    fn parse(&self, raw: &[u8], ctx: &NormalizeContext<'_>) -> Result<RatingsDataset, LoadError> {
        let doc: RatingsDocument = serde_json::from_slice(raw)?;

        let months = doc
            .months
            .iter()
            .map(|month| {
                let rows: Vec<RawRow> = month.items.iter().map(RawRow::from).collect();
                MonthRecord {
                    name: month.name.clone(),
                    number: month.number,
                    items: build_items(&rows, ctx, SourceFormat::Json),
                }
            })
            .collect();

        Ok(RatingsDataset {
            year: doc.year,
            months,
        })
    }
}
