//! Parsers that turn one raw document into a [`RatingsDataset`].
//!
//! - [`json`] — the JSON export (`year`, `months[].items[].scores`).
//! - [`workbook`] — a spreadsheet with one sheet per month.
//!
//! Both implement [`NormalizedSource`]; choosing between them and falling
//! back is the loader's job.

use crate::error::LoadError;
use crate::models::{RatingsDataset, SourceFormat};
use crate::normalize::NormalizeContext;

pub mod json;
pub mod workbook;

pub trait NormalizedSource {
    fn format(&self) -> SourceFormat;

    fn parse(&self, raw: &[u8], ctx: &NormalizeContext<'_>) -> Result<RatingsDataset, LoadError>;
}

pub fn source_for(format: SourceFormat) -> Box<dyn NormalizedSource> {
    match format {
        SourceFormat::Workbook => Box::new(workbook::WorkbookSource::new()),
        SourceFormat::Json => Box::new(json::JsonSource::new()),
    }
}
