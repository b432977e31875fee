use crate::error::LoadError;
use crate::models::{MonthRecord, RatingsDataset, SourceFormat};
use crate::normalize::{build_items, NormalizeContext, RawRow};

/// A decoded spreadsheet: sheets in workbook order, rows keyed by header.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<RawRow>,
}

impl Workbook {
    /// The sheet named like `month` (ignoring case), else the first sheet.
    pub fn sheet_for(&self, month: &str) -> Option<&Sheet> {
        let wanted = month.to_lowercase();
        self.sheets
            .iter()
            .find(|s| s.name.to_lowercase() == wanted)
            .or_else(|| {
                tracing::debug!(month, "no sheet for month, using the first sheet");
                self.sheets.first()
            })
    }
}

/// One month per configured month name, numbered from 1.
pub fn build_months(
    workbook: &Workbook,
    ctx: &NormalizeContext<'_>,
) -> Result<Vec<MonthRecord>, LoadError> {
    ctx.config
        .months
        .iter()
        .enumerate()
        .map(|(index, month)| {
            let sheet = workbook
                .sheet_for(month)
                .ok_or_else(|| LoadError::MalformedData("workbook has no sheets".to_string()))?;
            Ok(MonthRecord {
                name: month.clone(),
                number: index as u32 + 1,
                items: build_items(&sheet.rows, ctx, SourceFormat::Workbook),
            })
        })
        .collect()
}

#[cfg(feature = "xlsx")]
mod reader {
    use std::collections::HashMap;
    use std::io::Cursor;

    use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

    use super::{Sheet, Workbook};
    use crate::error::LoadError;
    use crate::normalize::{normalize_name, RawCell, RawRow};

    impl From<&Data> for RawCell {
        fn from(cell: &Data) -> Self {
            match cell {
                Data::Int(i) => RawCell::Number(*i as f64),
                Data::Float(f) => RawCell::Number(*f),
                Data::String(s) => RawCell::Text(s.clone()),
                Data::Bool(b) => RawCell::Bool(*b),
                // Serial day number, as spreadsheet formulas see it.
                Data::DateTime(dt) => RawCell::Number(dt.as_f64()),
                Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
                _ => RawCell::Empty,
            }
        }
    }

    /// First row is the header; every later row becomes a record.
    pub(super) fn sheet_rows(range: &Range<Data>, name_column: &str) -> Vec<RawRow> {
        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Vec::new();
        };
        let headers: Vec<String> = header
            .iter()
            .map(|c| c.to_string().trim().to_string())
            .collect();

        rows.map(|cells| {
            let cells: HashMap<String, RawCell> = headers
                .iter()
                .zip(cells)
                .filter(|(h, _)| !h.is_empty())
                .map(|(h, c)| (h.clone(), RawCell::from(c)))
                .collect();
            RawRow {
                name: normalize_name(cells.get(name_column)),
                cells,
            }
        })
        .collect()
    }

    pub(super) fn read_workbook(raw: &[u8], name_column: &str) -> Result<Workbook, LoadError> {
        let malformed = |e: calamine::Error| LoadError::MalformedData(e.to_string());
        let mut book = open_workbook_auto_from_rs(Cursor::new(raw)).map_err(malformed)?;

        let mut sheets = Vec::new();
        for name in book.sheet_names() {
            let range = book.worksheet_range(&name).map_err(malformed)?;
            let rows = sheet_rows(&range, name_column);
            tracing::debug!(sheet = %name, rows = rows.len(), "read sheet");
            sheets.push(Sheet { name, rows });
        }
        Ok(Workbook { sheets })
    }
}

#[cfg(feature = "xlsx")]
fn read_workbook(raw: &[u8], name_column: &str) -> Result<Workbook, LoadError> {
    reader::read_workbook(raw, name_column)
}

#[cfg(not(feature = "xlsx"))]
fn read_workbook(_raw: &[u8], _name_column: &str) -> Result<Workbook, LoadError> {
    Err(LoadError::MissingCapability(
        "spreadsheet support is not compiled in (enable the `xlsx` feature)",
    ))
}

pub struct WorkbookSource;

impl WorkbookSource {
    pub fn new() -> Self {
        Self
    }
}

impl super::NormalizedSource for WorkbookSource {
    fn format(&self) -> SourceFormat {
        SourceFormat::Workbook
    }

    fn parse(&self, raw: &[u8], ctx: &NormalizeContext<'_>) -> Result<RatingsDataset, LoadError> {
        let workbook = read_workbook(raw, &ctx.config.name_column)?;
        Ok(RatingsDataset {
            // The workbook has no year of its own.
            year: ctx.config.year,
            months: build_months(&workbook, ctx)?,
        })
    }
}
