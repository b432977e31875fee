//! Canonicalization shared by both source formats.
//!
//! Raw cells from a workbook or a JSON document are first lowered into
//! [`RawCell`]s; everything after that (name trimming, locale-tolerant number
//! parsing, the derived social total, allow-list filtering) is format-agnostic.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::Value;

use crate::config::Config;
use crate::error::LoadError;
use crate::models::{Item, Score, SourceFormat, SOCIAL_CATEGORY};

/// A single untyped value as it appeared in the source.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl From<&Value> for RawCell {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => RawCell::Empty,
            Value::Bool(b) => RawCell::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(RawCell::Empty, RawCell::Number),
            Value::String(s) => RawCell::Text(s.clone()),
            // Nested values never carry a score.
            Value::Array(_) | Value::Object(_) => RawCell::Empty,
        }
    }
}

/// One source record: the university name and its cells keyed by column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub name: String,
    pub cells: HashMap<String, RawCell>,
}

impl RawRow {
    pub fn get(&self, column: &str) -> Option<&RawCell> {
        self.cells.get(column)
    }
}

/// Coerce a cell to a trimmed string; empty and missing cells become `""`.
pub fn normalize_name(raw: Option<&RawCell>) -> String {
    match raw {
        None | Some(RawCell::Empty) => String::new(),
        Some(RawCell::Text(s)) => s.trim().to_string(),
        Some(RawCell::Number(n)) => n.to_string(),
        Some(RawCell::Bool(b)) => b.to_string(),
    }
}

/// Parse a score, accepting a comma as the decimal separator.
///
/// Non-finite numbers, booleans, empty or whitespace-only text and anything
/// that is not a number after the comma swap all read as no data.
pub fn parse_number(raw: Option<&RawCell>) -> Score {
    match raw? {
        RawCell::Number(n) => n.is_finite().then_some(*n),
        RawCell::Text(s) => {
            let normalized = s.replacen(',', ".", 1);
            let normalized = normalized.trim();
            if normalized.is_empty() {
                return None;
            }
            normalized.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        RawCell::Empty | RawCell::Bool(_) => None,
    }
}

/// Sum the parseable `columns` of `row`. No parseable column at all is `None`,
/// not zero.
pub fn compute_social_total(row: &RawRow, columns: &[String]) -> Score {
    columns
        .iter()
        .filter_map(|col| parse_number(row.get(col)))
        .fold(None, |acc, val| Some(acc.unwrap_or(0.0) + val))
}

/// Known universities in their canonical order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllowList {
    names: Vec<String>,
    set: HashSet<String>,
}

impl AllowList {
    /// Build from raw names. Names are trimmed; blanks and repeats are dropped.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = AllowList::default();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() && list.set.insert(name.to_string()) {
                list.names.push(name.to_string());
            }
        }
        list
    }

    /// Parse the allow-list document: a JSON array of names.
    pub fn from_json(bytes: &[u8]) -> Result<Self, LoadError> {
        let values: Vec<Value> = serde_json::from_slice(bytes)?;
        let names: Vec<String> = values
            .iter()
            .map(|v| normalize_name(Some(&RawCell::from(v))))
            .collect();
        Ok(AllowList::new(names))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.set.contains(name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Everything a source parser needs besides the raw bytes.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeContext<'a> {
    pub config: &'a Config,
    pub allow_list: &'a AllowList,
}

impl<'a> NormalizeContext<'a> {
    pub fn new(config: &'a Config, allow_list: &'a AllowList) -> Self {
        Self { config, allow_list }
    }

    fn social_columns(&self, format: SourceFormat) -> &'a [String] {
        match format {
            SourceFormat::Workbook => &self.config.social.workbook,
            SourceFormat::Json => &self.config.social.json,
        }
    }
}

/// Produce one [`Item`] per allow-listed university, in allow-list order.
///
/// Rows are matched by trimmed name; the last row wins on duplicates.
/// Universities with no row get all-`None` scores; rows for unknown
/// universities are dropped.
pub fn build_items(
    rows: &[RawRow],
    ctx: &NormalizeContext<'_>,
    format: SourceFormat,
) -> Vec<Item> {
    let mut by_name: HashMap<&str, &RawRow> = HashMap::new();
    for row in rows {
        if !row.name.is_empty() {
            by_name.insert(row.name.as_str(), row);
        }
    }

    let empty = RawRow::default();
    let mut missing = 0usize;

    let items: Vec<Item> = ctx
        .allow_list
        .names()
        .iter()
        .map(|name| {
            let row = by_name.get(name.as_str()).copied().unwrap_or_else(|| {
                missing += 1;
                &empty
            });

            let mut scores = BTreeMap::new();
            for category in &ctx.config.categories {
                let key = match format {
                    SourceFormat::Workbook => &category.column,
                    SourceFormat::Json => &category.id,
                };
                let mut score = parse_number(row.get(key));
                if score.is_none() && category.id == SOCIAL_CATEGORY {
                    score = compute_social_total(row, ctx.social_columns(format));
                }
                scores.insert(category.id.clone(), score);
            }

            Item {
                name: name.clone(),
                scores,
            }
        })
        .collect();

    let dropped = by_name
        .keys()
        .filter(|name| !ctx.allow_list.contains(name))
        .count();
    tracing::debug!(
        %format,
        rows = rows.len(),
        items = items.len(),
        missing,
        dropped,
        "built items"
    );

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    fn row(name: &str, cells: &[(&str, RawCell)]) -> RawRow {
        RawRow {
            name: name.to_string(),
            cells: cells
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name(Some(&text("  МГУ \n"))), "МГУ");
        assert_eq!(normalize_name(Some(&RawCell::Empty)), "");
        assert_eq!(normalize_name(None), "");
    }

    #[test]
    fn test_parse_number_comma_decimal() {
        assert_eq!(parse_number(Some(&text("1,5"))), Some(1.5));
        assert_eq!(parse_number(Some(&text(" 2.25 "))), Some(2.25));
        assert_eq!(parse_number(Some(&RawCell::Number(3.0))), Some(3.0));
    }

    #[test]
    fn test_parse_number_no_data() {
        assert_eq!(parse_number(Some(&text(""))), None);
        assert_eq!(parse_number(Some(&text("   "))), None);
        assert_eq!(parse_number(Some(&text("abc"))), None);
        assert_eq!(parse_number(Some(&RawCell::Empty)), None);
        assert_eq!(parse_number(None), None);
        assert_eq!(parse_number(Some(&RawCell::Number(f64::NAN))), None);
        assert_eq!(parse_number(Some(&RawCell::Number(f64::INFINITY))), None);
        assert_eq!(parse_number(Some(&text("inf"))), None);
        assert_eq!(parse_number(Some(&RawCell::Bool(true))), None);
    }

    #[test]
    fn test_parse_number_only_first_comma() {
        assert_eq!(parse_number(Some(&text("1,234,5"))), None);
    }

    #[test]
    fn test_social_total_mixed() {
        let r = row(
            "A",
            &[
                ("vk", RawCell::Number(10.0)),
                ("tg", RawCell::Empty),
                ("ok", text("5")),
            ],
        );
        assert_eq!(
            compute_social_total(&r, &columns(&["vk", "tg", "ok", "rt"])),
            Some(15.0)
        );
    }

    #[test]
    fn test_social_total_all_missing_is_none() {
        let r = row("A", &[("vk", text("")), ("tg", text("n/a"))]);
        assert_eq!(compute_social_total(&r, &columns(&["vk", "tg", "ok", "rt"])), None);
    }

    #[test]
    fn test_social_total_zero_is_data() {
        let r = row("A", &[("vk", RawCell::Number(0.0))]);
        assert_eq!(compute_social_total(&r, &columns(&["vk", "tg"])), Some(0.0));
    }

    #[test]
    fn test_allow_list_dedup_and_trim() {
        let list = AllowList::new([" МГУ", "СПбГУ", "МГУ ", "", "  "]);
        assert_eq!(list.names(), &["МГУ".to_string(), "СПбГУ".to_string()]);
        assert!(list.contains("МГУ"));
        assert!(!list.contains("мгу"));
    }

    #[test]
    fn test_allow_list_from_json() {
        let list = AllowList::from_json("[\"ИТМО\", \" МФТИ \"]".as_bytes()).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains("МФТИ"));
        assert!(matches!(
            AllowList::from_json(b"{\"not\": \"a list\"}"),
            Err(LoadError::MalformedData(_))
        ));
    }

    #[test]
    fn test_build_items_follows_allow_list() {
        let config = Config::default();
        let allow = AllowList::new(["Бета", "Альфа", "Гамма"]);
        let ctx = NormalizeContext::new(&config, &allow);

        let rows = vec![
            row("Альфа", &[("consolidated", text("7,5"))]),
            row("Чужой", &[("consolidated", text("99"))]),
            row("Бета", &[("consolidated", RawCell::Number(1.0))]),
            row("Бета", &[("consolidated", RawCell::Number(2.0))]),
        ];
        let items = build_items(&rows, &ctx, SourceFormat::Json);

        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Бета", "Альфа", "Гамма"]);
        assert_eq!(items[0].score("consolidated"), Some(2.0));
        assert_eq!(items[1].score("consolidated"), Some(7.5));

        // Missing rows still get every configured category, all empty.
        assert_eq!(items[2].scores.len(), config.categories.len());
        assert!(items[2].scores.values().all(Option::is_none));
    }

    #[test]
    fn test_build_items_derives_social_per_format() {
        let config = Config::default();
        let allow = AllowList::new(["Альфа"]);
        let ctx = NormalizeContext::new(&config, &allow);

        let json_rows = vec![row(
            "Альфа",
            &[("vk", RawCell::Number(10.0)), ("ok", RawCell::Number(5.0))],
        )];
        let items = build_items(&json_rows, &ctx, SourceFormat::Json);
        assert_eq!(items[0].score("social"), Some(15.0));
        assert_eq!(items[0].score("vk"), Some(10.0));

        let sheet_rows = vec![row(
            "Альфа",
            &[
                ("ВКонтакте", text("1,5")),
                ("Rutube", text("2")),
                ("vk", RawCell::Number(100.0)),
            ],
        )];
        let items = build_items(&sheet_rows, &ctx, SourceFormat::Workbook);
        assert_eq!(items[0].score("social"), Some(3.5));
        assert_eq!(items[0].score("vk"), Some(1.5));
    }

    #[test]
    fn test_build_items_keeps_direct_social() {
        let config = Config::default();
        let allow = AllowList::new(["Альфа"]);
        let ctx = NormalizeContext::new(&config, &allow);

        let rows = vec![row(
            "Альфа",
            &[("social", RawCell::Number(4.0)), ("vk", RawCell::Number(10.0))],
        )];
        let items = build_items(&rows, &ctx, SourceFormat::Json);
        assert_eq!(items[0].score("social"), Some(4.0));
    }

    #[test]
    fn test_build_items_is_idempotent() {
        let config = Config::default();
        let allow = AllowList::new(["Альфа", "Бета"]);
        let ctx = NormalizeContext::new(&config, &allow);
        let rows = vec![row("Бета", &[("tg", text("0,25")), ("smi", text("3"))])];

        assert_eq!(
            build_items(&rows, &ctx, SourceFormat::Json),
            build_items(&rows, &ctx, SourceFormat::Json)
        );
    }
}
