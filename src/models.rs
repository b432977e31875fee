use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category whose score may be derived from the per-network columns.
pub const SOCIAL_CATEGORY: &str = "social";

/// Informational category: listed, never ranked by score.
pub const AGENDA_CATEGORY: &str = "agenda";

/// A score cell. `None` means "no data" and is not the same as zero.
pub type Score = Option<f64>;

/// A ranking dimension as declared in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
    /// Header of the workbook column holding this score.
    pub column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl Category {
    pub fn new(id: &str, label: &str, column: &str, parent: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            column: column.to_string(),
            parent: parent.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub scores: BTreeMap<String, Score>,
}

impl Item {
    /// Score for `category_id`; unknown ids read as no data.
    pub fn score(&self, category_id: &str) -> Score {
        self.scores.get(category_id).copied().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRecord {
    pub name: String,
    pub number: u32,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingsDataset {
    pub year: i32,
    pub months: Vec<MonthRecord>,
}

/// The two raw shapes a dataset can be loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Workbook,
    Json,
}

impl SourceFormat {
    /// Workbook when reading from the local filesystem, JSON when served over HTTP.
    pub fn preferred(local: bool) -> Self {
        if local {
            SourceFormat::Workbook
        } else {
            SourceFormat::Json
        }
    }

    pub fn alternate(self) -> Self {
        match self {
            SourceFormat::Workbook => SourceFormat::Json,
            SourceFormat::Json => SourceFormat::Workbook,
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Workbook => write!(f, "workbook"),
            SourceFormat::Json => write!(f, "json"),
        }
    }
}

/// How many ranked rows to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "LimitRepr")]
pub enum Limit {
    Top(NonZeroUsize),
    All,
}

impl Limit {
    pub fn apply<T>(self, mut rows: Vec<T>) -> Vec<T> {
        if let Limit::Top(n) = self {
            rows.truncate(n.get());
        }
        rows
    }
}

impl FromStr for Limit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Limit::All);
        }
        s.parse::<NonZeroUsize>()
            .map(Limit::Top)
            .map_err(|_| format!("expected a positive number or \"all\", got {s:?}"))
    }
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Limit::Top(n) => write!(f, "{n}"),
            Limit::All => write!(f, "all"),
        }
    }
}

/// Config files may write the limit as `5` or `"all"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum LimitRepr {
    Count(usize),
    Keyword(String),
}

impl TryFrom<LimitRepr> for Limit {
    type Error = String;

    fn try_from(repr: LimitRepr) -> Result<Self, Self::Error> {
        match repr {
            LimitRepr::Count(n) => NonZeroUsize::new(n)
                .map(Limit::Top)
                .ok_or_else(|| "limit must be at least 1".to_string()),
            LimitRepr::Keyword(s) => s.parse(),
        }
    }
}

/// What the user is currently looking at.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub category: String,
    pub limit: Limit,
    pub query: String,
    /// 0-based index into [`RatingsDataset::months`].
    pub month: usize,
}

/// One ranked row.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry<'a> {
    /// 1-based position in the ranking.
    pub position: usize,
    pub item: &'a Item,
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ranking<'a> {
    /// Matching rows before the limit was applied.
    pub total: usize,
    pub entries: Vec<RankedEntry<'a>>,
}
