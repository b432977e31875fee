//! Presentation of a ranking.
//!
//! [`present`] turns a ranking into a plain [`ViewModel`]; the renderers only
//! ever see that.
//!
//! - [`terminal`] — table output with the month menu; respects `--quiet`.
//! - JSON output is the serialized [`ViewModel`].

pub mod terminal;

use serde::Serialize;

use crate::config::Config;
use crate::models::{Ranking, RatingsDataset, Score};

pub const NOT_FOUND_MESSAGE: &str = "Данные не найдены.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    /// "<month> <year>".
    pub period: String,
    pub category: String,
    pub total: usize,
    pub count_label: String,
    pub months: Vec<MonthTab>,
    pub rows: Vec<ViewRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTab {
    pub name: String,
    pub selected: bool,
    /// The month the data is currently being collected for.
    pub actual: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRow {
    pub rank: usize,
    pub name: String,
    pub score: String,
    pub value: Score,
}

/// Build the view for `month` of `dataset` from an already computed ranking.
pub fn present(
    config: &Config,
    dataset: &RatingsDataset,
    month: usize,
    category_id: &str,
    ranking: &Ranking<'_>,
) -> ViewModel {
    let month_name = dataset
        .months
        .get(month)
        .map(|m| m.name.as_str())
        .or_else(|| config.months.first().map(String::as_str))
        .unwrap_or_default();

    let category = config
        .category(category_id)
        .map(|c| c.label.clone())
        .unwrap_or_else(|| category_id.to_string());

    let actual = if config.current_month < dataset.months.len() {
        config.current_month
    } else {
        dataset.months.len().saturating_sub(1)
    };

    let months = dataset
        .months
        .iter()
        .enumerate()
        .map(|(i, m)| MonthTab {
            name: m.name.clone(),
            selected: i == month,
            actual: i == actual,
        })
        .collect();

    let rows = ranking
        .entries
        .iter()
        .map(|e| ViewRow {
            rank: e.position,
            name: e.item.name.clone(),
            score: format_score(e.score),
            value: e.score,
        })
        .collect();

    ViewModel {
        period: format!("{} {}", month_name, dataset.year),
        category,
        total: ranking.total,
        count_label: count_label(ranking.total),
        months,
        rows,
        message: (ranking.total == 0).then(|| NOT_FOUND_MESSAGE.to_string()),
    }
}

pub fn count_label(total: usize) -> String {
    format!("{} вузов", total)
}

/// Russian number format with three decimals: `1 234,500` (non-breaking
/// space grouping), `—` for no data.
pub fn format_score(score: Score) -> String {
    let Some(value) = score else {
        return "—".to_string();
    };

    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "000"));

    let mut grouped = String::new();
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('\u{00A0}');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped},{frac_part}")
}

/// Placeholder shown instead of the list when nothing could be loaded.
pub fn failure_message(local: bool) -> &'static str {
    if local {
        "Для загрузки данных откройте сайт через локальный сервер."
    } else {
        "Не удалось загрузить данные."
    }
}
