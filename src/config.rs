use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::models::{Category, Limit};

/// Root configuration structure, deserialized from `.vuz-ratings/config.toml`.
///
/// Every section is optional; missing keys take the built-in values from
/// [`Config::default`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Year shown for workbook data, which carries no year of its own.
    pub year: i32,
    /// Canonical month labels in calendar order.
    pub months: Vec<String>,
    /// 0-based index of the month selected by default and marked as actual.
    pub current_month: usize,
    /// Workbook header holding the university name.
    pub name_column: String,
    pub data: DataPaths,
    pub social: SocialColumns,
    pub defaults: ViewDefaults,
    /// Ranking dimensions in display order.
    pub categories: Vec<Category>,
}

/// Locations of the data files, relative to the data source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub universities: String,
    pub ratings_xlsx: String,
    pub ratings_json: String,
}

/// Per-network columns summed into the social score when it is missing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SocialColumns {
    /// Workbook headers.
    pub workbook: Vec<String>,
    /// Keys inside a JSON item's `scores`.
    pub json: Vec<String>,
}

/// Initial selection when the CLI does not override it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewDefaults {
    pub category: String,
    pub limit: Limit,
}

const DEFAULT_LIMIT: NonZeroUsize = match NonZeroUsize::new(5) {
    Some(n) => n,
    None => unreachable!(),
};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            year: 2026,
            months: strings(&[
                "Январь", "Февраль", "Март", "Апрель", "Май", "Июнь", "Июль", "Август",
                "Сентябрь", "Октябрь", "Ноябрь", "Декабрь",
            ]),
            current_month: 0,
            name_column: "Вуз".to_string(),
            data: DataPaths::default(),
            social: SocialColumns::default(),
            defaults: ViewDefaults::default(),
            categories: vec![
                Category::new("consolidated", "Сводный рейтинг", "Сводный рейтинг", None),
                Category::new("smi", "СМИ", "СМИ", None),
                Category::new("social", "Социальные сети", "Социальные сети", None),
                Category::new("vk", "ВКонтакте", "ВКонтакте", Some("social")),
                Category::new("tg", "Telegram", "Telegram", Some("social")),
                Category::new("ok", "MAX", "MAX", Some("social")),
                Category::new("rt", "Rutube", "Rutube", Some("social")),
                Category::new("site", "Сайт", "Сайт", None),
                Category::new("agenda", "Федеральная повестка", "Федеральная повестка", None),
            ],
        }
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        DataPaths {
            universities: "data/universities.json".to_string(),
            ratings_xlsx: "data/ratings-2026.xlsx".to_string(),
            ratings_json: "data/ratings-2026.json".to_string(),
        }
    }
}

impl Default for SocialColumns {
    fn default() -> Self {
        SocialColumns {
            workbook: strings(&["ВКонтакте", "Telegram", "MAX", "Rutube"]),
            json: strings(&["vk", "tg", "ok", "rt"]),
        }
    }
}

impl Default for ViewDefaults {
    fn default() -> Self {
        ViewDefaults {
            category: "consolidated".to_string(),
            limit: Limit::Top(DEFAULT_LIMIT),
        }
    }
}

impl Config {
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Reject configurations the loader and ranker cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.months.is_empty() {
            bail!("config: `months` must list at least one month");
        }
        if self.current_month >= self.months.len() {
            bail!(
                "config: `current_month` is {} but only {} months are configured",
                self.current_month,
                self.months.len()
            );
        }
        let mut seen = HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.id.as_str()) {
                bail!("config: duplicate category id {:?}", category.id);
            }
        }
        Ok(())
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<base>/.vuz-ratings/config.toml`
/// 3. `~/.config/vuz-ratings/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(base: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = base.join(".vuz-ratings").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("vuz-ratings").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    config.validate()?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}
