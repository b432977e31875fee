use std::path::PathBuf;

use clap::Parser;

use crate::models::Limit;

#[derive(Parser, Debug)]
#[command(
    name = "vuz-ratings",
    about = "Monthly university media ratings from spreadsheet or JSON snapshots",
    version
)]
pub struct Cli {
    /// Data location: a site directory or an http(s):// base URL
    #[arg(default_value = ".")]
    pub source: String,

    /// Config file [default: <SOURCE>/.vuz-ratings/config.toml,
    /// then ~/.config/vuz-ratings/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Category id to rank by (e.g. consolidated, smi, social, vk, agenda)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Rows to show: a positive number or "all"
    #[arg(short, long, value_name = "N|all")]
    pub limit: Option<Limit>,

    /// Calendar month number, 1-12 [default: the configured current month]
    #[arg(short, long, value_name = "N")]
    pub month: Option<u32>,

    /// Only universities whose name contains this text (case-insensitive)
    #[arg(short = 's', long = "query", value_name = "TEXT", default_value = "")]
    pub query: String,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Write the normalized dataset as ratings JSON and exit
    #[arg(long, value_name = "FILE")]
    pub export_json: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print the result count
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["vuz-ratings"]);
        assert_eq!(cli.source, ".");
        assert_eq!(cli.limit, None);
        assert_eq!(cli.month, None);
        assert!(cli.query.is_empty());
    }

    #[test]
    fn test_selection_flags() {
        let cli = Cli::parse_from([
            "vuz-ratings",
            "https://example.org",
            "--category",
            "social",
            "--limit",
            "all",
            "--month",
            "3",
            "--query",
            "мгу",
        ]);
        assert_eq!(cli.source, "https://example.org");
        assert_eq!(cli.category.as_deref(), Some("social"));
        assert_eq!(cli.limit, Some(Limit::All));
        assert_eq!(cli.month, Some(3));
        assert_eq!(cli.query, "мгу");
    }

    #[test]
    fn test_bad_limit_rejected() {
        assert!(Cli::try_parse_from(["vuz-ratings", "--limit", "0"]).is_err());
    }
}
