//! Reading data files from wherever the snapshot lives.
//!
//! A data location is either a local directory or an HTTP base URL. HTTP
//! requests carry a `v=<unix millis>` query parameter so intermediate caches
//! never serve a stale snapshot.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;

use crate::error::LoadError;

/// A source of raw data files addressed by relative path.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    /// Whether files come from the local filesystem rather than a server.
    fn is_local(&self) -> bool;

    async fn fetch(&self, path: &str) -> Result<Vec<u8>, LoadError>;
}

pub enum Fetcher {
    Local { root: PathBuf },
    Remote { client: Client, base: String },
}

impl Fetcher {
    /// Interpret a CLI source argument: `http(s)://` is remote, anything else
    /// (including `file://`) is a local directory.
    pub fn from_source(source: &str) -> Result<Self, LoadError> {
        if source.starts_with("http://") || source.starts_with("https://") {
            let client = Client::builder()
                .timeout(Duration::from_secs(10))
                .user_agent(concat!("vuz-ratings/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|source_err| LoadError::Transport {
                    url: source.to_string(),
                    source: source_err,
                })?;
            return Ok(Fetcher::Remote {
                client,
                base: source.trim_end_matches('/').to_string(),
            });
        }

        let root = source.strip_prefix("file://").unwrap_or(source);
        Ok(Fetcher::Local {
            root: PathBuf::from(root),
        })
    }

    /// Local directory the data is read from, if any.
    pub fn local_root(&self) -> Option<&Path> {
        match self {
            Fetcher::Local { root } => Some(root.as_path()),
            Fetcher::Remote { .. } => None,
        }
    }
}

impl Fetch for Fetcher {
    fn is_local(&self) -> bool {
        matches!(self, Fetcher::Local { .. })
    }

    async fn fetch(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        match self {
            Fetcher::Local { root } => {
                let full = root.join(path);
                tracing::debug!(path = %full.display(), "reading");
                tokio::fs::read(&full)
                    .await
                    .map_err(|source| LoadError::Io { path: full, source })
            }
            Fetcher::Remote { client, base } => {
                let url = format!("{}/{}", base, path.trim_start_matches('/'));
                tracing::debug!(%url, "fetching");
                let transport = |source: reqwest::Error| LoadError::Transport {
                    url: url.clone(),
                    source,
                };

                let response = client
                    .get(&url)
                    .query(&[("v", cache_token())])
                    .send()
                    .await
                    .map_err(transport)?;

                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::FetchFailure {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }

                let bytes = response.bytes().await.map_err(transport)?;
                Ok(bytes.to_vec())
            }
        }
    }
}

/// Unique per request, defeats intermediary caching.
fn cache_token() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}
