//! Filename-keyed local cache for remotely hosted artifacts.
//!
//! A file already present in the cache directory is always used as is, no
//! matter how old it is. Missing files are downloaded once and written
//! atomically (temporary file, then rename).

use crate::error::{AscentError, Result};
use parking_lot::Mutex;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Source of artifact bytes for cache misses.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// HTTP fetcher with a small retry budget for transient failures.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    attempts: u32,
    backoff: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("text-ascent/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| AscentError::Configuration(format!("http client: {e}")))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client, attempts: 3, backoff: Duration::from_millis(250) }
    }

    /// Base delay between attempts; attempt `n` waits `n * backoff`.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        let fail = |reason: String| AscentError::Fetch { url: url.to_string(), reason };
        let mut attempt = 0;
        loop {
            attempt += 1;
            let outcome = match self.client.get(url.clone()).send().await {
                Ok(resp) if resp.status().is_success() => {
                    return resp.bytes().await.map(|b| b.to_vec()).map_err(|e| fail(e.to_string()));
                }
                Ok(resp) if is_transient(resp.status()) => format!("status {}", resp.status()),
                Ok(resp) => return Err(fail(format!("status {}", resp.status()))),
                Err(e) if e.is_connect() || e.is_timeout() => e.to_string(),
                Err(e) => return Err(fail(e.to_string())),
            };
            if attempt >= self.attempts {
                return Err(fail(outcome));
            }
            tracing::warn!(%url, attempt, reason = %outcome, "artifact fetch failed, retrying");
            tokio::time::sleep(self.backoff * attempt).await;
        }
    }
}

fn is_transient(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

pub struct ArtifactCache<F> {
    dir: PathBuf,
    fetcher: F,
    in_flight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<F: Fetcher> ArtifactCache<F> {
    pub fn new<P: AsRef<Path>>(dir: P, fetcher: F) -> Self {
        Self { dir: dir.as_ref().to_path_buf(), fetcher, in_flight: Mutex::new(HashMap::new()) }
    }

    /// Local path for `url`, downloading it first if no file of the same
    /// name is cached.
    pub async fn ensure(&self, url: &str) -> Result<PathBuf> {
        let url = Url::parse(url).map_err(|e| AscentError::Configuration(format!("invalid artifact url {url:?}: {e}")))?;
        let name = file_name(&url)?;
        let path = self.dir.join(&name);
        if is_file(&path).await {
            tracing::debug!(file = %name, "artifact cache hit");
            return Ok(path);
        }

        let key_lock = self.in_flight.lock().entry(name.clone()).or_default().clone();
        let _guard = key_lock.lock().await;
        // another caller may have finished the download while we waited
        if is_file(&path).await {
            return Ok(path);
        }

        tracing::info!(%url, file = %name, "artifact cache miss, fetching");
        let bytes = self.fetcher.fetch(&url).await?;
        let io_err = |e: std::io::Error| AscentError::artifact(&path, e);
        tokio::fs::create_dir_all(&self.dir).await.map_err(io_err)?;
        let partial = self.dir.join(format!("{name}.part"));
        let written = match tokio::fs::write(&partial, &bytes).await {
            Ok(()) => tokio::fs::rename(&partial, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(io_err(e));
        }
        tracing::info!(file = %name, bytes = bytes.len(), "artifact cached");
        Ok(path)
    }

    /// Make sure every named file under `base_url` is cached locally.
    pub async fn ensure_all(&self, base_url: &str, names: &[&str]) -> Result<()> {
        let base = if base_url.ends_with('/') { base_url.to_string() } else { format!("{base_url}/") };
        let base = Url::parse(&base).map_err(|e| AscentError::Configuration(format!("invalid base url {base_url:?}: {e}")))?;
        for name in names {
            let url = base
                .join(name)
                .map_err(|e| AscentError::Configuration(format!("cannot join {name:?} onto {base}: {e}")))?;
            self.ensure(url.as_str()).await?;
        }
        Ok(())
    }
}

fn file_name(url: &Url) -> Result<String> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| AscentError::Configuration(format!("artifact url {url} has no file name")))
}

/// Only a regular file counts as a cached artifact.
async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_last_path_segment() {
        let url = Url::parse("https://bucket.example.com/models/vectorizer.bin?x=1").unwrap();
        assert_eq!(file_name(&url).unwrap(), "vectorizer.bin");
        let bare = Url::parse("https://bucket.example.com/").unwrap();
        assert!(file_name(&bare).is_err());
    }
}
