// src/core/net.rs
// Page + asset retrieval (blocking; one client shared by all workers)

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::blocking::Client;
use tracing::debug;

use crate::config::consts::{REQUEST_TIMEOUT_SECS, USER_AGENT};
use crate::errors::{Error, Result};
use crate::file::ensure_parent;

/// What the scraper needs from the network.
/// Every retrieval failure must come back as [`Error::Access`].
pub trait Fetcher: Send + Sync {
    /// Body of `url` as text (lossy UTF-8).
    fn get_text(&self, url: &str) -> Result<String>;

    /// Save the body of `url` to `dest`, creating parent directories.
    fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

/// HTTP(S) via reqwest; `file:` URLs are read from disk (local page mirrors).
pub struct WebFetcher {
    client: Client,
}

impl WebFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Configuration(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        if let Some(path) = local_path(url) {
            return fs::read(&path).map_err(|e| Error::access(url, e));
        }

        let resp = self.client.get(url).send().map_err(|e| Error::access(url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::access(url, format!("HTTP {status}")));
        }
        let body = resp.bytes().map_err(|e| Error::access(url, e))?;
        debug!(url, bytes = body.len(), "fetched");
        Ok(body.to_vec())
    }
}

impl Fetcher for WebFetcher {
    fn get_text(&self, url: &str) -> Result<String> {
        let bytes = self.get_bytes(url)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let bytes = self.get_bytes(url)?;
        ensure_parent(dest)?;
        fs::write(dest, bytes)?;
        Ok(())
    }
}

/// `file:///a/b`, `file:/a/b` → `/a/b`.
fn local_path(url: &str) -> Option<PathBuf> {
    url.strip_prefix("file://")
        .or_else(|| url.strip_prefix("file:"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_urls_map_to_paths() {
        assert_eq!(local_path("file:///tmp/x"), Some(PathBuf::from("/tmp/x")));
        assert_eq!(local_path("file:/tmp/x"), Some(PathBuf::from("/tmp/x")));
        assert_eq!(local_path("https://example.com"), None);
    }

    #[test]
    fn missing_local_file_is_an_access_error() {
        let fetcher = WebFetcher::new().unwrap();
        let err = fetcher.get_text("file:/nonexistent/play_icons/page").unwrap_err();
        assert!(matches!(err, Error::Access { .. }), "{err}");
    }
}
