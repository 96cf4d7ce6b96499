use crate::client::join_path;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

/// Candidate sitemap locations, probed in this order.
pub const SITEMAP_PATHS: [&str; 5] = [
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/sitemap/sitemap.xml",
    "/sitemap/sitemap-index.xml",
    "/sitemap-index.xml",
];

const URLSET_MARKER: &[u8] = b"<urlset";
const SITEMAP_INDEX_MARKER: &[u8] = b"<sitemapindex";

/// Raw byte check for a `<urlset` or `<sitemapindex` opening tag.
pub fn looks_like_sitemap(body: &[u8]) -> bool {
    contains(body, URLSET_MARKER) || contains(body, SITEMAP_INDEX_MARKER)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

pub struct SitemapLocator {
    client: Client,
    timeout: Duration,
    candidates: Vec<String>,
}

impl SitemapLocator {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            candidates: SITEMAP_PATHS.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// First candidate under `domain` that answers 200 with a sitemap body.
    pub async fn locate(&self, domain: &str) -> Option<String> {
        let urls: Vec<String> = self
            .candidates
            .iter()
            .map(|path| join_path(domain, path))
            .collect();

        let found = self.first_accepted(&urls).await;
        if found.is_none() {
            info!("No sitemap found under {}", domain);
        }
        found
    }

    /// Same acceptance rule as [`locate`](Self::locate), over absolute URLs.
    pub async fn first_accepted(&self, urls: &[String]) -> Option<String> {
        for url in urls {
            if self.probe(url).await {
                info!("Located sitemap at {}", url);
                return Some(url.clone());
            }
        }
        None
    }

    async fn probe(&self, url: &str) -> bool {
        debug!("Probing {}", url);

        let response = match self.client.get(url).timeout(self.timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("  -> request failed: {}", e);
                return false;
            }
        };

        if response.status() != StatusCode::OK {
            debug!("  -> status {}", response.status());
            return false;
        }

        match response.bytes().await {
            Ok(body) if looks_like_sitemap(&body) => true,
            Ok(_) => {
                debug!("  -> 200 but no sitemap marker");
                false
            }
            Err(e) => {
                debug!("  -> failed to read body: {}", e);
                false
            }
        }
    }
}
