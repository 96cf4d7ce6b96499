use crate::error::{Result, ScanError};
use crate::result::{BranchFailure, CollectReport};
use crate::sitemap::{SitemapDocument, parse_sitemap};
use reqwest::Client;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Called with each sitemap URL right before it is fetched.
pub type SitemapProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Walks a sitemap or sitemap index down to its leaf page URLs.
pub struct SitemapCollector {
    client: Client,
    timeout: Duration,
    progress_callback: Option<SitemapProgressCallback>,
}

impl SitemapCollector {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: SitemapProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Collect from `sitemap_url` with a fresh visited set.
    pub async fn collect(&self, sitemap_url: &str) -> CollectReport {
        let mut visited = HashSet::new();
        let mut report = CollectReport::default();
        self.collect_into(sitemap_url, &mut visited, &mut report).await;
        info!(
            "Collected {} links from {} sitemap(s), {} failed branch(es)",
            report.links.len(),
            report.sitemaps_fetched,
            report.failures.len()
        );
        report
    }

    /// Depth-first traversal sharing `visited` across the whole tree.
    ///
    /// Index children already in `visited` are never fetched again, which
    /// bounds the walk on self-referencing or cyclic indexes. A failed branch
    /// is recorded and the links gathered so far are kept.
    pub async fn collect_into(
        &self,
        sitemap_url: &str,
        visited: &mut HashSet<String>,
        report: &mut CollectReport,
    ) {
        visited.insert(sitemap_url.to_string());
        let mut pending = vec![sitemap_url.to_string()];

        while let Some(url) = pending.pop() {
            if let Some(ref callback) = self.progress_callback {
                callback(url.clone());
            }

            match self.fetch_document(&url).await {
                Ok(SitemapDocument::Index(children)) => {
                    report.sitemaps_fetched += 1;
                    debug!("{} is an index with {} child sitemaps", url, children.len());
                    // Reversed so children pop in document order
                    for child in children.into_iter().rev() {
                        if visited.insert(child.clone()) {
                            pending.push(child);
                        } else {
                            debug!("  -> already visited {}, skipping", child);
                        }
                    }
                }
                Ok(SitemapDocument::UrlSet(locs)) => {
                    report.sitemaps_fetched += 1;
                    let before = report.links.len();
                    report.links.extend(locs);
                    debug!("{} added {} new links", url, report.links.len() - before);
                }
                Err(e) => {
                    warn!("Sitemap {} failed: {}", url, e);
                    report.failures.push(BranchFailure {
                        url,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    async fn fetch_document(&self, url: &str) -> Result<SitemapDocument> {
        debug!("Fetching sitemap {}", url);

        // Relative or garbled <loc> values fail their branch only
        let url = Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{url}: {e}")))?;
        let response = self.client.get(url.clone()).timeout(self.timeout).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::UnexpectedStatus {
                url: url.into(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        parse_sitemap(&body)
    }
}
