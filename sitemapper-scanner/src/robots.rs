use crate::client::join_path;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

/// Outcome of a robots.txt probe. Absence is informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsReport {
    pub present: bool,
    pub body: String,
}

impl RobotsReport {
    pub fn absent() -> Self {
        Self::default()
    }

    /// URLs declared with `Sitemap:` lines (key matched case-insensitively).
    pub fn sitemaps(&self) -> Vec<String> {
        self.body
            .lines()
            .filter_map(|line| {
                let (key, value) = line.trim().split_once(':')?;
                if !key.trim().eq_ignore_ascii_case("sitemap") {
                    return None;
                }
                let value = value.trim();
                (!value.is_empty()).then(|| value.to_string())
            })
            .collect()
    }
}

pub struct RobotsChecker {
    client: Client,
    timeout: Duration,
}

impl RobotsChecker {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// GET `<domain>/robots.txt`. Any failure collapses to an absent report.
    pub async fn check(&self, domain: &str) -> RobotsReport {
        let robots_url = join_path(domain, "/robots.txt");
        debug!("Fetching {}", robots_url);

        let response = match self
            .client
            .get(&robots_url)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!("robots.txt request failed for {}: {}", robots_url, e);
                return RobotsReport::absent();
            }
        };

        if response.status() != StatusCode::OK {
            debug!("robots.txt at {} answered {}", robots_url, response.status());
            return RobotsReport::absent();
        }

        match response.text().await {
            Ok(body) => {
                info!("Found robots.txt at {} ({} bytes)", robots_url, body.len());
                RobotsReport {
                    present: true,
                    body,
                }
            }
            Err(e) => {
                debug!("Failed to read robots.txt body from {}: {}", robots_url, e);
                RobotsReport::absent()
            }
        }
    }
}
