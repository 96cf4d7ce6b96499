use crate::error::Result;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("Sitemapper/", env!("CARGO_PKG_VERSION"));

/// Timeouts and identity shared by every network stage of a run.
///
/// Each stage applies its own timeout per request, so one pooled client can
/// serve discovery, sitemap fetches and validation checks alike.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// robots.txt and candidate sitemap probes
    pub discovery_timeout: Duration,
    /// sitemap and sitemap-index document fetches
    pub sitemap_timeout: Duration,
    /// per-link HEAD checks
    pub validation_timeout: Duration,
    pub user_agent: String,
}

impl HttpSettings {
    /// Use the same timeout for every stage.
    pub fn with_uniform_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = timeout;
        self.sitemap_timeout = timeout;
        self.validation_timeout = timeout;
        self
    }

    fn longest_timeout(&self) -> Duration {
        self.discovery_timeout
            .max(self.sitemap_timeout)
            .max(self.validation_timeout)
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            discovery_timeout: Duration::from_secs(10),
            sitemap_timeout: Duration::from_secs(15),
            validation_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

pub fn build_client(settings: &HttpSettings) -> Result<Client> {
    let client = Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(settings.longest_timeout())
        .connect_timeout(settings.discovery_timeout)
        .pool_max_idle_per_host(50)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()?;

    Ok(client)
}

/// `<base>/<path>` with exactly one slash at the seam.
pub fn join_path(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
