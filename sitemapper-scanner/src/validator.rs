use futures::{StreamExt, stream};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Called after each check with `(checked, total)`.
pub type ValidationProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Keeps only links whose final response, after redirects, is exactly 200.
pub struct LinkValidator {
    client: Client,
    timeout: Duration,
    concurrency: usize,
    progress_callback: Option<ValidationProgressCallback>,
}

impl LinkValidator {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            concurrency: 1,
            progress_callback: None,
        }
    }

    /// Number of checks in flight at once. 1 checks links one by one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_progress_callback(mut self, callback: ValidationProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Returns the surviving links in input order.
    pub async fn validate(&self, links: &[String]) -> Vec<String> {
        let total = links.len();
        info!(
            "Validating {} links with {} concurrent checks",
            total, self.concurrency
        );

        let client = self.client.clone();
        let timeout = self.timeout;
        let mut checks = stream::iter(links.iter().cloned())
            .map(move |link| {
                let client = client.clone();
                async move {
                    let ok = check_link(&client, &link, timeout).await;
                    (link, ok)
                }
            })
            .buffered(self.concurrency);

        let mut kept = Vec::new();
        let mut checked = 0;
        while let Some((link, ok)) = checks.next().await {
            checked += 1;
            if let Some(ref callback) = self.progress_callback {
                callback(checked, total);
            }
            if ok {
                kept.push(link);
            }
        }

        info!("{} of {} links answered 200", kept.len(), total);
        kept
    }

    /// HEAD request following redirects. Failures of any kind count as false.
    pub async fn check(&self, link: &str) -> bool {
        check_link(&self.client, link, self.timeout).await
    }
}

async fn check_link(client: &Client, link: &str, timeout: Duration) -> bool {
    match client.head(link).timeout(timeout).send().await {
        Ok(response) => {
            let ok = response.status() == StatusCode::OK;
            if !ok {
                debug!("Dropping {} (status {})", link, response.status());
            }
            ok
        }
        Err(e) => {
            debug!("Dropping {} ({})", link, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{HttpSettings, build_client};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn validator() -> LinkValidator {
        let client = build_client(&HttpSettings::default()).unwrap();
        LinkValidator::new(client, Duration::from_secs(2))
    }

    async fn mock_server_with_statuses() -> MockServer {
        let mock_server = MockServer::start().await;
        for (at, status) in [("/ok", 200u16), ("/created", 201), ("/gone", 410), ("/error", 500)] {
            Mock::given(method("HEAD"))
                .and(path(at))
                .respond_with(ResponseTemplate::new(status))
                .mount(&mock_server)
                .await;
        }
        Mock::given(method("HEAD"))
            .and(path("/moved"))
            .respond_with(
                ResponseTemplate::new(307)
                    .insert_header("location", format!("{}/ok", mock_server.uri()).as_str()),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/moved-away"))
            .respond_with(
                ResponseTemplate::new(307)
                    .insert_header("location", format!("{}/gone", mock_server.uri()).as_str()),
            )
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_only_exact_200_survives() {
        let mock_server = mock_server_with_statuses().await;
        let base = mock_server.uri();
        let links: Vec<String> = ["/ok", "/created", "/gone", "/error", "/unmapped"]
            .iter()
            .map(|p| format!("{base}{p}"))
            .collect();

        let kept = validator().validate(&links).await;
        assert_eq!(kept, vec![format!("{base}/ok")]);
    }

    #[tokio::test]
    async fn test_redirects_are_followed() {
        let mock_server = mock_server_with_statuses().await;
        let base = mock_server.uri();

        let validator = validator();
        assert!(validator.check(&format!("{base}/moved")).await);
        assert!(!validator.check(&format!("{base}/moved-away")).await);
    }

    #[tokio::test]
    async fn test_network_failures_are_dropped() {
        let kept = validator()
            .validate(&["http://127.0.0.1:9/page".to_string()])
            .await;
        assert!(kept.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_drops_link() {
        let mock_server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&mock_server)
            .await;

        let client = build_client(&HttpSettings::default()).unwrap();
        let validator = LinkValidator::new(client, Duration::from_millis(50));
        assert!(!validator.check(&format!("{}/slow", mock_server.uri())).await);
    }

    #[tokio::test]
    async fn test_concurrent_validation_preserves_order() {
        let mock_server = MockServer::start().await;
        for i in 0..12u64 {
            Mock::given(method("HEAD"))
                .and(path(format!("/page{}", i)))
                .respond_with(
                    ResponseTemplate::new(if i % 3 == 0 { 404u16 } else { 200 })
                        .set_delay(Duration::from_millis((12 - i) * 5)),
                )
                .mount(&mock_server)
                .await;
        }
        let base = mock_server.uri();
        let links: Vec<String> = (0..12).map(|i| format!("{base}/page{i}")).collect();

        let checked = Arc::new(AtomicUsize::new(0));
        let checked_clone = checked.clone();
        let validator = validator()
            .with_concurrency(4)
            .with_progress_callback(Arc::new(move |_done, total| {
                assert_eq!(total, 12);
                checked_clone.fetch_add(1, Ordering::Relaxed);
            }));

        let kept = validator.validate(&links).await;
        let expected: Vec<String> = (0..12)
            .filter(|i| i % 3 != 0)
            .map(|i| format!("{base}/page{i}"))
            .collect();
        assert_eq!(kept, expected);
        assert_eq!(checked.load(Ordering::Relaxed), 12);
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let client = build_client(&HttpSettings::default()).unwrap();
        let validator = LinkValidator::new(client, Duration::from_secs(1)).with_concurrency(0);
        assert_eq!(validator.concurrency, 1);
    }
}
