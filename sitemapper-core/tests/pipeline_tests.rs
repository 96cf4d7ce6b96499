// End-to-end pipeline scenarios against a mock website

use sitemapper_core::error::PipelineError;
use sitemapper_core::filter::FilterSpec;
use sitemapper_core::model::{LogLevel, PipelineEvent, RunOutcome, Stage};
use sitemapper_core::pipeline::{PipelineInput, PipelineOptions, execute_pipeline, spawn_pipeline};
use sitemapper_core::writer::read_links;
use sitemapper_scanner::HttpSettings;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn options() -> PipelineOptions {
    PipelineOptions {
        http: HttpSettings::default().with_uniform_timeout(Duration::from_secs(2)),
        ..PipelineOptions::default()
    }
}

fn input(domain: &str, filters: &str, validate: bool, output: PathBuf) -> PipelineInput {
    PipelineInput {
        domain: domain.to_string(),
        filters: FilterSpec::parse(filters),
        validate,
        output,
    }
}

fn urlset(locs: &[String]) -> String {
    let mut xml = String::from(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    for loc in locs {
        xml.push_str(&format!("<url><loc>{}</loc></url>", loc));
    }
    xml.push_str("</urlset>");
    xml
}

async fn serve(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// `/sitemap.xml` with two blog posts and one other page
async fn blog_site() -> MockServer {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    serve(
        &mock_server,
        "/sitemap.xml",
        urlset(&[
            format!("{base}/blog/first-post"),
            format!("{base}/about"),
            format!("{base}/blog/second-post"),
        ]),
    )
    .await;
    mock_server
}

#[tokio::test]
async fn test_filtered_run_without_validation() {
    let mock_server = blog_site().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let summary = execute_pipeline(
        input(&mock_server.uri(), "/blog/", false, output.clone()),
        options(),
        None,
    )
    .await
    .unwrap();

    assert_eq!(summary.collected, 3);
    assert_eq!(summary.matched, 2);
    assert_eq!(summary.kept, 2);
    assert!(!summary.robots_present);
    assert_eq!(summary.sitemap_url, format!("{}/sitemap.xml", mock_server.uri()));
    assert_eq!(summary.output_file_name(), "out.csv");

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(content.lines().count(), 3);
    assert_eq!(content.lines().next(), Some("URL"));
    assert!(read_links(&output).unwrap().iter().all(|l| l.contains("/blog/")));

    assert!(summary.top_keywords.iter().any(|k| k.keyword == "blog" && k.count == 2));
    assert!(summary.top_keywords.len() <= 10);
}

#[tokio::test]
async fn test_sitemap_index_with_two_children() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    serve(
        &mock_server,
        "/sitemap.xml",
        format!(
            r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                <sitemap><loc>{base}/one.xml</loc></sitemap>
                <sitemap><loc>{base}/two.xml</loc></sitemap>
            </sitemapindex>"#
        ),
    )
    .await;
    serve(&mock_server, "/one.xml", urlset(&[format!("{base}/page-one")])).await;
    serve(&mock_server, "/two.xml", urlset(&[format!("{base}/page-two")])).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    let summary = execute_pipeline(input(&base, "", false, output.clone()), options(), None)
        .await
        .unwrap();

    assert_eq!(summary.collected, 2);
    let mut written = read_links(&output).unwrap();
    written.sort();
    assert_eq!(written, vec![format!("{base}/page-one"), format!("{base}/page-two")]);
}

#[tokio::test]
async fn test_no_sitemap_found() {
    let mock_server = MockServer::start().await;
    for candidate in sitemapper_scanner::SITEMAP_PATHS {
        Mock::given(method("GET"))
            .and(path(candidate))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;
    }
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let err = execute_pipeline(input(&mock_server.uri(), "", false, output.clone()), options(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::NoSitemap { .. }));
    assert_eq!(err.stage(), Stage::Discovery);
    assert!(err.to_string().contains("No sitemap found"));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_filter_without_matches_aborts_before_writing() {
    let mock_server = blog_site().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let err = execute_pipeline(
        input(&mock_server.uri(), "/zzz/", false, output.clone()),
        options(),
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PipelineError::NoMatchingLinks { .. }));
    assert_eq!(err.stage(), Stage::Filter);
    assert!(err.to_string().contains("No matching links"));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_empty_sitemap_is_no_links() {
    let mock_server = MockServer::start().await;
    serve(&mock_server, "/sitemap.xml", urlset(&[])).await;
    let dir = TempDir::new().unwrap();

    let err = execute_pipeline(
        input(&mock_server.uri(), "", false, dir.path().join("out.csv")),
        options(),
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PipelineError::NoLinks { .. }));
    assert_eq!(err.stage(), Stage::Collection);
}

#[tokio::test]
async fn test_validation_keeps_only_ok_links() {
    let mock_server = blog_site().await;
    Mock::given(method("HEAD"))
        .and(path("/blog/first-post"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/blog/second-post"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let summary = execute_pipeline(
        input(&mock_server.uri(), "/blog/", true, output.clone()),
        options(),
        None,
    )
    .await
    .unwrap();

    assert_eq!(summary.matched, 2);
    assert_eq!(summary.kept, 1);
    assert!(summary.validated);
    assert_eq!(
        read_links(&output).unwrap(),
        vec![format!("{}/blog/first-post", mock_server.uri())]
    );
}

#[tokio::test]
async fn test_validation_may_empty_the_output() {
    let mock_server = blog_site().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    // No HEAD mocks: every check answers 404
    let summary = execute_pipeline(input(&mock_server.uri(), "", true, output.clone()), options(), None)
        .await
        .unwrap();

    assert_eq!(summary.kept, 0);
    assert!(summary.top_keywords.is_empty());
    assert!(read_links(&output).unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_domain_reports_input_failure() {
    let dir = TempDir::new().unwrap();
    let (handle, mut rx) = spawn_pipeline(input("  ", "", false, dir.path().join("out.csv")), options());

    let err = handle.await.unwrap().unwrap_err();
    assert!(matches!(err, PipelineError::MissingDomain));

    let mut last = None;
    while let Some(event) = rx.recv().await {
        last = Some(event);
    }
    match last {
        Some(PipelineEvent::Finished(RunOutcome::Failure { stage, .. })) => {
            assert_eq!(stage, Stage::Input)
        }
        other => panic!("expected a failure outcome, got {:?}", other),
    }
}

#[tokio::test]
async fn test_events_are_sent_in_stage_order() {
    let mock_server = blog_site().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    let dir = TempDir::new().unwrap();

    let (handle, mut rx) = spawn_pipeline(
        input(&mock_server.uri(), "/blog/", true, dir.path().join("out.csv")),
        options(),
    );

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    let summary = handle.await.unwrap().unwrap();
    assert_eq!(summary.kept, 2);

    let stages: Vec<Stage> = events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::Stage { stage, .. } => Some(*stage),
            _ => None,
        })
        .collect();
    assert_eq!(
        stages,
        vec![Stage::Discovery, Stage::Collection, Stage::Validation, Stage::Output]
    );

    assert!(events.iter().any(|e| matches!(
        e,
        PipelineEvent::Log { level: LogLevel::Warn, message } if message.contains("robots.txt")
    )));
    let progress: Vec<(usize, usize)> = events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::Progress { done, total } => Some((*done, *total)),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![(1, 2), (2, 2)]);

    assert!(matches!(
        events.last(),
        Some(PipelineEvent::Finished(RunOutcome::Success(_)))
    ));
}

#[tokio::test]
async fn test_robots_fallback() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    serve(
        &mock_server,
        "/robots.txt",
        format!("User-agent: *\nSitemap: {base}/custom/map.xml\n"),
    )
    .await;
    serve(&mock_server, "/custom/map.xml", urlset(&[format!("{base}/page")])).await;
    let dir = TempDir::new().unwrap();

    let err = execute_pipeline(
        input(&base, "", false, dir.path().join("a.csv")),
        options(),
        None,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, PipelineError::NoSitemap { .. }));

    let with_fallback = PipelineOptions {
        robots_fallback: true,
        ..options()
    };
    let summary = execute_pipeline(
        input(&base, "", false, dir.path().join("b.csv")),
        with_fallback,
        None,
    )
    .await
    .unwrap();
    assert!(summary.robots_present);
    assert_eq!(summary.sitemap_url, format!("{base}/custom/map.xml"));
    assert_eq!(summary.kept, 1);
}

#[tokio::test]
async fn test_failed_child_sitemap_is_not_fatal() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    serve(
        &mock_server,
        "/sitemap_index.xml",
        format!(
            "<sitemapindex><sitemap><loc>{base}/ok.xml</loc></sitemap><sitemap><loc>{base}/gone.xml</loc></sitemap></sitemapindex>"
        ),
    )
    .await;
    serve(&mock_server, "/ok.xml", urlset(&[format!("{base}/kept-page")])).await;
    let dir = TempDir::new().unwrap();

    let summary = execute_pipeline(
        input(&base, "", false, dir.path().join("out.csv")),
        options(),
        None,
    )
    .await
    .unwrap();

    assert_eq!(summary.sitemap_url, format!("{base}/sitemap_index.xml"));
    assert_eq!(summary.kept, 1);
    assert_eq!(summary.failed_branches, 1);
}

#[tokio::test]
async fn test_unwritable_output_is_fatal() {
    let mock_server = blog_site().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("no-such-dir").join("out.csv");

    let err = execute_pipeline(input(&mock_server.uri(), "", false, output), options(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Io { .. }));
    assert_eq!(err.stage(), Stage::Output);
}
