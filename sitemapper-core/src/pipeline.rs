use crate::domain::Domain;
use crate::error::PipelineError;
use crate::filter::FilterSpec;
use crate::keywords::{DEFAULT_TOP_KEYWORDS, top_keywords};
use crate::model::{LogLevel, PipelineEvent, RunOutcome, RunSummary, Stage};
use crate::writer::write_links;
use sitemapper_scanner::{
    HttpSettings, LinkValidator, RobotsChecker, SITEMAP_PATHS, SitemapCollector, SitemapLocator,
    build_client,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

/// Plain input values for one run
#[derive(Debug, Clone)]
pub struct PipelineInput {
    pub domain: String,
    pub filters: FilterSpec,
    /// Keep only links answering 200
    pub validate: bool,
    pub output: PathBuf,
}

/// Tunables shared by every run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub http: HttpSettings,
    pub candidate_paths: Vec<String>,
    pub validation_concurrency: usize,
    pub top_keywords: usize,
    /// Probe robots.txt `Sitemap:` entries when no candidate path matches
    pub robots_fallback: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            http: HttpSettings::default(),
            candidate_paths: SITEMAP_PATHS.iter().map(|p| p.to_string()).collect(),
            validation_concurrency: 8,
            top_keywords: DEFAULT_TOP_KEYWORDS,
            robots_fallback: false,
        }
    }
}

pub type EventSender = mpsc::UnboundedSender<PipelineEvent>;

/// Forwards events to the caller when a channel is attached.
#[derive(Clone, Default)]
struct Reporter {
    tx: Option<EventSender>,
}

impl Reporter {
    fn send(&self, event: PipelineEvent) {
        if let Some(ref tx) = self.tx {
            // A dropped receiver only means nobody is watching
            let _ = tx.send(event);
        }
    }

    fn stage(&self, stage: Stage, message: impl Into<String>) {
        self.send(PipelineEvent::Stage {
            stage,
            message: message.into(),
        });
    }

    fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.send(PipelineEvent::Log {
            level,
            message: message.into(),
        });
    }
}

/// Run discovery, collection, filtering, optional validation and output.
///
/// Progress goes to `events`; the last message is always
/// [`PipelineEvent::Finished`]. All state is local to the call.
pub async fn execute_pipeline(
    input: PipelineInput,
    options: PipelineOptions,
    events: Option<EventSender>,
) -> Result<RunSummary, PipelineError> {
    let reporter = Reporter { tx: events };
    let result = run_stages(input, &options, &reporter).await;
    reporter.send(PipelineEvent::Finished(RunOutcome::from(&result)));
    result
}

/// Run [`execute_pipeline`] on a background task.
pub fn spawn_pipeline(
    input: PipelineInput,
    options: PipelineOptions,
) -> (
    JoinHandle<Result<RunSummary, PipelineError>>,
    mpsc::UnboundedReceiver<PipelineEvent>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(execute_pipeline(input, options, Some(tx)));
    (handle, rx)
}

async fn run_stages(
    input: PipelineInput,
    options: &PipelineOptions,
    reporter: &Reporter,
) -> Result<RunSummary, PipelineError> {
    let PipelineInput {
        domain,
        filters,
        validate,
        output,
    } = input;

    let domain = Domain::parse(&domain)?;
    let http = &options.http;
    let client = build_client(http)?;

    // Discovery
    reporter.stage(Stage::Discovery, format!("Searching for sitemap on {}...", domain));
    let robots = RobotsChecker::new(client.clone(), http.discovery_timeout)
        .check(domain.as_str())
        .await;
    let declared = robots.sitemaps();
    if robots.present {
        reporter.log(
            LogLevel::Info,
            format!("robots.txt found ({} sitemap declaration(s))", declared.len()),
        );
    } else {
        reporter.log(LogLevel::Warn, "No robots.txt found or access denied");
    }

    let locator = SitemapLocator::new(client.clone(), http.discovery_timeout)
        .with_candidates(options.candidate_paths.clone());
    let mut sitemap_url = locator.locate(domain.as_str()).await;
    if sitemap_url.is_none() && options.robots_fallback && !declared.is_empty() {
        reporter.log(
            LogLevel::Info,
            "Trying sitemaps declared in robots.txt",
        );
        sitemap_url = locator.first_accepted(&declared).await;
    }
    let sitemap_url = sitemap_url.ok_or_else(|| PipelineError::NoSitemap {
        domain: domain.to_string(),
    })?;

    // Collection
    reporter.stage(Stage::Collection, format!("Loading sitemap {}...", sitemap_url));
    let fetch_reporter = reporter.clone();
    let collector = SitemapCollector::new(client.clone(), http.sitemap_timeout)
        .with_progress_callback(Arc::new(move |url: String| {
            fetch_reporter.log(LogLevel::Info, format!("Reading {}", url));
        }));
    let report = collector.collect(&sitemap_url).await;
    for failure in &report.failures {
        reporter.log(
            LogLevel::Warn,
            format!("Skipped sitemap {}: {}", failure.url, failure.reason),
        );
    }
    if report.links.is_empty() {
        return Err(PipelineError::NoLinks {
            sitemap: sitemap_url,
        });
    }
    let failed_branches = report.failures.len();
    let links = report.links.into_vec();
    let collected = links.len();

    // Filter
    let links = filters.apply(links);
    if links.is_empty() {
        return Err(PipelineError::NoMatchingLinks {
            filters: filters.to_string(),
        });
    }
    let matched = links.len();
    info!("{} of {} links match the filter", matched, collected);

    // Validation
    let links = if validate {
        reporter.stage(
            Stage::Validation,
            format!("Checking {} links for status 200...", matched),
        );
        let progress_reporter = reporter.clone();
        LinkValidator::new(client, http.validation_timeout)
            .with_concurrency(options.validation_concurrency)
            .with_progress_callback(Arc::new(move |done, total| {
                progress_reporter.send(PipelineEvent::Progress { done, total });
            }))
            .validate(&links)
            .await
    } else {
        links
    };

    // Output
    reporter.stage(
        Stage::Output,
        format!("Writing {} links to {}...", links.len(), output.display()),
    );
    write_links(&links, &output)?;
    let keywords = top_keywords(&links, options.top_keywords);

    Ok(RunSummary {
        domain: domain.to_string(),
        sitemap_url,
        robots_present: robots.present,
        collected,
        matched,
        kept: links.len(),
        validated: validate,
        failed_branches,
        output_path: output,
        top_keywords: keywords,
    })
}
