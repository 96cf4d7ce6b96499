use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sitemapper_core::{
    Domain, FilterSpec, LogLevel, PipelineEvent, PipelineInput, PipelineOptions, ReportFormat,
    RunOutcome, generate_report, spawn_pipeline,
};
use sitemapper_scanner::{HttpSettings, RobotsChecker, SitemapLocator, build_client};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;

// Helper functions for the extract handler

/// Turn the raw `--filter` value into a filter spec
pub fn parse_filter_arg(filter: Option<&String>) -> FilterSpec {
    filter.map(|f| FilterSpec::parse(f)).unwrap_or_default()
}

/// Expand `~` in an explicit output path, or derive `<host>.csv`
pub fn resolve_output_path(output: Option<&PathBuf>, domain: &Domain) -> PathBuf {
    match output {
        Some(path) => {
            let raw = path.to_string_lossy();
            PathBuf::from(shellexpand::tilde(raw.as_ref()).into_owned())
        }
        None => PathBuf::from(domain.default_file_name()),
    }
}

/// HTTP settings with an optional timeout override for every stage
pub fn http_settings(timeout_secs: Option<u64>) -> HttpSettings {
    let settings = HttpSettings::default();
    match timeout_secs {
        Some(secs) => settings.with_uniform_timeout(Duration::from_secs(secs)),
        None => settings,
    }
}

/// Pipeline options from `extract` arguments
pub fn build_options(sub_matches: &ArgMatches) -> PipelineOptions {
    let defaults = PipelineOptions::default();
    PipelineOptions {
        http: http_settings(sub_matches.get_one::<u64>("timeout").copied()),
        validation_concurrency: sub_matches
            .get_one::<usize>("threads")
            .copied()
            .unwrap_or(defaults.validation_concurrency),
        top_keywords: sub_matches
            .get_one::<usize>("top")
            .copied()
            .unwrap_or(defaults.top_keywords),
        robots_fallback: sub_matches.get_flag("robots-fallback"),
        ..defaults
    }
}

/// One-line rendering of a progress event. `Finished` is rendered as a report instead.
pub fn format_event(event: &PipelineEvent) -> Option<String> {
    match event {
        PipelineEvent::Stage { message, .. } => Some(format!("{} {}", "→".blue(), message)),
        PipelineEvent::Log { level, message } => Some(match level {
            LogLevel::Info => format!("{} {}", "ℹ".blue(), message),
            LogLevel::Warn => format!("{} {}", "⚠".yellow().bold(), message.yellow()),
        }),
        PipelineEvent::Progress { done, total } => {
            Some(format!("{} Checking links... {}/{}", "→".blue(), done, total))
        }
        PipelineEvent::Finished(_) => None,
    }
}

pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::ERROR };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn new_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Starting...");
    spinner
}

fn render_event(spinner: &ProgressBar, event: &PipelineEvent) {
    let Some(line) = format_event(event) else {
        return;
    };
    match event {
        // Stage changes and progress replace the spinner line, logs scroll above it
        PipelineEvent::Stage { .. } | PipelineEvent::Progress { .. } => spinner.set_message(line),
        _ => spinner.println(line),
    }
}

fn parse_domain_or_exit(sub_matches: &ArgMatches) -> Domain {
    let raw = sub_matches
        .get_one::<String>("domain")
        .map(String::as_str)
        .unwrap_or_default();
    match Domain::parse(raw) {
        Ok(domain) => domain,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(2);
        }
    }
}

fn print_run_configuration(domain: &Domain, filters: &FilterSpec, validate: bool, output: &Path) {
    println!("\n{} {}", "🗺️  Extracting sitemap of".bold(), domain.to_string().bright_white());
    if filters.is_empty() {
        println!("Filter: none (keep all URLs)");
    } else {
        println!("Filter: {}", filters);
    }
    println!(
        "Validation: {}",
        if validate { "only status 200" } else { "off" }
    );
    println!("Output: {}\n", output.display());
}

pub async fn handle_extract(sub_matches: &ArgMatches, quiet: bool) {
    let domain = parse_domain_or_exit(sub_matches);
    let filters = parse_filter_arg(sub_matches.get_one::<String>("filter"));
    let validate = sub_matches.get_flag("validate");
    let output = resolve_output_path(sub_matches.get_one::<PathBuf>("output"), &domain);
    let format = sub_matches
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);
    let options = build_options(sub_matches);

    if !quiet {
        print_run_configuration(&domain, &filters, validate, &output);
    }

    let input = PipelineInput {
        domain: domain.to_string(),
        filters,
        validate,
        output,
    };

    // The pipeline runs on its own task; this loop only renders its messages
    let (handle, mut rx) = spawn_pipeline(input, options);
    let spinner = (!quiet).then(new_spinner);
    let mut outcome = None;

    while let Some(event) = rx.recv().await {
        match event {
            PipelineEvent::Finished(finished) => outcome = Some(finished),
            other => {
                if let Some(ref spinner) = spinner {
                    render_event(spinner, &other);
                }
            }
        }
    }

    if let Some(ref spinner) = spinner {
        spinner.finish_and_clear();
    }

    let outcome = match handle.await {
        Ok(result) => outcome.unwrap_or_else(|| RunOutcome::from(&result)),
        Err(e) => {
            eprintln!("{} Pipeline task failed: {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    match generate_report(&outcome, format) {
        Ok(report) => println!("{}", report),
        Err(e) => eprintln!("{} Failed to render summary: {}", "✗".red().bold(), e),
    }

    if !outcome.is_success() {
        std::process::exit(1);
    }
}

pub async fn handle_locate(sub_matches: &ArgMatches) {
    let domain = parse_domain_or_exit(sub_matches);
    let settings = http_settings(sub_matches.get_one::<u64>("timeout").copied());
    let client = match build_client(&settings) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    println!("\n{} {}\n", "🔎 Locating sitemap of".bold(), domain.to_string().bright_white());

    let robots = RobotsChecker::new(client.clone(), settings.discovery_timeout)
        .check(domain.as_str())
        .await;
    if robots.present {
        println!("{} robots.txt found", "✓".green().bold());
        for declared in robots.sitemaps() {
            println!("  {} Sitemap: {}", "•".blue(), declared.bright_white());
        }
    } else {
        println!("{} No robots.txt found or access denied", "⚠".yellow().bold());
    }

    let locator = SitemapLocator::new(client, settings.discovery_timeout);
    match locator.locate(domain.as_str()).await {
        Some(url) => println!("{} Sitemap: {}", "✓".green().bold(), url.bright_white()),
        None => {
            println!(
                "{} No sitemap found at {} standard location(s)",
                "✗".red().bold(),
                locator.candidates().len()
            );
            std::process::exit(1);
        }
    }
}
