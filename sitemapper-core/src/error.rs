use crate::model::Stage;
use sitemapper_scanner::ScanError;
use std::path::PathBuf;
use thiserror::Error;

/// Conditions that end a run. Display text is the caller-facing status.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No website address given")]
    MissingDomain,

    #[error("Invalid website address '{input}': {reason}")]
    InvalidDomain { input: String, reason: String },

    #[error("No sitemap found for {domain}")]
    NoSitemap { domain: String },

    #[error("No links found in {sitemap}")]
    NoLinks { sitemap: String },

    #[error("No matching links found for filter '{filters}'")]
    NoMatchingLinks { filters: String },

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("HTTP client setup failed: {0}")]
    Client(#[from] ScanError),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::MissingDomain
            | PipelineError::InvalidDomain { .. }
            | PipelineError::Client(_) => Stage::Input,
            PipelineError::NoSitemap { .. } => Stage::Discovery,
            PipelineError::NoLinks { .. } => Stage::Collection,
            PipelineError::NoMatchingLinks { .. } => Stage::Filter,
            PipelineError::Io { .. } | PipelineError::Csv { .. } => Stage::Output,
        }
    }
}
