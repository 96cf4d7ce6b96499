use crate::error::PipelineError;
use crate::keywords::KeywordCount;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Pipeline stage, used both for progress and to locate a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Input,
    Discovery,
    Collection,
    Filter,
    Validation,
    Output,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Input => "input",
            Stage::Discovery => "discovery",
            Stage::Collection => "collection",
            Stage::Filter => "filter",
            Stage::Validation => "validation",
            Stage::Output => "output",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
}

/// Message types sent from a running pipeline to its caller
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// A new stage started
    Stage { stage: Stage, message: String },
    /// Informational or non-fatal problem
    Log { level: LogLevel, message: String },
    /// Validation progress
    Progress { done: usize, total: usize },
    /// Terminal outcome, always the last message of a run
    Finished(RunOutcome),
}

/// Success record of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub domain: String,
    pub sitemap_url: String,
    pub robots_present: bool,
    /// Unique links collected before filtering
    pub collected: usize,
    /// Links left after the filter stage
    pub matched: usize,
    /// Links written to the output file
    pub kept: usize,
    pub validated: bool,
    pub failed_branches: usize,
    pub output_path: PathBuf,
    pub top_keywords: Vec<KeywordCount>,
}

impl RunSummary {
    pub fn output_file_name(&self) -> String {
        self.output_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.output_path.display().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RunOutcome {
    Success(RunSummary),
    Failure { stage: Stage, reason: String },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success(_))
    }
}

impl From<&Result<RunSummary, PipelineError>> for RunOutcome {
    fn from(result: &Result<RunSummary, PipelineError>) -> Self {
        match result {
            Ok(summary) => RunOutcome::Success(summary.clone()),
            Err(e) => RunOutcome::Failure {
                stage: e.stage(),
                reason: e.to_string(),
            },
        }
    }
}
