// Terminal summary of a run

use crate::keywords::format_keywords;
use crate::model::RunOutcome;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

pub fn generate_report(outcome: &RunOutcome, format: ReportFormat) -> serde_json::Result<String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(outcome)),
        ReportFormat::Json => serde_json::to_string_pretty(outcome),
    }
}

pub fn generate_text_report(outcome: &RunOutcome) -> String {
    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    match outcome {
        RunOutcome::Success(summary) => {
            report.push_str("# Summary:\n");
            report.push_str(&format!("  Website: {}\n", summary.domain));
            report.push_str(&format!("  Sitemap: {}\n", summary.sitemap_url));
            report.push_str(&format!(
                "  robots.txt: {}\n",
                if summary.robots_present { "found" } else { "not found" }
            ));
            report.push_str(&format!("  Links collected: {}\n", summary.collected));
            report.push_str(&format!("  Links matching filter: {}\n", summary.matched));
            if summary.validated {
                report.push_str(&format!("  Links answering 200: {}\n", summary.kept));
            }
            if summary.failed_branches > 0 {
                report.push_str(&format!(
                    "  Sitemaps skipped: {}\n",
                    summary.failed_branches
                ));
            }
            report.push_str(&format!(
                "  Saved links: {} in {}\n",
                summary.kept,
                summary.output_file_name()
            ));

            report.push_str("\n# Top keywords:\n");
            if summary.top_keywords.is_empty() {
                report.push_str("  (none)\n");
            } else {
                for line in format_keywords(&summary.top_keywords).lines() {
                    report.push_str(&format!("  {}\n", line));
                }
            }
        }
        RunOutcome::Failure { stage, reason } => {
            report.push_str(&format!("# Failed during {}:\n", stage));
            report.push_str(&format!("  {}\n", reason));
        }
    }

    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report
}
