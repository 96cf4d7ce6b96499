pub mod domain;
pub mod error;
pub mod filter;
pub mod keywords;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod writer;

pub use domain::Domain;
pub use error::PipelineError;
pub use filter::{FilterSpec, apply_filter};
pub use keywords::{KeywordCount, top_keywords};
pub use model::{LogLevel, PipelineEvent, RunOutcome, RunSummary, Stage};
pub use pipeline::{PipelineInput, PipelineOptions, execute_pipeline, spawn_pipeline};
pub use report::{ReportFormat, generate_report};
pub use writer::{read_links, write_links};
