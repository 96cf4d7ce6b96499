// CSV output of the final link list

use crate::error::PipelineError;
use std::fs::File;
use std::path::Path;
use tracing::info;

pub const HEADER: &str = "URL";

/// Write `URL` followed by one row per link. Fields are quoted by the csv
/// writer whenever they contain a delimiter, quote or line break.
pub fn write_links(links: &[String], path: &Path) -> Result<(), PipelineError> {
    let file = File::create(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_error = |source| PipelineError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record([HEADER]).map_err(csv_error)?;
    for link in links {
        writer.write_record([link.as_str()]).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Wrote {} links to {}", links.len(), path.display());
    Ok(())
}

/// Read back a file produced by [`write_links`], skipping the header.
pub fn read_links(path: &Path) -> Result<Vec<String>, PipelineError> {
    let csv_error = |source| PipelineError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
    let mut links = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        links.push(record.get(0).unwrap_or_default().to_string());
    }
    Ok(links)
}
