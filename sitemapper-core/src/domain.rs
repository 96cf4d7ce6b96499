use crate::error::PipelineError;
use std::fmt;
use url::Url;

/// Normalized base URL of the site under inspection.
///
/// Built once per run. Any path the caller typed is kept, so
/// `https://example.com/shop` is probed under `/shop/`. Trailing slashes are
/// stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    base: String,
    url: Url,
}

impl Domain {
    /// Parse caller input, defaulting to `https://` when no scheme is given.
    pub fn parse(input: &str) -> Result<Self, PipelineError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PipelineError::MissingDomain);
        }

        let with_scheme = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        let invalid = |reason: String| PipelineError::InvalidDomain {
            input: trimmed.to_string(),
            reason,
        };

        let url = Url::parse(&with_scheme).map_err(|e| invalid(e.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }

        Ok(Self {
            base: with_scheme.trim_end_matches('/').to_string(),
            url,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// `<host without www.>.csv`, used when the caller gives no output path.
    pub fn default_file_name(&self) -> String {
        let host = self.host();
        format!("{}.csv", host.strip_prefix("www.").unwrap_or(host))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}
