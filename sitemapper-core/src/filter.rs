use serde::Serialize;
use std::fmt;

/// Literal substrings a link must contain at least one of.
///
/// An empty spec keeps every link. Matching is case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    patterns: Vec<String>,
}

impl FilterSpec {
    /// Duplicate and empty patterns are dropped.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = FilterSpec::default();
        for pattern in patterns {
            let pattern = pattern.into();
            if !pattern.is_empty() && !spec.patterns.contains(&pattern) {
                spec.patterns.push(pattern);
            }
        }
        spec
    }

    /// Parse a comma-separated list such as `"/blog/, /post/"`.
    pub fn parse(input: &str) -> Self {
        Self::new(input.split(',').map(str::trim))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn matches(&self, link: &str) -> bool {
        self.is_empty() || self.patterns.iter().any(|p| link.contains(p.as_str()))
    }

    /// Order-preserving subset of `links` that match.
    pub fn apply(&self, links: Vec<String>) -> Vec<String> {
        if self.is_empty() {
            return links;
        }
        links.into_iter().filter(|link| self.matches(link)).collect()
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.patterns.join(", "))
    }
}

pub fn apply_filter(links: Vec<String>, filters: &FilterSpec) -> Vec<String> {
    filters.apply(links)
}
