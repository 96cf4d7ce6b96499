// Keyword frequency over URL segments

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_TOP_KEYWORDS: usize = 10;

/// Segments this short or shorter are never counted.
pub const MAX_IGNORED_SEGMENT_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

/// Count every `/`-separated segment longer than three characters.
///
/// Entries come back in order of first appearance across `links`.
pub fn tally_keywords(links: &[String]) -> Vec<KeywordCount> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut tally: Vec<KeywordCount> = Vec::new();

    for link in links {
        for segment in link.split('/') {
            if segment.chars().count() <= MAX_IGNORED_SEGMENT_LEN {
                continue;
            }
            match positions.get(segment) {
                Some(&idx) => tally[idx].count += 1,
                None => {
                    positions.insert(segment, tally.len());
                    tally.push(KeywordCount {
                        keyword: segment.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    tally
}

/// The `n` most frequent segments; ties keep first-appearance order.
pub fn top_keywords(links: &[String], n: usize) -> Vec<KeywordCount> {
    let mut tally = tally_keywords(links);
    // stable sort keeps first-appearance order within equal counts
    tally.sort_by(|a, b| b.count.cmp(&a.count));
    tally.truncate(n);
    tally
}

/// One `keyword: count` line per entry.
pub fn format_keywords(keywords: &[KeywordCount]) -> String {
    keywords
        .iter()
        .map(|k| format!("{}: {}", k.keyword, k.count))
        .collect::<Vec<_>>()
        .join("\n")
}
