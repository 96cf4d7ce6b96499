use std::collections::HashSet;

/// Page URLs gathered from one or more sitemap documents.
///
/// Uniqueness is enforced on insert; iteration follows first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the link was already present.
    pub fn insert(&mut self, link: String) -> bool {
        if self.seen.contains(&link) {
            return false;
        }
        self.seen.insert(link.clone());
        self.ordered.push(link);
        true
    }

    pub fn contains(&self, link: &str) -> bool {
        self.seen.contains(link)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.ordered.iter()
    }

    /// Materialize into an ordered sequence for the filter stage.
    pub fn into_vec(self) -> Vec<String> {
        self.ordered
    }

    pub fn as_set(&self) -> &HashSet<String> {
        &self.seen
    }
}

impl Extend<String> for LinkSet {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        for link in iter {
            self.insert(link);
        }
    }
}

impl FromIterator<String> for LinkSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        let mut set = LinkSet::new();
        set.extend(iter);
        set
    }
}

/// A sitemap branch that could not be fetched or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchFailure {
    pub url: String,
    pub reason: String,
}

/// Everything a collection pass produced, including partial failures.
#[derive(Debug, Clone, Default)]
pub struct CollectReport {
    pub links: LinkSet,
    /// Sitemap documents that were fetched and parsed successfully
    pub sitemaps_fetched: usize,
    pub failures: Vec<BranchFailure>,
}
