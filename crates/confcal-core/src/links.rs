//! Proceedings link table: paper title to publication URL.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Mapping from a paper's display title to its canonical proceedings URL.
///
/// Built once per run from the proceedings document and read-only
/// thereafter. Lookup is by exact title string; a miss is the documented
/// fallback path (the event links to its own detail page instead), not an
/// error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProceedingsLinks {
    entries: HashMap<String, String>,
}

impl ProceedingsLinks {
    /// Creates an empty link table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a title → URL association.
    pub fn insert(&mut self, title: impl Into<String>, url: impl Into<String>) {
        self.entries.insert(title.into(), url.into());
    }

    /// Looks up the proceedings URL for an exact title match.
    pub fn lookup(&self, title: &str) -> Option<&str> {
        self.entries.get(title).map(String::as_str)
    }

    /// Number of linked papers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no papers are linked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for ProceedingsLinks {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_lookup() {
        let mut links = ProceedingsLinks::new();
        links.insert(
            "Attention Is All You Need",
            "https://papers.example/paper/123",
        );

        assert_eq!(
            links.lookup("Attention Is All You Need"),
            Some("https://papers.example/paper/123")
        );
        // Near-duplicate titles are misses by design.
        assert_eq!(links.lookup("attention is all you need"), None);
        assert_eq!(links.lookup("Attention Is All You Need "), None);
    }

    #[test]
    fn empty_table_is_valid() {
        let links = ProceedingsLinks::new();
        assert!(links.is_empty());
        assert_eq!(links.lookup("anything"), None);
    }
}
