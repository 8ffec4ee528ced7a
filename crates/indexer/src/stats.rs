use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statistics about one generator run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Files yielded by the corpus
    pub files: usize,

    /// Files dropped by the extension/suffix/content filters
    pub filtered: usize,

    /// Files without a recognizable test header
    pub without_header: usize,

    /// Spec tests marked as not linked
    pub not_linked: usize,

    /// Linked tests folded into the index
    pub linked_tests: usize,

    /// Linked tests that declared no links at all
    pub tests_without_links: usize,

    /// Test summaries appended across all coordinates
    pub link_records: usize,

    /// Linked tests per area
    pub areas: BTreeMap<String, usize>,

    /// Files written by the artifact writer
    pub files_written: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_linked_test(&mut self, area: &str, link_records: usize) {
        self.linked_tests += 1;
        self.link_records += link_records;
        if link_records == 0 {
            self.tests_without_links += 1;
        }
        *self.areas.entry(area.to_string()).or_insert(0) += 1;
    }

    pub fn add_written(&mut self, count: usize) {
        self.files_written += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn counts_tests_per_area() {
        let mut stats = RunStats::new();
        stats.add_linked_test("psi", 3);
        stats.add_linked_test("psi", 0);
        stats.add_linked_test("codegen/box", 1);

        assert_eq!(stats.linked_tests, 3);
        assert_eq!(stats.link_records, 4);
        assert_eq!(stats.tests_without_links, 1);
        assert_eq!(stats.areas.get("psi"), Some(&2));
    }
}
