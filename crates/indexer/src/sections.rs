use crate::classifier::PathClassifier;
use crate::fine_index::FineIndex;
use crate::ordered_map::OrderedMap;
use serde::{Serialize, Serializer};

/// Main section name -> sub-section paths seen under it, one entry per composite key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionIndex {
    area: String,
    linked_path: String,
    sections: OrderedMap<Vec<String>>,
}

impl SectionIndex {
    pub fn new(area: impl Into<String>, linked_path: impl Into<String>) -> Self {
        Self {
            area: area.into(),
            linked_path: linked_path.into(),
            sections: OrderedMap::new(),
        }
    }

    pub fn area(&self) -> &str {
        &self.area
    }

    /// `{data_path}/linked`
    pub fn linked_path(&self) -> &str {
        &self.linked_path
    }

    /// Records `sub_section_path` under `main_section`. Duplicates are kept; an
    /// empty path is only skipped when it would be the entry's first value.
    pub fn add(&mut self, main_section: &str, sub_section_path: &str) {
        if !self.sections.contains_key(main_section) {
            let paths = self.sections.entry_or_default(main_section);
            if !sub_section_path.is_empty() {
                paths.push(sub_section_path.to_string());
            }
            return;
        }
        self.sections
            .entry_or_default(main_section)
            .push(sub_section_path.to_string());
    }

    pub fn get(&self, main_section: &str) -> Option<&Vec<String>> {
        self.sections.get(main_section)
    }

    pub fn main_sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl Serialize for SectionIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.sections.serialize(serializer)
    }
}

/// Section indexes keyed by area name
pub type SectionIndexSet = OrderedMap<SectionIndex>;

/// Reduces the composite keys of a fine index into a section index
pub struct SectionReducer<'a> {
    classifier: &'a PathClassifier,
}

impl<'a> SectionReducer<'a> {
    pub fn new(classifier: &'a PathClassifier) -> Self {
        Self { classifier }
    }

    /// Keys that fail classification, or that resolve to a different area, are dropped.
    /// The reduction itself never aborts; a fine index only holds keys of its own area.
    pub fn reduce<I, K>(&self, area: &str, linked_path: &str, keys: I) -> SectionIndex
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut index = SectionIndex::new(area, linked_path);
        for key in keys {
            let key = key.as_ref();
            match self.classifier.classify(key) {
                Ok(classification) if classification.area == area => {
                    index.add(
                        &classification.main_section,
                        &classification.sub_section_path,
                    );
                }
                Ok(classification) => {
                    log::warn!(
                        "Dropping {key}: classified as `{}`, expected `{area}`",
                        classification.area
                    );
                }
                Err(err) => log::warn!("Dropping {key}: {err}"),
            }
        }
        index
    }

    pub fn reduce_fine_index(&self, fine: &FineIndex) -> SectionIndex {
        self.reduce(fine.area(), fine.linked_path(), fine.composite_keys())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpecMapConfig;
    use pretty_assertions::assert_eq;

    fn reduce(area: &str, keys: &[&str]) -> SectionIndex {
        let classifier = PathClassifier::new(&SpecMapConfig::default().areas);
        SectionReducer::new(&classifier).reduce(area, "unused", keys.iter().copied())
    }

    #[test]
    fn groups_sub_sections_under_main_section() {
        let index = reduce(
            "psi",
            &[
                "psi/linked/expressions/when",
                "psi/linked/expressions/when/exhaustive",
                "psi/linked/statements/loops",
            ],
        );
        assert_eq!(
            index.main_sections().collect::<Vec<_>>(),
            vec!["expressions", "statements"]
        );
        assert_eq!(
            index.get("expressions").unwrap(),
            &vec!["when".to_string(), "when/exhaustive".to_string()]
        );
    }

    #[test]
    fn keeps_duplicates_and_skips_only_leading_empty_path() {
        let index = reduce(
            "psi",
            &[
                "psi/linked/a",
                "psi/linked/a/b",
                "psi/linked/a",
                "psi/linked/a/b",
            ],
        );
        assert_eq!(
            index.get("a").unwrap(),
            &vec!["b".to_string(), String::new(), "b".to_string()]
        );

        let index = reduce("psi", &["psi/linked/only"]);
        assert_eq!(index.get("only").unwrap(), &Vec::<String>::new());
    }

    #[test]
    fn drops_unclassifiable_and_foreign_keys() {
        let index = reduce(
            "codegen/box",
            &[
                "weird/x/y",
                "codegen/other/linked/a",
                "psi/linked/a/b",
                "codegen/box/linked/m/n",
            ],
        );
        assert_eq!(index.main_sections().collect::<Vec<_>>(), vec!["m"]);
        assert_eq!(index.get("m").unwrap(), &vec!["n".to_string()]);
    }

    #[test]
    fn reduction_is_repeatable() {
        let keys = ["diagnostics/linked/a/b", "diagnostics/linked/a/b"];
        let first = reduce("diagnostics", &keys);
        let second = reduce("diagnostics", &keys);
        assert_eq!(first, second);
        assert_eq!(first.get("a").unwrap().len(), 2);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
