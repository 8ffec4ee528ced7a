use crate::config::{AreaConfig, SpecMapConfig};
use crate::error::{IndexerError, Result};
use crate::ordered_map::OrderedMap;
use serde::{Serialize, Serializer};
use specmap_metadata::{LinkRole, LinkedTest, SpecCoordinate};

/// One test as attached to a spec coordinate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    pub spec_version: String,
    pub cases_number: usize,
    pub description: String,
    pub path: String,
    pub unexpected_behaviour: bool,
    pub link_type: LinkRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helpers: Option<String>,
}

impl TestSummary {
    pub fn new(test: &LinkedTest, path: &str, link_type: LinkRole) -> Self {
        Self {
            spec_version: test.spec_version.clone(),
            cases_number: test.cases.len(),
            description: test.description.clone(),
            path: path.to_string(),
            unexpected_behaviour: test.has_unexpected_behavior(),
            link_type,
            helpers: test.helpers.as_ref().map(|helpers| helpers.join(", ")),
        }
    }
}

/// sentence number -> tests
pub type SentenceTests = OrderedMap<Vec<TestSummary>>;
/// test type -> sentences
pub type TypeTests = OrderedMap<SentenceTests>;
/// paragraph number -> test types
pub type ParagraphTests = OrderedMap<TypeTests>;

/// Tests of one area keyed by section path, paragraph, test type and sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FineIndex {
    area: String,
    linked_path: String,
    sections: OrderedMap<ParagraphTests>,
}

impl FineIndex {
    pub fn new(area: &AreaConfig) -> Self {
        Self {
            area: area.name.clone(),
            linked_path: area.linked_path(),
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

    /// Returns the sequence for a key, creating every missing level.
    pub fn tests_at(
        &mut self,
        coordinate: &SpecCoordinate,
        test_type: &str,
    ) -> &mut Vec<TestSummary> {
        self.sections
            .entry_or_default(&coordinate.section_path())
            .entry_or_default(&coordinate.paragraph().to_string())
            .entry_or_default(test_type)
            .entry_or_default(&coordinate.sentence().to_string())
    }

    pub fn sections(&self) -> &OrderedMap<ParagraphTests> {
        &self.sections
    }

    pub fn section(&self, section_path: &str) -> Option<&ParagraphTests> {
        self.sections.get(section_path)
    }

    /// Looks up the tests at one fully specified key.
    pub fn get(
        &self,
        section_path: &str,
        paragraph: &str,
        test_type: &str,
        sentence: &str,
    ) -> Option<&Vec<TestSummary>> {
        self.sections
            .get(section_path)?
            .get(paragraph)?
            .get(test_type)?
            .get(sentence)
    }

    /// `{data_path}/linked/{section path}` for a section path of this index
    pub fn composite_key(&self, section_path: &str) -> String {
        format!("{}/{section_path}", self.linked_path)
    }

    /// Composite keys in discovery order
    pub fn composite_keys(&self) -> impl Iterator<Item = String> + '_ {
        self.sections
            .keys()
            .map(|section_path| self.composite_key(section_path))
    }

    pub fn summary_count(&self) -> usize {
        self.sections
            .values()
            .flat_map(|paragraphs| paragraphs.values())
            .flat_map(|types| types.values())
            .flat_map(|sentences| sentences.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl Serialize for FineIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.sections.serialize(serializer)
    }
}

/// Fine indexes of every area that received at least one link, keyed by area name
pub type FineIndexSet = OrderedMap<FineIndex>;

/// Folds linked tests into per-area fine indexes
pub struct FineIndexer<'a> {
    config: &'a SpecMapConfig,
    indexes: FineIndexSet,
}

impl<'a> FineIndexer<'a> {
    pub fn new(config: &'a SpecMapConfig) -> Self {
        Self {
            config,
            indexes: FineIndexSet::new(),
        }
    }

    /// Append one summary per declared link. Returns the number appended.
    pub fn add(&mut self, test: &LinkedTest, path: &str) -> Result<usize> {
        if test.link_count() == 0 {
            log::debug!("{path}: no spec links, skipping");
            return Ok(0);
        }

        let config = self.config;
        let area = config
            .area(&test.area)
            .ok_or_else(|| IndexerError::UnknownArea {
                area: test.area.clone(),
                path: path.to_string(),
            })?;
        let index = self
            .indexes
            .get_or_insert_with(&area.name, || FineIndex::new(area));

        let mut appended = 0;
        for (role, coordinate) in test.links() {
            index
                .tests_at(coordinate, test.test_type.as_str())
                .push(TestSummary::new(test, path, role));
            appended += 1;
        }
        Ok(appended)
    }

    pub fn finish(self) -> FineIndexSet {
        self.indexes
    }
}
