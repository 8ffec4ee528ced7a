use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Address of a single sentence of specification text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpecCoordinate {
    sections: Vec<String>,
    paragraph: u32,
    sentence: u32,
}

impl SpecCoordinate {
    /// Create a coordinate. Returns `None` when `sections` is empty or a
    /// section name contains the `/` path separator.
    #[must_use]
    pub fn new(sections: Vec<String>, paragraph: u32, sentence: u32) -> Option<Self> {
        if sections.is_empty() || sections.iter().any(|section| section.contains('/')) {
            return None;
        }
        Some(Self {
            sections,
            paragraph,
            sentence,
        })
    }

    /// Section names from root to leaf
    #[must_use]
    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    #[must_use]
    pub const fn paragraph(&self) -> u32 {
        self.paragraph
    }

    #[must_use]
    pub const fn sentence(&self) -> u32 {
        self.sentence
    }

    /// Sections joined with `/`, as used in on-disk layouts
    #[must_use]
    pub fn section_path(&self) -> String {
        self.sections.join("/")
    }
}

impl fmt::Display for SpecCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> paragraph {} -> sentence {}",
            self.sections.join(", "),
            self.paragraph,
            self.sentence
        )
    }
}

/// Whether a test expects the compiler to accept or reject its code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestType {
    #[serde(rename = "pos")]
    Positive,
    #[serde(rename = "neg")]
    Negative,
}

impl TestType {
    /// Short key used in generated maps
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TestType::Positive => "pos",
            TestType::Negative => "neg",
        }
    }

    /// Accepts both header spellings (`POSITIVE`) and short keys (`pos`)
    #[must_use]
    pub fn from_header(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "positive" | "pos" => Some(TestType::Positive),
            "negative" | "neg" => Some(TestType::Negative),
            _ => None,
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strength of the association between a test and a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkRole {
    Main,
    Primary,
    Secondary,
}

impl LinkRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LinkRole::Main => "main",
            LinkRole::Primary => "primary",
            LinkRole::Secondary => "secondary",
        }
    }
}

impl fmt::Display for LinkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a test lives relative to the specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestOrigin {
    /// Written against the specification, under the spec test data root
    Spec,
    /// Regular compiler test carrying spec links
    Implementation,
}

impl TestOrigin {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TestOrigin::Spec => "spec",
            TestOrigin::Implementation => "implementation",
        }
    }
}

/// One numbered case inside a test file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub number: u32,
    pub unexpected_behavior: bool,
}

/// Test cases keyed by their number
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCases {
    by_number: BTreeMap<u32, TestCase>,
}

impl TestCases {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a case. Re-declaring a number keeps it flagged if it was flagged before.
    pub fn declare(&mut self, number: u32) {
        self.by_number.entry(number).or_insert(TestCase {
            number,
            unexpected_behavior: false,
        });
    }

    pub fn flag_unexpected(&mut self, number: u32) {
        self.by_number
            .entry(number)
            .or_insert(TestCase {
                number,
                unexpected_behavior: false,
            })
            .unexpected_behavior = true;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_number.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_number.is_empty()
    }

    #[must_use]
    pub fn get(&self, number: u32) -> Option<&TestCase> {
        self.by_number.get(&number)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestCase> {
        self.by_number.values()
    }

    #[must_use]
    pub fn any_unexpected(&self) -> bool {
        self.by_number.values().any(|case| case.unexpected_behavior)
    }
}

impl FromIterator<TestCase> for TestCases {
    fn from_iter<I: IntoIterator<Item = TestCase>>(iter: I) -> Self {
        let mut cases = Self::new();
        for case in iter {
            if case.unexpected_behavior {
                cases.flag_unexpected(case.number);
            } else {
                cases.declare(case.number);
            }
        }
        cases
    }
}

/// A test file whose header links it to the specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedTest {
    /// Configured area name (e.g. `psi`, `codegen/box`)
    pub area: String,
    pub test_type: TestType,
    pub spec_version: String,
    pub main_link: Option<SpecCoordinate>,
    pub primary_links: Vec<SpecCoordinate>,
    pub secondary_links: Vec<SpecCoordinate>,
    pub cases: TestCases,
    pub description: String,
    pub helpers: Option<Vec<String>>,
    pub unexpected_behavior: bool,
    pub number: Option<u32>,
    pub issues: Vec<String>,
}

impl LinkedTest {
    /// Every declared link with its role: main first, then primary, then secondary.
    pub fn links(&self) -> impl Iterator<Item = (LinkRole, &SpecCoordinate)> {
        self.main_link
            .iter()
            .map(|link| (LinkRole::Main, link))
            .chain(self.primary_links.iter().map(|link| (LinkRole::Primary, link)))
            .chain(
                self.secondary_links
                    .iter()
                    .map(|link| (LinkRole::Secondary, link)),
            )
    }

    #[must_use]
    pub fn link_count(&self) -> usize {
        usize::from(self.main_link.is_some())
            + self.primary_links.len()
            + self.secondary_links.len()
    }

    /// Own flag or any case flag
    #[must_use]
    pub fn has_unexpected_behavior(&self) -> bool {
        self.unexpected_behavior || self.cases.any_unexpected()
    }
}
