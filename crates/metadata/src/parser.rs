use crate::error::{ParseError, Result};
use crate::types::{LinkedTest, SpecCoordinate, TestCases, TestOrigin, TestType};
use once_cell::sync::Lazy;
use regex::Regex;

static SPEC_TEST_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^KOTLIN\s+(?P<area>[A-Z][A-Z ]*?)\s+(?P<not_linked>NOT LINKED\s+)?SPEC TEST\s*\((?P<test_type>[A-Z]+)\)$",
    )
    .expect("valid spec test title regex")
});

static RELEVANT_SENTENCES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^RELEVANT SPEC SENTENCES\s*\(spec version:\s*(?P<version>[^,]+),\s*test type:\s*(?P<test_type>\w+)\)\s*:?$",
    )
    .expect("valid relevant sentences regex")
});

static IMPLEMENTATION_TEST_INFO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"RELEVANT SPEC SENTENCES\s*\(spec version:[^,]+,\s*test type:\s*\w+\)")
        .expect("valid implementation test info regex")
});

static HEADER_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<key>[A-Z][A-Z ]*[A-Z]):\s*(?P<value>.*)$").expect("valid field regex")
});

static SPEC_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<sections>.+?)\s*->\s*paragraph\s+(?P<paragraph>\S+)\s*->\s*sentence\s+(?P<sentence>\S+)$",
    )
    .expect("valid spec link regex")
});

static TEST_CASE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*//\s*TESTCASE NUMBER:\s*(?P<numbers>\d+(?:\s*,\s*\d+)*)\s*$")
        .expect("valid test case regex")
});

const UNEXPECTED_BEHAVIOUR: &str = "UNEXPECTED BEHAVIOUR";
const SPEC_TEST_MARKER: &str = "SPEC TEST";
const RELEVANT_SENTENCES_MARKER: &str = "RELEVANT SPEC SENTENCES";

/// Returns true when an implementation test carries spec link information.
#[must_use]
pub fn has_implementation_test_info(content: &str) -> bool {
    IMPLEMENTATION_TEST_INFO.is_match(content)
}

/// Maps a header area label (`CODEGEN BOX`) to a configured area name (`codegen/box`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaLabel {
    pub label: String,
    pub name: String,
}

impl AreaLabel {
    pub fn new(label: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            name: name.into(),
        }
    }
}

/// Outcome of reading one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedFile {
    Linked(Box<LinkedTest>),
    /// A spec test explicitly marked as not linked
    NotLinked,
    /// No recognizable test header
    NoHeader,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Relevant,
    Primary,
    Secondary,
    Description,
}

#[derive(Default)]
struct HeaderFields {
    spec_version: Option<String>,
    test_type: Option<TestType>,
    area: Option<String>,
    main_link: Option<SpecCoordinate>,
    primary_links: Vec<SpecCoordinate>,
    secondary_links: Vec<SpecCoordinate>,
    description: Vec<String>,
    helpers: Option<Vec<String>>,
    issues: Vec<String>,
    number: Option<u32>,
    unexpected_behavior: bool,
}

/// Parser for spec test header comments
#[derive(Debug, Clone, Default)]
pub struct HeaderParser {
    areas: Vec<AreaLabel>,
}

impl HeaderParser {
    pub fn new(areas: Vec<AreaLabel>) -> Self {
        Self { areas }
    }

    /// Parse the header of one test file.
    ///
    /// `area` is the configured area the file was found under; it becomes the
    /// test's area for implementation tests. Spec tests name their area in the
    /// title line instead.
    pub fn parse(
        &self,
        path: &str,
        content: &str,
        origin: TestOrigin,
        area: &str,
    ) -> Result<ParsedFile> {
        let Some((header, body)) = split_header(content) else {
            return Ok(ParsedFile::NoHeader);
        };

        let spec_block = header.iter().any(|line| line.contains(SPEC_TEST_MARKER));
        let mut fields = HeaderFields::default();
        let mut current = Field::None;
        let mut recognized = false;

        for line in header {
            if line.is_empty() {
                current = Field::None;
                continue;
            }

            if origin == TestOrigin::Spec {
                if let Some(caps) = SPEC_TEST_TITLE.captures(line) {
                    if caps.name("not_linked").is_some() {
                        return Ok(ParsedFile::NotLinked);
                    }
                    fields.area = Some(self.resolve_area(path, &caps["area"])?);
                    fields.test_type = Some(parse_test_type(path, &caps["test_type"])?);
                    recognized = true;
                    current = Field::None;
                    continue;
                }
            } else if let Some(caps) = RELEVANT_SENTENCES.captures(line) {
                fields.spec_version = Some(caps["version"].trim().to_string());
                fields.test_type = Some(parse_test_type(path, &caps["test_type"])?);
                fields.area = Some(area.to_string());
                recognized = true;
                current = Field::Relevant;
                continue;
            }

            if line == UNEXPECTED_BEHAVIOUR {
                fields.unexpected_behavior = true;
                current = Field::None;
                continue;
            }

            if let Some(caps) = HEADER_FIELD.captures(line) {
                let value = caps["value"].trim();
                current = Field::None;
                match &caps["key"] {
                    "SPEC VERSION" => fields.spec_version = Some(value.to_string()),
                    "MAIN LINK" => fields.main_link = Some(parse_link(path, value)?),
                    "PRIMARY LINKS" => {
                        current = Field::Primary;
                        push_link(path, value, &mut fields.primary_links)?;
                    }
                    "SECONDARY LINKS" => {
                        current = Field::Secondary;
                        push_link(path, value, &mut fields.secondary_links)?;
                    }
                    "NUMBER" => fields.number = Some(parse_number(path, "NUMBER", value)?),
                    "DESCRIPTION" => {
                        current = Field::Description;
                        if !value.is_empty() {
                            fields.description.push(value.to_string());
                        }
                    }
                    "ISSUES" => fields.issues = split_list(value),
                    "HELPERS" => fields.helpers = Some(split_list(value)),
                    other => log::debug!("{path}: ignoring header field {other}"),
                }
                continue;
            }

            match current {
                Field::Relevant => {
                    let link = parse_link(path, line.trim_start_matches('-').trim())?;
                    if fields.main_link.is_none() {
                        fields.main_link = Some(link);
                    } else {
                        fields.primary_links.push(link);
                    }
                }
                Field::Primary => push_link(path, line, &mut fields.primary_links)?,
                Field::Secondary => push_link(path, line, &mut fields.secondary_links)?,
                Field::Description => fields.description.push(line.to_string()),
                Field::None => {}
            }
        }

        if !recognized {
            if origin == TestOrigin::Spec && spec_block {
                return Err(ParseError::missing_field(path, "title"));
            }
            return Ok(ParsedFile::NoHeader);
        }

        let area = fields
            .area
            .ok_or_else(|| ParseError::missing_field(path, "area"))?;
        let test_type = fields
            .test_type
            .ok_or_else(|| ParseError::missing_field(path, "test type"))?;
        let spec_version = fields
            .spec_version
            .ok_or_else(|| ParseError::missing_field(path, "SPEC VERSION"))?;

        Ok(ParsedFile::Linked(Box::new(LinkedTest {
            area,
            test_type,
            spec_version,
            main_link: fields.main_link,
            primary_links: fields.primary_links,
            secondary_links: fields.secondary_links,
            cases: parse_cases(path, body)?,
            description: fields.description.join(" "),
            helpers: fields.helpers,
            unexpected_behavior: fields.unexpected_behavior,
            number: fields.number,
            issues: fields.issues,
        })))
    }

    fn resolve_area(&self, path: &str, label: &str) -> Result<String> {
        let wanted = normalize_label(label);
        self.areas
            .iter()
            .find(|area| normalize_label(&area.label) == wanted)
            .map(|area| area.name.clone())
            .ok_or_else(|| ParseError::UnknownArea {
                path: path.to_string(),
                label: label.to_string(),
            })
    }
}

/// Finds the first block comment carrying test info and splits it into trimmed
/// header lines plus the body that follows it.
fn split_header(content: &str) -> Option<(Vec<&str>, &str)> {
    let mut offset = 0;
    loop {
        let start = offset + content[offset..].find("/*")?;
        let end = start + 2 + content[start + 2..].find("*/")?;
        let block = &content[start + 2..end];
        offset = end + 2;

        if !block.contains(SPEC_TEST_MARKER) && !block.contains(RELEVANT_SENTENCES_MARKER) {
            continue;
        }

        let lines = block
            .lines()
            .map(|line| {
                let line = line.trim();
                line.strip_prefix('*').unwrap_or(line).trim()
            })
            .collect();
        return Some((lines, &content[offset..]));
    }
}

fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}

fn parse_test_type(path: &str, value: &str) -> Result<TestType> {
    TestType::from_header(value).ok_or_else(|| ParseError::UnknownTestType {
        path: path.to_string(),
        value: value.to_string(),
    })
}

fn parse_number(path: &str, field: &str, value: &str) -> Result<u32> {
    value.trim().parse().map_err(|_| ParseError::InvalidNumber {
        path: path.to_string(),
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn push_link(path: &str, value: &str, links: &mut Vec<SpecCoordinate>) -> Result<()> {
    if !value.is_empty() {
        links.push(parse_link(path, value)?);
    }
    Ok(())
}

/// Parse `sec1, sec2 -> paragraph N -> sentence M`.
pub fn parse_link(path: &str, value: &str) -> Result<SpecCoordinate> {
    let caps = SPEC_LINK.captures(value.trim()).ok_or_else(|| {
        ParseError::invalid_link(
            path,
            value,
            "expected `sections -> paragraph N -> sentence M`",
        )
    })?;

    let sections: Vec<String> = caps["sections"]
        .split(',')
        .map(str::trim)
        .filter(|section| !section.is_empty())
        .map(str::to_string)
        .collect();
    if sections.iter().any(|section| section.contains('/')) {
        return Err(ParseError::invalid_link(
            path,
            value,
            "section names must not contain `/`",
        ));
    }
    let paragraph = caps["paragraph"]
        .parse()
        .map_err(|_| ParseError::invalid_link(path, value, "paragraph is not a number"))?;
    let sentence = caps["sentence"]
        .parse()
        .map_err(|_| ParseError::invalid_link(path, value, "sentence is not a number"))?;

    SpecCoordinate::new(sections, paragraph, sentence)
        .ok_or_else(|| ParseError::invalid_link(path, value, "no sections"))
}

fn parse_cases(path: &str, body: &str) -> Result<TestCases> {
    let mut cases = TestCases::new();
    let mut current: Vec<u32> = Vec::new();

    for line in body.lines() {
        if let Some(caps) = TEST_CASE_MARKER.captures(line) {
            current = caps["numbers"]
                .split(',')
                .map(|number| parse_number(path, "TESTCASE NUMBER", number))
                .collect::<Result<_>>()?;
            for number in &current {
                cases.declare(*number);
            }
        } else if line.contains(UNEXPECTED_BEHAVIOUR) {
            for number in &current {
                cases.flag_unexpected(*number);
            }
        }
    }

    Ok(cases)
}
