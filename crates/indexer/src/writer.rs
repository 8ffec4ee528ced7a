use crate::error::{IndexerError, Result};
use crate::fine_index::FineIndex;
use crate::sections::SectionIndex;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const TESTS_MAP_FILENAME: &str = "testsMap.json";
pub const SECTIONS_MAP_FILENAME: &str = "sectionsMap.json";

/// Persists generated maps under the spec test data root
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    testdata_root: PathBuf,
    write_section_shards: bool,
}

impl ArtifactWriter {
    pub fn new(testdata_root: impl Into<PathBuf>, write_section_shards: bool) -> Self {
        Self {
            testdata_root: testdata_root.into(),
            write_section_shards,
        }
    }

    /// Writes `{linked}/testsMap.json` (overwriting) and, if enabled, one shard per
    /// composite key. Returns the written paths.
    pub fn write_tests_map(&self, index: &FineIndex) -> Result<Vec<PathBuf>> {
        let dir = self.testdata_root.join(index.linked_path());
        let path = dir.join(TESTS_MAP_FILENAME);
        overwrite(&dir, &path, &serde_json::to_string_pretty(index)?)?;
        let mut written = vec![path];

        if self.write_section_shards {
            for (section_path, paragraphs) in index.sections().iter() {
                let dir = self.testdata_root.join(index.composite_key(section_path));
                let path = dir.join(TESTS_MAP_FILENAME);
                overwrite(&dir, &path, &serde_json::to_string_pretty(paragraphs)?)?;
                written.push(path);
            }
        }

        log::info!(
            "{}: wrote {} tests map file(s) under {}",
            index.area(),
            written.len(),
            dir.display()
        );
        Ok(written)
    }

    /// Writes `{linked}/sectionsMap.json`.
    ///
    /// The file is appended to rather than truncated, so a stale map left by an
    /// earlier run ends up concatenated with the new one.
    pub fn write_sections_map(&self, index: &SectionIndex) -> Result<PathBuf> {
        let dir = self.testdata_root.join(index.linked_path());
        let path = dir.join(SECTIONS_MAP_FILENAME);
        let text = serde_json::to_string_pretty(index)?;

        fs::create_dir_all(&dir).map_err(|err| IndexerError::io(&dir, err))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| IndexerError::io(&path, err))?;
        file.write_all(text.as_bytes())
            .map_err(|err| IndexerError::io(&path, err))?;

        log::info!("{}: wrote {}", index.area(), path.display());
        Ok(path)
    }
}

fn overwrite(dir: &Path, path: &Path, text: &str) -> Result<()> {
    fs::create_dir_all(dir).map_err(|err| IndexerError::io(dir, err))?;
    fs::write(path, text).map_err(|err| IndexerError::io(path, err))?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpecMapConfig;
    use crate::fine_index::FineIndexer;
    use pretty_assertions::assert_eq;
    use specmap_metadata::{parse_link, LinkedTest, TestCases, TestType};
    use tempfile::tempdir;

    fn fine_index(config: &SpecMapConfig) -> FineIndex {
        let test = LinkedTest {
            area: "psi".to_string(),
            test_type: TestType::Positive,
            spec_version: "0.1".to_string(),
            main_link: Some(parse_link("t.kt", "a, b -> paragraph 1 -> sentence 2").unwrap()),
            primary_links: Vec::new(),
            secondary_links: Vec::new(),
            cases: TestCases::new(),
            description: String::new(),
            helpers: None,
            unexpected_behavior: false,
            number: None,
            issues: Vec::new(),
        };
        let mut indexer = FineIndexer::new(config);
        indexer.add(&test, "t.kt").unwrap();
        indexer.finish().get("psi").unwrap().clone()
    }

    #[test]
    fn tests_map_is_overwritten_with_shards() {
        let temp = tempdir().unwrap();
        let config = SpecMapConfig::default();
        let index = fine_index(&config);
        let writer = ArtifactWriter::new(temp.path(), true);

        let first = writer.write_tests_map(&index).unwrap();
        let second = writer.write_tests_map(&index).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                temp.path().join("psi/linked/testsMap.json"),
                temp.path().join("psi/linked/a/b/testsMap.json")
            ]
        );

        let area_map: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&first[0]).unwrap()).unwrap();
        assert_eq!(area_map["a/b"]["1"]["pos"]["2"][0]["linkType"], "main");

        let shard: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&first[1]).unwrap()).unwrap();
        assert_eq!(shard["1"]["pos"]["2"][0]["specVersion"], "0.1");
    }

    #[test]
    fn shards_can_be_disabled() {
        let temp = tempdir().unwrap();
        let index = fine_index(&SpecMapConfig::default());
        let written = ArtifactWriter::new(temp.path(), false)
            .write_tests_map(&index)
            .unwrap();
        assert_eq!(written.len(), 1);
        assert!(!temp.path().join("psi/linked/a").exists());
    }

    #[test]
    fn sections_map_is_appended() {
        let temp = tempdir().unwrap();
        let mut index = SectionIndex::new("psi", "psi/linked");
        index.add("a", "b");
        let writer = ArtifactWriter::new(temp.path(), true);

        let path = writer.write_sections_map(&index).unwrap();
        let once = fs::read_to_string(&path).unwrap();
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&once).unwrap(),
            serde_json::json!({ "a": ["b"] })
        );

        writer.write_sections_map(&index).unwrap();
        let twice = fs::read_to_string(&path).unwrap();
        assert_eq!(twice, format!("{once}{once}"));
    }
}
