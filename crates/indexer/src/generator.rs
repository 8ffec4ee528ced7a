use crate::classifier::PathClassifier;
use crate::config::SpecMapConfig;
use crate::corpus::{Corpus, FsCorpus};
use crate::error::{IndexerError, Result};
use crate::fine_index::{FineIndexSet, FineIndexer};
use crate::sections::{SectionIndexSet, SectionReducer};
use crate::source::MetadataSource;
use crate::stats::RunStats;
use crate::writer::ArtifactWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Everything a run produces before it is written
#[derive(Debug, Clone)]
pub struct SpecMaps {
    pub tests: FineIndexSet,
    pub sections: SectionIndexSet,
}

/// Builds and writes the tests and sections maps for a repository
pub struct SpecMapGenerator<C: Corpus = FsCorpus> {
    root: PathBuf,
    config: SpecMapConfig,
    corpus: C,
}

impl SpecMapGenerator<FsCorpus> {
    /// Create a generator reading tests from the filesystem under `root`
    pub fn new(root: impl AsRef<Path>, config: SpecMapConfig) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(IndexerError::config(format!(
                "Root does not exist: {}",
                root.display()
            )));
        }
        Self::with_corpus(root, config, FsCorpus)
    }
}

impl<C: Corpus> SpecMapGenerator<C> {
    pub fn with_corpus(root: impl AsRef<Path>, config: SpecMapConfig, corpus: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            root: root.as_ref().to_path_buf(),
            config,
            corpus,
        })
    }

    pub fn config(&self) -> &SpecMapConfig {
        &self.config
    }

    /// Scan, index and reduce without touching the output directories.
    pub fn build(&self, stats: &mut RunStats) -> Result<SpecMaps> {
        let mut indexer = FineIndexer::new(&self.config);
        MetadataSource::new(&self.root, &self.config, &self.corpus).scan(
            stats,
            |found, stats| {
                let appended = indexer.add(&found.test, &found.path)?;
                stats.add_linked_test(&found.test.area, appended);
                Ok(())
            },
        )?;
        let tests = indexer.finish();

        let classifier = PathClassifier::new(&self.config.areas);
        let reducer = SectionReducer::new(&classifier);
        let mut sections = SectionIndexSet::new();
        for fine in tests.values() {
            let reduced = reducer.reduce_fine_index(fine);
            if !reduced.is_empty() {
                sections.insert(fine.area(), reduced);
            }
        }

        Ok(SpecMaps { tests, sections })
    }

    /// Build every map and write it under the spec test data root.
    pub fn generate(&self) -> Result<RunStats> {
        let start = Instant::now();
        let mut stats = RunStats::new();
        log::info!("Generating spec maps for {}", self.root.display());

        let maps = self.build(&mut stats)?;

        let writer = ArtifactWriter::new(
            self.root.join(&self.config.testdata_root),
            self.config.write_section_shards,
        );
        for fine in maps.tests.values() {
            stats.add_written(writer.write_tests_map(fine)?.len());
            if let Some(sections) = maps.sections.get(fine.area()) {
                writer.write_sections_map(sections)?;
                stats.add_written(1);
            }
        }

        stats.time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        log::info!(
            "Indexed {} linked tests ({} links) from {} files; wrote {} files in {} ms",
            stats.linked_tests,
            stats.link_records,
            stats.files,
            stats.files_written,
            stats.time_ms
        );
        Ok(stats)
    }
}
