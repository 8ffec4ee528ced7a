use crate::config::{AreaConfig, SpecMapConfig};
use crate::corpus::Corpus;
use crate::error::Result;
use crate::stats::RunStats;
use specmap_metadata::{
    has_implementation_test_info, HeaderParser, LinkedTest, ParsedFile, TestOrigin,
};
use std::path::Path;

/// A linked test together with where it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredTest {
    pub test: LinkedTest,
    /// Path relative to the repository root, `/`-separated
    pub path: String,
    pub origin: TestOrigin,
}

/// Walks every configured area, spec tests first, and yields parsed linked tests
pub struct MetadataSource<'a, C: Corpus> {
    root: &'a Path,
    config: &'a SpecMapConfig,
    corpus: &'a C,
    parser: HeaderParser,
}

impl<'a, C: Corpus> MetadataSource<'a, C> {
    pub fn new(root: &'a Path, config: &'a SpecMapConfig, corpus: &'a C) -> Self {
        Self {
            root,
            config,
            corpus,
            parser: HeaderParser::new(config.area_labels()),
        }
    }

    /// Feeds every linked test to `visit`. Stops at the first error.
    pub fn scan(
        &self,
        stats: &mut RunStats,
        mut visit: impl FnMut(DiscoveredTest, &mut RunStats) -> Result<()>,
    ) -> Result<()> {
        for origin in [TestOrigin::Spec, TestOrigin::Implementation] {
            for area in &self.config.areas {
                let dir = match origin {
                    TestOrigin::Spec => Some(self.config.spec_tests_dir(self.root, area)),
                    TestOrigin::Implementation => {
                        self.config.implementation_tests_dir(self.root, area)
                    }
                };
                let Some(dir) = dir else {
                    continue;
                };
                log::debug!(
                    "Scanning {} tests of {} in {}",
                    origin.as_str(),
                    area.name,
                    dir.display()
                );
                self.scan_dir(&dir, origin, area, stats, &mut visit)?;
            }
        }
        Ok(())
    }

    fn scan_dir(
        &self,
        dir: &Path,
        origin: TestOrigin,
        area: &AreaConfig,
        stats: &mut RunStats,
        visit: &mut impl FnMut(DiscoveredTest, &mut RunStats) -> Result<()>,
    ) -> Result<()> {
        for entry in self.corpus.walk(dir) {
            let path = entry?;
            stats.files += 1;

            let accepted = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| self.config.accepts_file_name(name));
            if !accepted {
                stats.filtered += 1;
                continue;
            }

            let content = self.corpus.read(&path)?;
            if origin == TestOrigin::Implementation && !has_implementation_test_info(&content) {
                stats.filtered += 1;
                continue;
            }

            let display = self.display_path(&path);
            match self.parser.parse(&display, &content, origin, &area.name)? {
                ParsedFile::Linked(test) => {
                    log::debug!("{display}: {} link(s)", test.link_count());
                    visit(
                        DiscoveredTest {
                            test: *test,
                            path: display,
                            origin,
                        },
                        &mut *stats,
                    )?;
                }
                ParsedFile::NotLinked => {
                    log::debug!("{display}: not linked");
                    stats.not_linked += 1;
                }
                ParsedFile::NoHeader => {
                    log::debug!("{display}: no spec test header");
                    stats.without_header += 1;
                }
            }
        }
        Ok(())
    }

    fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}
