//! # Spec Map Indexer
//!
//! Builds the coordinate-level and section-level maps of spec-linked tests.
//!
//! ## Pipeline
//!
//! ```text
//! Test roots (spec + implementation, per area)
//!     │
//!     ├──> Metadata Source (extension / content filters, header parser)
//!     │      └─> Linked tests
//!     │
//!     ├──> Fine Indexer
//!     │      └─> section path → paragraph → test type → sentence → [TestSummary]
//!     │
//!     ├──> Section Reducer (composite keys only)
//!     │      └─> main section → [sub-section path]
//!     │
//!     └──> Artifact Writer
//!            └─> {area}/linked/testsMap.json, {area}/linked/sectionsMap.json
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use specmap_indexer::{SpecMapConfig, SpecMapGenerator};
//!
//! fn main() -> specmap_indexer::Result<()> {
//!     let generator = SpecMapGenerator::new("/path/to/kotlin", SpecMapConfig::default())?;
//!     let stats = generator.generate()?;
//!
//!     println!("Indexed {} tests, {} links", stats.linked_tests, stats.link_records);
//!     Ok(())
//! }
//! ```

mod classifier;
mod config;
mod corpus;
mod error;
mod fine_index;
mod generator;
mod ordered_map;
mod sections;
mod source;
mod stats;
mod writer;

pub use classifier::{Classification, PathClassifier};
pub use config::{AreaConfig, SpecMapConfig, CONFIG_FILE_NAME, LINKED_TESTS_PATH};
pub use corpus::{Corpus, FsCorpus, MemoryCorpus};
pub use error::{ClassificationError, IndexerError, Result};
pub use fine_index::{
    FineIndex, FineIndexSet, FineIndexer, ParagraphTests, SentenceTests, TestSummary, TypeTests,
};
pub use generator::{SpecMapGenerator, SpecMaps};
pub use ordered_map::OrderedMap;
pub use sections::{SectionIndex, SectionIndexSet, SectionReducer};
pub use source::{DiscoveredTest, MetadataSource};
pub use stats::RunStats;
pub use writer::{ArtifactWriter, SECTIONS_MAP_FILENAME, TESTS_MAP_FILENAME};
