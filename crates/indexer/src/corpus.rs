use crate::error::{IndexerError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Source of test files.
///
/// `walk` yields every file below `root` once, in a stable order; the sequence
/// is finite and not restartable. Contents are fetched separately so callers
/// can filter by name before paying for a read.
pub trait Corpus {
    fn walk<'a>(&'a self, root: &Path) -> Box<dyn Iterator<Item = Result<PathBuf>> + 'a>;

    fn read(&self, path: &Path) -> Result<String>;
}

/// Corpus backed by the filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCorpus;

impl Corpus for FsCorpus {
    fn walk<'a>(&'a self, root: &Path) -> Box<dyn Iterator<Item = Result<PathBuf>> + 'a> {
        if !root.exists() {
            log::debug!("Skipping missing test root {}", root.display());
            return Box::new(std::iter::empty());
        }

        // Sorted so discovery order, and with it array order in the maps, is reproducible.
        let walker = WalkDir::new(root).sort_by_file_name().into_iter();
        Box::new(walker.filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(err) => Some(Err(IndexerError::from(err))),
        }))
    }

    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|err| IndexerError::io(path, err))
    }
}

/// Corpus held in memory, keyed by path
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Corpus for MemoryCorpus {
    fn walk<'a>(&'a self, root: &Path) -> Box<dyn Iterator<Item = Result<PathBuf>> + 'a> {
        let root = root.to_path_buf();
        Box::new(
            self.files
                .keys()
                .filter(move |path| path.starts_with(&root))
                .map(|path| Ok(path.clone())),
        )
    }

    fn read(&self, path: &Path) -> Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            IndexerError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not in memory corpus"),
            )
        })
    }
}
