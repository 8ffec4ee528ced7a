use crate::error::{IndexerError, Result};
use serde::{Deserialize, Serialize};
use specmap_metadata::AreaLabel;
use std::fs;
use std::path::{Path, PathBuf};

/// Marker directory separating an area's data path from spec section paths
pub const LINKED_TESTS_PATH: &str = "linked";

/// Default config file looked up in the repository root
pub const CONFIG_FILE_NAME: &str = "specmap.toml";

/// One top-level test area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AreaConfig {
    /// Area name, also its identity in generated output (e.g. `codegen/box`)
    pub name: String,

    /// Label used in spec test titles (e.g. `CODEGEN BOX`)
    pub label: String,

    /// Directory under `testdata_root`; its segments are reserved before the
    /// spec section path in every composite key
    pub data_path: String,

    /// Directory under `implementation_root` holding implementation tests
    #[serde(default)]
    pub implementation_path: Option<String>,
}

impl AreaConfig {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        data_path: impl Into<String>,
        implementation_path: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            data_path: data_path.into(),
            implementation_path: implementation_path.map(str::to_string),
        }
    }

    /// Leading path segments of the area's data path
    pub fn segments(&self) -> Vec<&str> {
        self.data_path.split('/').collect()
    }

    /// `{data_path}/linked`, the prefix of every composite key of this area
    pub fn linked_path(&self) -> String {
        format!("{}/{LINKED_TESTS_PATH}", self.data_path)
    }
}

/// Generator configuration, usually read from `specmap.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpecMapConfig {
    /// Spec test data root; spec tests are read from and maps written to here
    pub testdata_root: PathBuf,

    /// Root of implementation test data
    pub implementation_root: PathBuf,

    /// Extension of test files, without the dot
    pub file_extension: String,

    /// File name suffixes to skip (frontend variants)
    pub excluded_suffixes: Vec<String>,

    /// Also write one `testsMap.json` per composite key
    pub write_section_shards: bool,

    pub areas: Vec<AreaConfig>,
}

impl Default for SpecMapConfig {
    fn default() -> Self {
        Self {
            testdata_root: PathBuf::from("compiler/tests-spec/testData"),
            implementation_root: PathBuf::from("compiler/testData"),
            file_extension: "kt".to_string(),
            excluded_suffixes: vec![".fir.kt".to_string()],
            write_section_shards: true,
            areas: vec![
                AreaConfig::new("psi", "PSI", "psi", Some("psi")),
                AreaConfig::new(
                    "diagnostics",
                    "DIAGNOSTICS",
                    "diagnostics",
                    Some("diagnostics/tests"),
                ),
                AreaConfig::new("codegen/box", "CODEGEN BOX", "codegen/box", Some("codegen/box")),
            ],
        }
    }
}

impl SpecMapConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|err| IndexerError::io(path, err))?;
        Self::from_toml_str(&text)
    }

    /// Load `path` if given, else `specmap.toml` under `dir` if present, else defaults
    pub fn resolve(path: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            log::debug!("Using config {}", candidate.display());
            return Self::load(&candidate);
        }
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        if self.areas.is_empty() {
            return Err(IndexerError::config("at least one area is required"));
        }
        if self.file_extension.trim_start_matches('.').is_empty() {
            return Err(IndexerError::config("file_extension must not be empty"));
        }

        for (idx, area) in self.areas.iter().enumerate() {
            if area.name.is_empty() || area.label.trim().is_empty() {
                return Err(IndexerError::config(format!(
                    "area #{idx} needs a name and a label"
                )));
            }
            if area.segments().iter().any(|segment| segment.is_empty()) {
                return Err(IndexerError::config(format!(
                    "area `{}` has an invalid data_path `{}`",
                    area.name, area.data_path
                )));
            }

            for other in &self.areas[..idx] {
                if other.name == area.name {
                    return Err(IndexerError::config(format!(
                        "duplicate area name `{}`",
                        area.name
                    )));
                }
                if other.label.eq_ignore_ascii_case(&area.label) {
                    return Err(IndexerError::config(format!(
                        "duplicate area label `{}`",
                        area.label
                    )));
                }
                if is_segment_prefix(&other.segments(), &area.segments())
                    || is_segment_prefix(&area.segments(), &other.segments())
                {
                    return Err(IndexerError::config(format!(
                        "data paths `{}` and `{}` overlap",
                        other.data_path, area.data_path
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn area(&self, name: &str) -> Option<&AreaConfig> {
        self.areas.iter().find(|area| area.name == name)
    }

    pub fn area_labels(&self) -> Vec<AreaLabel> {
        self.areas
            .iter()
            .map(|area| AreaLabel::new(area.label.clone(), area.name.clone()))
            .collect()
    }

    /// Directory holding the spec tests of `area`
    pub fn spec_tests_dir(&self, root: &Path, area: &AreaConfig) -> PathBuf {
        root.join(&self.testdata_root).join(&area.data_path)
    }

    /// Directory holding the implementation tests of `area`, if configured
    pub fn implementation_tests_dir(&self, root: &Path, area: &AreaConfig) -> Option<PathBuf> {
        area.implementation_path
            .as_ref()
            .map(|path| root.join(&self.implementation_root).join(path))
    }

    /// Whether a file name passes the extension and suffix filters
    pub fn accepts_file_name(&self, file_name: &str) -> bool {
        let extension = self.file_extension.trim_start_matches('.');
        let has_extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == extension);
        has_extension
            && !self
                .excluded_suffixes
                .iter()
                .any(|suffix| file_name.ends_with(suffix.as_str()))
    }
}

fn is_segment_prefix(prefix: &[&str], path: &[&str]) -> bool {
    prefix.len() <= path.len() && prefix.iter().zip(path).all(|(a, b)| a == b)
}
