//! Splits composite keys (`{area data path}/linked/{sections}`) back into
//! area, main section and sub-section path.
//!
//! Each area reserves its data path segments plus the `linked` marker, so
//! `psi/linked/a/b/c` yields main section `a` and sub-section path `b/c`, while
//! `codegen/box/linked/a/b` has one more reserved segment and yields `a` and `b`.

use crate::config::AreaConfig;
use crate::error::ClassificationError;

#[derive(Debug, Clone, PartialEq, Eq)]
struct AreaPrefix {
    name: String,
    segments: Vec<String>,
}

/// Result of classifying one composite key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub area: String,
    pub main_section: String,
    pub sub_section_path: String,
}

/// Prefix-based classifier over the configured areas
#[derive(Debug, Clone)]
pub struct PathClassifier {
    areas: Vec<AreaPrefix>,
}

impl PathClassifier {
    pub fn new(areas: &[AreaConfig]) -> Self {
        let mut areas: Vec<AreaPrefix> = areas
            .iter()
            .map(|area| AreaPrefix {
                name: area.name.clone(),
                segments: area.segments().into_iter().map(str::to_string).collect(),
            })
            .collect();
        // Longest prefix wins.
        areas.sort_by(|a, b| b.segments.len().cmp(&a.segments.len()));
        Self { areas }
    }

    pub fn classify(&self, key: &str) -> Result<Classification, ClassificationError> {
        let segments: Vec<&str> = key.split('/').collect();

        let area = self
            .areas
            .iter()
            .find(|area| {
                area.segments.len() <= segments.len()
                    && area
                        .segments
                        .iter()
                        .zip(&segments)
                        .all(|(expected, actual)| expected == actual)
            })
            .ok_or_else(|| {
                ClassificationError::new(key, format!("no area matches `{}`", segments[0]))
            })?;

        // area segments + the `linked` marker
        let reserved = area.segments.len() + 1;
        let main_section = segments
            .get(reserved)
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| ClassificationError::new(key, "missing main section"))?;

        Ok(Classification {
            area: area.name.clone(),
            main_section: (*main_section).to_string(),
            sub_section_path: segments[reserved + 1..].join("/"),
        })
    }
}
