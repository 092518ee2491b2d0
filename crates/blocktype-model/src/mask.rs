//! Feature masks: the subset of feature indices a model uses.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use crate::ModelError;
use crate::features::FEATURE_COUNT;

/// Set of 1-based feature indices to keep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureMask {
    indices: BTreeSet<u32>,
}

impl FeatureMask {
    /// Mask keeping exactly `indices`.
    pub fn new(indices: impl IntoIterator<Item = u32>) -> Self {
        Self {
            indices: indices.into_iter().collect(),
        }
    }

    /// Load a mask file: one index per line, blank lines and `#` comments
    /// ignored.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ModelError::io(path, e))?;
        let mut indices = BTreeSet::new();
        for (number, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let index: u32 = line.parse().map_err(|_| {
                ModelError::parse(path, format!("line {}: not a feature index: {line}", number + 1))
            })?;
            if index == 0 || index as usize > FEATURE_COUNT {
                return Err(ModelError::parse(
                    path,
                    format!("line {}: feature index {index} out of range", number + 1),
                ));
            }
            indices.insert(index);
        }
        Ok(Self { indices })
    }

    /// Write the mask in the format [`load`](Self::load) reads.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let mut out = Vec::new();
        for index in &self.indices {
            writeln!(out, "{index}").map_err(|e| ModelError::io(path, e))?;
        }
        std::fs::write(path, out).map_err(|e| ModelError::io(path, e))
    }

    /// Whether the mask keeps `index`.
    pub fn contains(&self, index: u32) -> bool {
        self.indices.contains(&index)
    }

    /// Number of kept features.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the mask keeps nothing.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
