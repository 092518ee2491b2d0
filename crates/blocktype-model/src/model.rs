//! Models that map a feature vector to a type code.

use std::collections::BTreeMap;
use std::path::Path;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use blocktype_core::TypeCode;

use crate::features::{ByteSummary, FeatureVector};
use crate::mask::FeatureMask;
use crate::types::TypeTable;
use crate::ModelError;

/// Entropy, in bits per byte, at or above which the builtin model reports
/// random data.
pub const RANDOM_ENTROPY: f64 = 7.5;
/// Printable fraction at or above which the builtin model reports text.
pub const TEXT_PRINTABLE_RATIO: f64 = 0.95;

/// Weights of one class in a linear model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassWeights {
    /// Type code predicted by this class.
    pub label: TypeCode,
    #[serde(default)]
    pub bias: f64,
    /// Weight per 1-based feature index; absent features weigh zero.
    #[serde(default)]
    pub weights: BTreeMap<u32, f64>,
}

impl ClassWeights {
    fn score(&self, features: &FeatureVector) -> f64 {
        self.bias
            + features
                .entries()
                .iter()
                .filter_map(|(index, value)| self.weights.get(index).map(|w| w * value))
                .sum::<f64>()
    }
}

/// One-vs-rest linear model stored as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub classes: Vec<ClassWeights>,
}

impl LinearModel {
    /// Load a model from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ModelError::io(path, e))?;
        let model: Self =
            serde_json::from_str(&contents).map_err(|e| ModelError::parse(path, e.to_string()))?;
        if model.classes.is_empty() {
            return Err(ModelError::parse(path, "model defines no classes"));
        }
        Ok(model)
    }

    /// Label of the highest scoring class. Ties go to the earlier class.
    pub fn predict(&self, features: &FeatureVector) -> TypeCode {
        let mut best: Option<(f64, TypeCode)> = None;
        for class in &self.classes {
            let score = class.score(features);
            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, class.label));
            }
        }
        best.map(|(_, label)| label).unwrap_or(0)
    }

    /// The `top_n` features with the largest absolute weight in any class.
    pub fn top_features(&self, top_n: usize) -> FeatureMask {
        let mut strength: BTreeMap<u32, f64> = BTreeMap::new();
        for class in &self.classes {
            for (&index, &weight) in &class.weights {
                let entry = strength.entry(index).or_insert(0.0);
                *entry = entry.max(weight.abs());
            }
        }

        let ranked = strength
            .into_iter()
            .filter(|(_, weight)| *weight > 0.0)
            .sorted_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)))
            .take(top_n)
            .map(|(index, _)| index);
        FeatureMask::new(ranked)
    }
}

/// Type codes the builtin model can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinLabels {
    pub constant: TypeCode,
    pub random: TypeCode,
    pub text: TypeCode,
}

impl BuiltinLabels {
    fn from_table(types: &TypeTable) -> Self {
        let code = |name| types.type_for_name(name).unwrap_or(0);
        Self {
            constant: code("CONSTANT"),
            random: code("RAND"),
            text: code("TEXT"),
        }
    }
}

/// The model used by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    /// Statistical rules needing no trained weights.
    Builtin(BuiltinLabels),
    /// Trained linear weights.
    Linear(LinearModel),
}

impl Model {
    /// The builtin rules with labels resolved against `types`.
    pub fn builtin(types: &TypeTable) -> Self {
        Self::Builtin(BuiltinLabels::from_table(types))
    }

    /// Predict a type code.
    pub fn predict(&self, summary: &ByteSummary, features: &FeatureVector) -> TypeCode {
        match self {
            Self::Builtin(labels) => {
                if summary.total == 0 {
                    0
                } else if summary.distinct == 1 {
                    labels.constant
                } else if summary.entropy >= RANDOM_ENTROPY {
                    labels.random
                } else if summary.printable_ratio >= TEXT_PRINTABLE_RATIO {
                    labels.text
                } else {
                    0
                }
            }
            Self::Linear(model) => model.predict(features),
        }
    }

    /// Select the strongest features; only trained models have weights.
    pub fn reduce(&self, top_n: usize) -> Result<FeatureMask, ModelError> {
        match self {
            Self::Builtin(_) => Err(ModelError::Reduce {
                message: "the builtin model has no feature weights".to_string(),
            }),
            Self::Linear(_) if top_n == 0 => Err(ModelError::Reduce {
                message: "the number of features to keep must be positive".to_string(),
            }),
            Self::Linear(model) => Ok(model.top_features(top_n)),
        }
    }
}
