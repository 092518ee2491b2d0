//! The classifier engine: type table, features, model and dumps together.

use std::io::Write;
use std::path::Path;

use tracing::{debug, info, warn};

use blocktype_core::{Classifier, ClassifyError, TypeCode};

use crate::ModelError;
use crate::dump::{Dump, DumpFormat};
use crate::features::{FeatureAccumulator, FeatureVector};
use crate::mask::FeatureMask;
use crate::model::{LinearModel, Model};
use crate::ngram::NgramMode;
use crate::types::TypeTable;

/// Where the engine is in the accumulate/classify/clear cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Empty,
    Accumulating,
    Classified,
}

/// Incremental byte n-gram classifier.
///
/// Opened once and reused for every input; [`clear`](Classifier::clear)
/// resets the accumulated bytes without reloading the model.
#[derive(Debug)]
pub struct Engine {
    types: TypeTable,
    model: Model,
    mask: Option<FeatureMask>,
    accumulator: FeatureAccumulator,
    phase: Phase,
    dump: Option<Dump>,
}

impl Engine {
    /// Open an engine.
    ///
    /// Without a model file the builtin rules are used; without a class file
    /// the builtin class table is used.
    pub fn open(
        model_path: Option<&Path>,
        class_path: Option<&Path>,
        mask_path: Option<&Path>,
    ) -> Result<Self, ModelError> {
        let types = match class_path {
            Some(path) => TypeTable::from_class_file(path)?,
            None => TypeTable::builtin(),
        };
        let model = match model_path {
            Some(path) => Model::Linear(LinearModel::load(path)?),
            None => Model::builtin(&types),
        };
        let mask = mask_path.map(FeatureMask::load).transpose()?;

        info!(
            classes = types.len(),
            model = if model_path.is_some() { "linear" } else { "builtin" },
            masked_features = mask.as_ref().map(FeatureMask::len),
            "classifier opened"
        );
        Ok(Self::with_parts(types, model, mask))
    }

    /// Assemble an engine from already loaded parts.
    pub fn with_parts(types: TypeTable, model: Model, mask: Option<FeatureMask>) -> Self {
        Self {
            types,
            model,
            mask,
            accumulator: FeatureAccumulator::default(),
            phase: Phase::Empty,
            dump: None,
        }
    }

    /// Change how bigrams are formed. Clears accumulated state.
    pub fn set_ngram_mode(&mut self, mode: NgramMode) {
        debug!(%mode, "ngram mode set");
        self.accumulator.set_mode(mode);
        self.phase = Phase::Empty;
    }

    /// Current bigram mode.
    pub fn ngram_mode(&self) -> NgramMode {
        self.accumulator.mode()
    }

    /// Write a JSON feature record labelled `class` on every classification.
    pub fn dump_json_on_classify(&mut self, class: TypeCode, writer: impl Write + Send + 'static) {
        self.dump = Some(Dump::new(DumpFormat::Json, class, Box::new(writer)));
    }

    /// Write a liblinear feature line labelled `class` on every classification.
    pub fn dump_nodes_on_classify(&mut self, class: TypeCode, writer: impl Write + Send + 'static) {
        self.dump = Some(Dump::new(DumpFormat::Nodes, class, Box::new(writer)));
    }

    /// Stop writing training dumps.
    pub fn stop_dumping(&mut self) -> Result<(), ModelError> {
        if let Some(mut dump) = self.dump.take() {
            dump.flush()?;
        }
        Ok(())
    }

    /// Whether a training dump is active.
    pub fn is_dumping(&self) -> bool {
        self.dump.is_some()
    }

    /// Write the `top_n` strongest features of the model as a mask file.
    /// Returns the number of features written.
    pub fn reduce_features(&self, output: &Path, top_n: usize) -> Result<usize, ModelError> {
        let mask = self.model.reduce(top_n)?;
        mask.save(output)?;
        info!(kept = mask.len(), output = %output.display(), "feature mask written");
        Ok(mask.len())
    }

    /// Feature vector of the accumulated bytes, after masking.
    pub fn features(&self) -> FeatureVector {
        let mut features = self.accumulator.features();
        if let Some(mask) = &self.mask {
            features.retain(|index| mask.contains(index));
        }
        features
    }

    /// The class table.
    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    fn classify_accumulated(&mut self) -> Result<TypeCode, ModelError> {
        if self.phase == Phase::Classified {
            return Err(ModelError::State {
                message: "classify called twice without new data or clear",
            });
        }

        let features = self.features();
        let code = self.model.predict(&self.accumulator.summary(), &features);
        if let Some(dump) = self.dump.as_mut() {
            dump.write(&features)?;
        }
        self.phase = Phase::Classified;
        Ok(code)
    }
}

impl Classifier for Engine {
    fn update(&mut self, bytes: &[u8]) -> Result<(), ClassifyError> {
        if self.phase == Phase::Classified {
            return Err(ModelError::State {
                message: "update after classify without clear",
            }
            .into());
        }
        self.accumulator.update(bytes);
        if !bytes.is_empty() {
            self.phase = Phase::Accumulating;
        }
        Ok(())
    }

    fn classify(&mut self) -> Result<TypeCode, ClassifyError> {
        Ok(self.classify_accumulated()?)
    }

    fn clear(&mut self) {
        self.accumulator.clear();
        self.phase = Phase::Empty;
    }

    fn name_for_type(&self, code: TypeCode) -> Option<&str> {
        self.types.name_for_type(code)
    }

    fn type_for_name(&self, name: &str) -> Option<TypeCode> {
        self.types.type_for_name(name)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Err(err) = self.stop_dumping() {
            warn!(%err, "failed to flush training dump");
        }
    }
}
