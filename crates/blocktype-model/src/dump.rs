//! Training dumps written each time the engine classifies.

use std::io::Write;

use indexmap::IndexMap;
use serde::Serialize;
use strum::Display;

use blocktype_core::TypeCode;

use crate::ModelError;
use crate::features::FeatureVector;

/// Layout of a training dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum DumpFormat {
    /// One JSON object per classification.
    Json,
    /// liblinear style lines: `<class> <index>:<value> ...`.
    Nodes,
}

#[derive(Serialize)]
struct JsonRecord {
    file_type: TypeCode,
    features: IndexMap<u32, f64>,
}

/// Destination for feature vectors labelled with a training class.
pub struct Dump {
    format: DumpFormat,
    class: TypeCode,
    writer: Box<dyn Write + Send>,
}

impl Dump {
    pub fn new(format: DumpFormat, class: TypeCode, writer: Box<dyn Write + Send>) -> Self {
        Self {
            format,
            class,
            writer,
        }
    }

    /// Write one record.
    pub fn write(&mut self, features: &FeatureVector) -> Result<(), ModelError> {
        let line = match self.format {
            DumpFormat::Json => {
                let record = JsonRecord {
                    file_type: self.class,
                    features: features.entries().iter().copied().collect(),
                };
                serde_json::to_string(&record).map_err(|e| ModelError::Dump { source: e.into() })?
            }
            DumpFormat::Nodes => {
                let mut line = self.class.to_string();
                for (index, value) in features.entries() {
                    line.push_str(&format!(" {index}:{value}"));
                }
                line
            }
        };
        writeln!(self.writer, "{line}").map_err(|source| ModelError::Dump { source })
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), ModelError> {
        self.writer.flush().map_err(|source| ModelError::Dump { source })
    }
}

impl std::fmt::Debug for Dump {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dump")
            .field("format", &self.format)
            .field("class", &self.class)
            .finish_non_exhaustive()
    }
}
