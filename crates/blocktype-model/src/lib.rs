//! Byte n-gram classifier engine for blocktype.
//!
//! The [`Engine`] implements the [`Classifier`](blocktype_core::Classifier)
//! contract over byte statistics:
//!
//! - **Class table** - builtin or loaded from a class file
//! - **Features** - unigram and bigram frequencies plus entropy and related
//!   statistics, with three bigram pairing modes
//! - **Models** - builtin statistical rules or a trained linear model
//! - **Training dumps** - JSON or liblinear records written on every
//!   classification
//! - **Feature reduction** - keep the strongest features of a trained model
//!
//! ```rust,ignore
//! use blocktype_core::Classifier;
//! use blocktype_model::Engine;
//!
//! let mut engine = Engine::open(None, None, None)?;
//! engine.update(b"plain ascii text\n")?;
//! let code = engine.classify()?;
//! engine.clear();
//! println!("{}", engine.name_for_type(code).unwrap_or("?"));
//! ```

mod dump;
mod engine;
mod error;
pub mod features;
mod mask;
mod model;
mod ngram;
mod types;

pub use dump::{Dump, DumpFormat};
pub use engine::Engine;
pub use error::ModelError;
pub use features::{ByteSummary, FeatureAccumulator, FeatureVector};
pub use mask::FeatureMask;
pub use model::{BuiltinLabels, ClassWeights, LinearModel, Model};
pub use ngram::NgramMode;
pub use types::{TypeTable, UNCLASSIFIED};
