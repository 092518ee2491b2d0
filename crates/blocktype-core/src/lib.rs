//! Core types and traits for blocktype.
//!
//! This crate provides the fundamental pieces shared by the classifier
//! engine and the streaming driver: the error taxonomy, the driver
//! configuration, the input path model and the [`Classifier`] contract.

mod classifier;
mod config;
mod error;
mod input;

pub use classifier::{Classifier, TypeCode};
pub use config::{DEFAULT_BLOCK_SIZE, DriverConfig, DriverConfigBuilder, DriverConfigBuilderError};
pub use error::ClassifyError;
pub use input::{InputPath, STDIN_SENTINEL};
