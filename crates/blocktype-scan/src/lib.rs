//! Streaming block classification driver for blocktype.
//!
//! This crate turns files, directories and standard input into
//! classification results:
//!
//! - **Block reading** in fixed-size blocks with running offsets
//! - **Deterministic sampling** seeded per input path
//! - **Driving** an incremental [`Classifier`] through accumulate, classify
//!   and clear
//! - **Reporting** one line per classified range
//!
//! # Example
//!
//! ```rust,ignore
//! use blocktype_scan::{Driver, DriverConfig, InputPath, Reporter};
//!
//! let config = DriverConfig::builder().block_mode(true).build()?;
//! let mut driver = Driver::new(config, classifier, Reporter::stdio(false))?;
//! driver.process(&InputPath::parse("/evidence"))?;
//! let stats = driver.finish()?;
//! println!("classified {} ranges", stats.accepted);
//! ```

mod driver;
mod reader;
mod report;
mod sampler;
mod walk;

pub use driver::{Driver, DriverStats};
pub use reader::{Block, BlockReader};
pub use report::{Classification, Reporter, TypeLabel};
pub use sampler::{LegacyRandom, Sampler};
pub use walk::for_each_regular_file;

// Re-export core types for convenience
pub use blocktype_core::{Classifier, ClassifyError, DriverConfig, InputPath, TypeCode};
