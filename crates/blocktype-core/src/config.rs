//! Driver configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::ClassifyError;

/// Block size used when none is given.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Configuration for a classification run.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct DriverConfig {
    /// Size of each read, and of each classified block in block mode.
    #[builder(default = "DEFAULT_BLOCK_SIZE")]
    #[serde(default = "default_block_size")]
    pub block_size: usize,

    /// Classify every full block instead of the whole stream.
    #[builder(default = "false")]
    #[serde(default)]
    pub block_mode: bool,

    /// Percentage of boundary events that are classified. 100 or more
    /// accepts every boundary.
    #[builder(default = "100")]
    #[serde(default = "default_percentage")]
    pub percentage: u32,

    /// Seed for the per-file sampling generator.
    #[builder(default = "0")]
    #[serde(default)]
    pub seed: u32,

    /// Skip the first block of every input.
    #[builder(default = "false")]
    #[serde(default)]
    pub skip_header: bool,

    /// Report the byte range of every accepted boundary on the diagnostic stream.
    #[builder(default = "false")]
    #[serde(default)]
    pub report_ranges: bool,

    /// A training dump is active; classification lines are not printed.
    #[builder(default = "false")]
    #[serde(default)]
    pub training: bool,
}

fn default_block_size() -> usize {
    DEFAULT_BLOCK_SIZE
}

fn default_percentage() -> u32 {
    100
}

impl DriverConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.block_size == Some(0) {
            return Err("block size must be positive".to_string());
        }
        Ok(())
    }
}

impl DriverConfig {
    /// Create a new driver config builder.
    pub fn builder() -> DriverConfigBuilder {
        DriverConfigBuilder::default()
    }

    /// Check a config that was not produced by the builder.
    pub fn validate(&self) -> Result<(), ClassifyError> {
        if self.block_size == 0 {
            return Err(ClassifyError::invalid_config("block size must be positive"));
        }
        Ok(())
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            block_mode: false,
            percentage: 100,
            seed: 0,
            skip_header: false,
            report_ranges: false,
            training: false,
        }
    }
}

impl From<DriverConfigBuilderError> for ClassifyError {
    fn from(err: DriverConfigBuilderError) -> Self {
        ClassifyError::invalid_config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = DriverConfig::builder()
            .block_size(4096usize)
            .block_mode(true)
            .percentage(25u32)
            .seed(7u32)
            .build()
            .unwrap();

        assert_eq!(config.block_size, 4096);
        assert!(config.block_mode);
        assert_eq!(config.percentage, 25);
        assert_eq!(config.seed, 7);
        assert!(!config.skip_header);
    }

    #[test]
    fn test_config_defaults() {
        let config = DriverConfig::builder().build().unwrap();
        assert_eq!(config, DriverConfig::default());
        assert_eq!(config.block_size, 512);
    }

    #[test]
    fn test_zero_block_size_rejected() {
        let err = DriverConfig::builder().block_size(0usize).build().unwrap_err();
        assert!(err.to_string().contains("block size"));

        let classify_err: ClassifyError = err.into();
        assert!(matches!(classify_err, ClassifyError::InvalidConfig { .. }));
    }

    #[test]
    fn test_percentage_above_100_accepted() {
        let config = DriverConfig::builder().percentage(150u32).build().unwrap();
        assert_eq!(config.percentage, 150);
        config.validate().unwrap();
    }
}
