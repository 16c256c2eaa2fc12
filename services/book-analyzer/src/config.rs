//! Analyzer configuration

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Environment variable consulted when `--target-size` is not given
pub const TARGET_SIZE_ENV: &str = "BOOK_ANALYZER_TARGET_SIZE";

/// Validated analyzer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Size of the hypothetical trade whose cost is tracked
    target_size: u64,
}

impl AnalyzerConfig {
    /// Build a configuration, rejecting non-positive target sizes
    pub fn new(target_size: i64) -> Result<Self, ConfigError> {
        match u64::try_from(target_size) {
            Ok(size) if size > 0 => Ok(Self { target_size: size }),
            _ => Err(ConfigError::NonPositiveTargetSize(target_size)),
        }
    }

    /// Target trade size
    #[inline]
    #[must_use]
    pub const fn target_size(&self) -> u64 {
        self.target_size
    }
}
