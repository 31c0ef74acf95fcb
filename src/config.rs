//! Configuration via `tessera.toml`
//!
//! Two sections, both optional: `[pipeline]` picks the standard stages every
//! pipeline starts with and `[codec]` bounds binary decoding. A missing key
//! takes its default.

use crate::error::{Result, TesseraError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tessera_codec::CodecLimits;
use tessera_reactor::PipelineConfig;
use tracing::debug;

/// Conventional config file name
pub const CONFIG_FILE_NAME: &str = "tessera.toml";

/// Configuration loaded from `tessera.toml`
///
/// # Example
///
/// ```toml
/// [pipeline]
/// top_type = "struct"
/// check_pointers = false
///
/// [codec]
/// max_nesting_depth = 32
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TesseraConfig {
    /// Standard pipeline stages
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Decode limits
    #[serde(default)]
    pub codec: CodecLimits,
}

impl TesseraConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Tessera configuration

[pipeline]
# Kind of value every stream must produce:
#   "value" (default), "list", "map" or "struct"
top_type = "value"
# Attach object paths to events so errors name their location (default: true)
set_paths = true
# Validate pointer allocations and references (default: true)
check_pointers = true

[codec]
# Bounds for decoding untrusted binary input
max_nesting_depth = 128
max_string_bytes = 16777216     # 16MB
max_buffer_bytes = 16777216     # 16MB
max_identifier_parts = 255
"#
    }

    /// Parse config text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TesseraConfig = toml::from_str(content)
            .map_err(|e| TesseraError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds an
    /// unusable limit.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TesseraError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: TesseraConfig = toml::from_str(&content).map_err(|e| {
            TesseraError::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        debug!(target: "tessera::config", path = %path.display(), ?config, "Loaded config");
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                TesseraError::config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TesseraError::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            TesseraError::config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    fn validate(&self) -> Result<()> {
        if self.codec.max_nesting_depth == 0 {
            return Err(TesseraError::config(
                "Invalid max_nesting_depth 0 in tessera.toml. Expected a positive value.",
            ));
        }
        Ok(())
    }
}
