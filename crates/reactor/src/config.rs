//! Pipeline settings
//!
//! Stored under `[pipeline]` in `tessera.toml`; every key is optional.

use crate::path_setter::PathSettingProcessor;
use crate::pipeline::PipelineBuilder;
use crate::structural::{StructuralReactor, TopType};
use serde::{Deserialize, Serialize};

/// Which standard stages a pipeline starts with
///
/// # Example
///
/// ```toml
/// [pipeline]
/// top_type = "struct"
/// set_paths = true
/// check_pointers = false
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Kind of value the stream must produce
    #[serde(default)]
    pub top_type: TopType,
    /// Attach object paths to events
    #[serde(default = "default_true")]
    pub set_paths: bool,
    /// Validate pointer allocations and references
    #[serde(default = "default_true")]
    pub check_pointers: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            top_type: TopType::Value,
            set_paths: true,
            check_pointers: true,
        }
    }
}

impl PipelineConfig {
    /// A builder holding the configured standard stages
    ///
    /// Further stages added to the builder run after these; the pointer
    /// check, when enabled, is appended last on build.
    pub fn builder(&self) -> PipelineBuilder {
        let mut builder = PipelineBuilder::new().add(StructuralReactor::new(self.top_type));
        if self.set_paths {
            builder = builder.add(PathSettingProcessor::new());
        }
        builder.check_pointers(self.check_pointers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{DiscardSink, StageKind};

    #[test]
    fn test_default_stages() {
        let pipeline = PipelineConfig::default().builder().build(DiscardSink);
        assert_eq!(
            pipeline.stage_kinds(),
            vec![StageKind::Structural, StageKind::PathSetting, StageKind::PointerCheck]
        );
    }

    #[test]
    fn test_minimal_stages() {
        let config = PipelineConfig {
            top_type: TopType::Struct,
            set_paths: false,
            check_pointers: false,
        };
        let pipeline = config.builder().build(DiscardSink);
        assert_eq!(pipeline.stage_kinds(), vec![StageKind::Structural]);
    }

    #[test]
    fn test_serde_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"top_type":"map"}"#).unwrap();
        assert_eq!(config.top_type, TopType::Map);
        assert!(config.set_paths);
        assert!(config.check_pointers);
    }
}
