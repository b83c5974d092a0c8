//! Environment configuration, read once at startup.

use kg_space::{
    InMemoryAtomSpace, Interpreter, InterpreterError, MettaInterpreter, ProcessInterpreter,
    SpaceCapabilities,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown backend `{0}` (expected `memory` or `process`)")]
    UnknownBackend(String),
    #[error("unknown space access mode `{0}` (expected `type-index`, `scan` or `none`)")]
    UnknownSpaceAccess(String),
    #[error("invalid value `{value}` for {name} (expected true or false)")]
    InvalidFlag { name: &'static str, value: String },
    #[error("engine: {0}")]
    Engine(#[from] InterpreterError),
}

/// Demo settings. Engine and renderer values are kept raw and validated by the
/// startup checks.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// `ATOMVIZ_BACKEND`: `memory` or `process`.
    pub backend: String,
    /// `ATOMVIZ_METTA_BIN`: executable for the `process` backend.
    pub metta_bin: String,
    /// `ATOMVIZ_SPACE_ACCESS`: `type-index`, `scan` or `none` (memory backend).
    pub space_access: String,
    /// `ATOMVIZ_PATTERN_QUERY`: whether the memory space answers structured queries.
    pub pattern_query: String,
    /// `ATOMVIZ_DOT_BIN`
    pub dot_bin: String,
    /// `ATOMVIZ_FORMAT`
    pub format: String,
    /// `ATOMVIZ_OUTPUT_STEM`: image path without extension.
    pub output_stem: PathBuf,
    /// `ATOMVIZ_TRIPLES_PATH`
    pub triples_path: PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl DemoConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        Self {
            backend: get("ATOMVIZ_BACKEND", "memory"),
            metta_bin: get("ATOMVIZ_METTA_BIN", "metta"),
            space_access: get("ATOMVIZ_SPACE_ACCESS", "type-index"),
            pattern_query: get("ATOMVIZ_PATTERN_QUERY", "true"),
            dot_bin: get("ATOMVIZ_DOT_BIN", "dot"),
            format: get("ATOMVIZ_FORMAT", "png"),
            output_stem: PathBuf::from(get("ATOMVIZ_OUTPUT_STEM", "graph")),
            triples_path: PathBuf::from(get("ATOMVIZ_TRIPLES_PATH", "triples.json")),
        }
    }

    /// Construct the configured knowledge engine.
    pub fn build_interpreter(&self) -> Result<Arc<dyn Interpreter>, ConfigError> {
        match self.backend.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => {
                let type_index = match self.space_access.trim().to_ascii_lowercase().as_str() {
                    "type-index" | "none" => true,
                    "scan" => false,
                    _ => return Err(ConfigError::UnknownSpaceAccess(self.space_access.clone())),
                };
                let pattern_query = parse_flag("ATOMVIZ_PATTERN_QUERY", &self.pattern_query)?;
                let space = InMemoryAtomSpace::with_capabilities(SpaceCapabilities {
                    type_index,
                    pattern_query,
                });
                let mut metta = MettaInterpreter::with_space(space);
                if self.space_access.trim().eq_ignore_ascii_case("none") {
                    metta = metta.without_space_access();
                }
                Ok(Arc::new(metta))
            }
            "process" => Ok(Arc::new(ProcessInterpreter::locate(&self.metta_bin)?)),
            _ => Err(ConfigError::UnknownBackend(self.backend.clone())),
        }
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}
