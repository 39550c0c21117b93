use crate::errors::{PipelineError, Result};
use crate::sequence::{DEFAULT_SEQUENCE_LEN, MAX_SEQUENCE_LEN};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_PATH: &str = ".fibtrial/fibtrial.db";
pub const DEFAULT_TOP_N: u32 = 5;
pub const DEFAULT_PRUNE_THRESHOLD: u64 = 5000;
pub const DEFAULT_REPORT_PATH: &str = "report.md";

pub const ENV_DB: &str = "FIBTRIAL_DB";
pub const ENV_COUNT: &str = "FIBTRIAL_COUNT";
pub const ENV_LOG: &str = "FIBTRIAL_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub db_path: PathBuf,
    pub count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prune_threshold: Option<u64>,
    pub top_n: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_path: Option<PathBuf>,
    pub log_level: String,
    /// Keys present in the YAML file that this version does not understand.
    #[serde(skip)]
    pub ignored_keys: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            count: DEFAULT_SEQUENCE_LEN,
            prune_threshold: None,
            top_n: DEFAULT_TOP_N,
            report_path: Some(PathBuf::from(DEFAULT_REPORT_PATH)),
            export_path: None,
            log_level: "info".to_string(),
            ignored_keys: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Overrides fields from environment-style lookups. A count that does not
    /// parse is a config error rather than a silent fallback.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_DB) {
            if !v.trim().is_empty() {
                self.db_path = PathBuf::from(v);
            }
        }
        if let Some(v) = lookup(ENV_COUNT) {
            self.count = v.trim().parse().map_err(|_| {
                PipelineError::Config(format!(
                    "{ENV_COUNT} must be an integer, got '{v}'"
                ))
            })?;
        }
        if let Some(v) = lookup(ENV_LOG) {
            self.log_level = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.count <= 0 || self.count > MAX_SEQUENCE_LEN {
            return Err(PipelineError::Validation(format!(
                "count must be between 1 and {MAX_SEQUENCE_LEN}, got {}",
                self.count
            )));
        }
        if self.top_n == 0 {
            return Err(PipelineError::Validation("top_n must be at least 1".into()));
        }
        Ok(())
    }
}

/// Reads a YAML config file. Unknown keys are collected rather than rejected.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::Config(format!("failed to read config {}: {}", path.display(), e))
    })?;
    parse_config(&raw).map_err(|e| match e {
        PipelineError::Config(msg) => {
            PipelineError::Config(format!("{} (file: {})", msg, path.display()))
        }
        other => other,
    })
}

pub fn parse_config(raw: &str) -> Result<PipelineConfig> {
    if raw.trim().is_empty() {
        return Ok(PipelineConfig::default());
    }

    let mut ignored = BTreeSet::new();
    let deserializer = serde_yaml::Deserializer::from_str(raw);
    let mut cfg: PipelineConfig = serde_ignored::deserialize(deserializer, |path| {
        ignored.insert(path.to_string());
    })
    .map_err(|e| PipelineError::Config(format!("failed to parse YAML: {}", e)))?;

    cfg.ignored_keys = ignored.into_iter().collect();
    Ok(cfg)
}
