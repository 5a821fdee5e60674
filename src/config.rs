use std::fs;

use serde::Deserialize;

use crate::error::{AppResult, Error};

/// Which queue policy a CLI run should drive the planner with.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum QueuePolicyKind {
    Fcfs,
    BackfillHybrid,
}

impl Default for QueuePolicyKind {
    fn default() -> Self {
        QueuePolicyKind::Fcfs
    }
}

/// Parameters for constructing a [`crate::planner::Planner`] from a run
/// config file, mirroring the constructor arguments of `planner_new`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    pub base_time: i64,
    pub duration: i64,
    pub resource_total: i64,
    pub resource_type: String,
}

/// Top-level run configuration read by the CLI entry point.
///
/// Grounded on the teacher's `loader::parser::parse_json_file` pattern:
/// one `serde`-derived struct, read from a JSON file path, with I/O and
/// deserialization failures converted into `crate::error::Error` variants
/// rather than panicking.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub planner: PlannerConfig,
    #[serde(default)]
    pub queue_policy: QueuePolicyKind,
    #[serde(default)]
    pub reservation_depth: Option<usize>,
}

/// Parses a JSON run-config file into a [`RunConfig`].
///
/// Errors are converted into `crate::error::Error` variants:
/// - `Error::IoError` if the file cannot be read.
/// - `Error::DeserializationError` if the JSON is malformed.
pub fn load_run_config(file_path: &str) -> AppResult<RunConfig> {
    let data = fs::read_to_string(file_path).map_err(Error::IoError)?;
    let config: RunConfig = serde_json::from_str(&data).map_err(Error::DeserializationError)?;
    Ok(config)
}
