//! Configuration loading from environment variables.
//!
//! All values come from `PARK_CORE_*` environment variables with sensible
//! defaults. Invalid values fall back to defaults without crashing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `PARK_CORE_FLOORS` | 2 | Number of floors (min 1) |
//! | `PARK_CORE_LAYOUT` | demo layout | Inline template, rows split by `;`, cells by `,` |
//! | `PARK_CORE_LAYOUT_FILE` | unset | TOML layout file, overrides the inline layout |
//! | `PARK_CORE_LOG_LEVEL` | info | Tracing filter directive |
//! | `PARK_CORE_LOG_FORMAT` | pretty | `pretty` or `json` |
//! | `PARK_CORE_SIM_WORKERS` | 0 | Simulation threads (0 = one per CPU) |
//! | `PARK_CORE_SIM_OPS` | 1000 | Operations per simulation worker |
//!
//! # Layout file
//!
//! ```toml
//! floors = 2
//! rows = [
//!     ["B-1", "M-1", "A-1"],
//!     ["B-1", "X-0", "A-1"],
//! ]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::grid::LayoutTemplate;
use crate::telemetry::{LogConfig, LogFormat};

/// Layout used when none is configured.
pub const DEFAULT_LAYOUT: &str = "B-1,M-1,A-1;B-1,X-0,A-1;M-1,A-1,B-1";
pub const DEFAULT_FLOORS: usize = 2;
pub const DEFAULT_SIM_OPS: usize = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read layout file {path}: {reason}")]
    Read { path: PathBuf, reason: String },
    #[error("Invalid layout file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// On-disk layout description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutFile {
    pub floors: Option<usize>,
    pub rows: LayoutTemplate,
}

/// Where the effective layout came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutSource {
    Default,
    Inline,
    File(PathBuf),
}

/// Simulation driver settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Worker threads; 0 means one per CPU.
    pub workers: usize,
    pub operations_per_worker: usize,
}

impl SimulationConfig {
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get().max(1)
        } else {
            self.workers
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            operations_per_worker: DEFAULT_SIM_OPS,
        }
    }
}

/// Effective configuration summary.
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub floors: usize,
    pub rows: usize,
    pub columns: usize,
    pub layout: String,
    pub layout_file: Option<PathBuf>,
    pub log_level: String,
    pub log_format: String,
    pub sim_workers: usize,
    pub sim_ops: usize,
}

/// All configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub floors: usize,
    pub layout: LayoutTemplate,
    pub layout_source: LayoutSource,
    pub log: LogConfig,
    pub simulation: SimulationConfig,
}

/// Parse a `usize` env var, returning `default` on missing or invalid.
fn parse_usize(key: &str, default: usize) -> usize {
    match std::env::var(key) {
        Ok(val) => val.trim().parse::<usize>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Read and parse a TOML layout file.
pub fn load_layout_file(path: &Path) -> Result<LayoutFile, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn load_log_config() -> LogConfig {
    let level = std::env::var("PARK_CORE_LOG_LEVEL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "info".to_string());
    let format = std::env::var("PARK_CORE_LOG_FORMAT")
        .ok()
        .and_then(|v| v.parse::<LogFormat>().ok())
        .unwrap_or_default();
    LogConfig { format, level, output_path: None }
}

fn load_simulation_config() -> SimulationConfig {
    let workers = parse_usize("PARK_CORE_SIM_WORKERS", 0);
    let operations_per_worker = parse_usize("PARK_CORE_SIM_OPS", DEFAULT_SIM_OPS).max(1);
    SimulationConfig { workers, operations_per_worker }
}

/// Resolve floors and template: file first, then inline, then the default.
fn load_layout() -> (usize, LayoutTemplate, LayoutSource) {
    let floors = parse_usize("PARK_CORE_FLOORS", DEFAULT_FLOORS).max(1);

    if let Ok(path) = std::env::var("PARK_CORE_LAYOUT_FILE") {
        let path = PathBuf::from(path);
        match load_layout_file(&path) {
            Ok(file) => {
                let floors = file.floors.unwrap_or(floors).max(1);
                return (floors, file.rows, LayoutSource::File(path));
            }
            Err(e) => warn!("{}; falling back to inline layout", e),
        }
    }

    match std::env::var("PARK_CORE_LAYOUT") {
        Ok(text) if !text.trim().is_empty() => {
            (floors, LayoutTemplate::parse_inline(&text), LayoutSource::Inline)
        }
        _ => (
            floors,
            LayoutTemplate::parse_inline(DEFAULT_LAYOUT),
            LayoutSource::Default,
        ),
    }
}

/// Load all configuration from environment variables.
///
/// Missing or invalid values fall back to safe defaults without panicking.
pub fn load() -> EnvConfig {
    let (floors, layout, layout_source) = load_layout();
    EnvConfig {
        floors,
        layout,
        layout_source,
        log: load_log_config(),
        simulation: load_simulation_config(),
    }
}

impl EnvConfig {
    pub fn rows(&self) -> usize {
        self.layout.row_count()
    }

    pub fn columns(&self) -> usize {
        self.layout.column_count()
    }

    pub fn effective_config(&self) -> EffectiveConfig {
        EffectiveConfig {
            floors: self.floors,
            rows: self.rows(),
            columns: self.columns(),
            layout: self.layout.to_inline(),
            layout_file: match &self.layout_source {
                LayoutSource::File(path) => Some(path.clone()),
                _ => None,
            },
            log_level: self.log.level.clone(),
            log_format: self.log.format.as_str().to_string(),
            sim_workers: self.simulation.effective_workers(),
            sim_ops: self.simulation.operations_per_worker,
        }
    }
}
